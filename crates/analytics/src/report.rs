use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The risk/return summary of one slice of a price series.
///
/// Values are already rounded to three decimal places and serialize as JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSummary {
    /// Sample standard deviation of daily simple returns (not annualized).
    #[serde(with = "rust_decimal::serde::float")]
    pub volatility: Decimal,
    /// Largest fractional drop from the running high, in `[0, 1]` for non-negative prices.
    #[serde(with = "rust_decimal::serde::float")]
    pub max_drawdown: Decimal,
    /// Fractional change from the first to the last close.
    #[serde(with = "rust_decimal::serde::float")]
    pub performance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_serializes_as_numbers() {
        let summary = AssetSummary {
            volatility: dec!(0.012),
            max_drawdown: dec!(0.25),
            performance: dec!(-0.1),
        };

        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "volatility": 0.012, "max_drawdown": 0.25, "performance": -0.1 })
        );
    }
}
