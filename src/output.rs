use comfy_table::Table;
use core_types::PriceSeries;
use engine::{AssetReport, WindowOutcome};

/// Renders one asset report as a heading line followed by a metrics table.
pub fn report_table(report: &AssetReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Window", "Volatility", "Max drawdown", "Performance"]);

    for (window, outcome) in &report.windows {
        match outcome {
            WindowOutcome::Summary(summary) => table.add_row(vec![
                window.to_string(),
                summary.volatility.to_string(),
                summary.max_drawdown.to_string(),
                summary.performance.to_string(),
            ]),
            WindowOutcome::Unavailable { error } => table.add_row(vec![
                window.to_string(),
                "n/a".to_string(),
                "n/a".to_string(),
                format!("n/a ({})", error),
            ]),
        };
    }

    format!(
        "{} ({}) as of {}, {} bars since {}\n{}",
        report.identifier, report.symbol, report.as_of, report.bars, report.start, table
    )
}

/// Renders the raw daily bars of a series.
pub fn series_table(series: &PriceSeries) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Open", "High", "Low", "Close", "Volume"]);

    for bar in series.bars() {
        table.add_row(vec![
            bar.date.to_string(),
            format!("{:.4}", bar.open),
            format!("{:.4}", bar.high),
            format!("{:.4}", bar.low),
            format!("{:.4}", bar.close),
            bar.volume.to_string(),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AssetSummary;
    use chrono::NaiveDate;
    use core_types::{PriceBar, Window};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_report_table_lists_windows() {
        let mut windows = BTreeMap::new();
        windows.insert(
            Window::OneYear,
            WindowOutcome::Summary(AssetSummary {
                volatility: dec!(0.014),
                max_drawdown: dec!(0.231),
                performance: dec!(0.187),
            }),
        );
        windows.insert(
            Window::ThisYear,
            WindowOutcome::Unavailable {
                error: "not enough bars".to_string(),
            },
        );
        let report = AssetReport {
            identifier: "US0378331005".to_string(),
            symbol: "AAPL".to_string(),
            as_of: date(2025, 1, 2),
            start: date(2022, 1, 3),
            bars: 750,
            windows,
        };

        let rendered = report_table(&report);
        assert!(rendered.starts_with("US0378331005 (AAPL) as of 2025-01-02"));
        assert!(rendered.contains("1 year"));
        assert!(rendered.contains("0.231"));
        assert!(rendered.contains("not enough bars"));
    }

    #[test]
    fn test_series_table() {
        let series = PriceSeries::new(vec![PriceBar {
            date: date(2023, 1, 3),
            open: 130.28,
            high: 130.9,
            low: 124.17,
            close: 125.07,
            volume: 112117500,
        }]);

        let rendered = series_table(&series);
        assert!(rendered.contains("2023-01-03"));
        assert!(rendered.contains("125.0700"));
        assert!(rendered.contains("112117500"));
    }
}
