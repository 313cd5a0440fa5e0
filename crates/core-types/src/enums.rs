use crate::error::CoreError;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trailing time slice of a price series, anchored on "today".
///
/// The variant order is the order windows appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Window {
    #[serde(rename = "3 years")]
    ThreeYears,
    #[serde(rename = "1 year")]
    OneYear,
    #[serde(rename = "3 months")]
    ThreeMonths,
    #[serde(rename = "this year")]
    ThisYear,
}

impl Window {
    /// All windows, in report order.
    pub const ALL: [Window; 4] = [
        Window::ThreeYears,
        Window::OneYear,
        Window::ThreeMonths,
        Window::ThisYear,
    ];

    /// The longest lookback of any window, in days. Retrieval fetches this much history.
    pub const MAX_LOOKBACK_DAYS: u64 = 365 * 3;

    /// The human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Window::ThreeYears => "3 years",
            Window::OneYear => "1 year",
            Window::ThreeMonths => "3 months",
            Window::ThisYear => "this year",
        }
    }

    /// Returns the exclusive cutoff date for this window: only bars dated
    /// strictly after it belong to the window.
    pub fn cutoff(&self, today: NaiveDate) -> Result<NaiveDate, CoreError> {
        let cutoff = match self {
            Window::ThreeYears => today.checked_sub_days(Days::new(Self::MAX_LOOKBACK_DAYS)),
            Window::OneYear => today.checked_sub_days(Days::new(365)),
            Window::ThreeMonths => today.checked_sub_days(Days::new(30 * 3)),
            Window::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1),
        };

        cutoff.ok_or_else(|| {
            CoreError::DateOutOfRange(format!("cutoff for '{}' counted back from {}", self, today))
        })
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
