//! Date-bounded validity windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validity window. Both bounds are inclusive; no end means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn open_ended(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && self.end.is_none_or(|end| date <= end)
    }
}

/// True if any window in `windows` contains `date`.
pub fn any_contains(windows: &[DateWindow], date: NaiveDate) -> bool {
    windows.iter().any(|window| window.contains(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn open_ended_window_includes_start() {
        let window = DateWindow::open_ended(date(2018, 1, 1));
        assert!(window.contains(date(2018, 1, 1)));
        assert!(!window.contains(date(2017, 12, 31)));
        assert!(window.contains(date(2099, 12, 31)));
    }

    #[test]
    fn closed_window_is_inclusive_on_both_bounds() {
        let window = DateWindow::new(date(2018, 1, 1), Some(date(2018, 12, 31)));
        assert!(window.contains(date(2018, 1, 1)));
        assert!(window.contains(date(2018, 12, 31)));
        assert!(!window.contains(date(2019, 1, 1)));
    }

    fn day(offset: i64) -> NaiveDate {
        date(2000, 1, 1) + chrono::Days::new(offset as u64)
    }

    proptest! {
        #[test]
        fn bounds_are_always_within(start in 0i64..5000, len in 0i64..5000) {
            let window = DateWindow::new(day(start), Some(day(start + len)));
            prop_assert!(window.contains(day(start)));
            prop_assert!(window.contains(day(start + len)));
            prop_assert!(!window.contains(day(start + len + 1)));
        }

        #[test]
        fn open_window_accepts_everything_from_start(start in 1i64..5000, probe in 0i64..10000) {
            let window = DateWindow::open_ended(day(start));
            prop_assert_eq!(window.contains(day(probe)), probe >= start);
        }
    }
}
