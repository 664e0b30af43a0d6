//! Calendar quarter types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One of the four fixed three-month spans of a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    /// January through March.
    Q1,
    /// April through June.
    Q2,
    /// July through September.
    Q3,
    /// October through December.
    Q4,
}

impl Quarter {
    /// All quarters in calendar order.
    pub const ALL: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    /// The quarter containing the given date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Self::Q1,
            4..=6 => Self::Q2,
            7..=9 => Self::Q3,
            _ => Self::Q4,
        }
    }

    /// Quarter number within the year (1-4).
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }

    /// First and last calendar month of this quarter (1-12).
    #[must_use]
    pub const fn months(self) -> (u32, u32) {
        match self {
            Self::Q1 => (1, 3),
            Self::Q2 => (4, 6),
            Self::Q3 => (7, 9),
            Self::Q4 => (10, 12),
        }
    }

    /// Returns true if the given date falls within this quarter.
    #[must_use]
    pub fn contains_date(self, date: NaiveDate) -> bool {
        let (start, end) = self.months();
        date.month() >= start && date.month() <= end
    }

    /// Display label for a given year (e.g., "Q1 2026").
    #[must_use]
    pub fn label(self, year: i32) -> String {
        format!("Q{} {year}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[rstest]
    #[case(1, 1, Quarter::Q1)]
    #[case(3, 31, Quarter::Q1)]
    #[case(4, 1, Quarter::Q2)]
    #[case(6, 30, Quarter::Q2)]
    #[case(8, 15, Quarter::Q3)]
    #[case(10, 1, Quarter::Q4)]
    #[case(12, 31, Quarter::Q4)]
    fn test_quarter_of_date(#[case] month: u32, #[case] day: u32, #[case] expected: Quarter) {
        assert_eq!(Quarter::of(date(2026, month, day)), expected);
    }

    #[test]
    fn test_contains_date_matches_of() {
        for month in 1..=12 {
            let d = date(2026, month, 10);
            let quarter = Quarter::of(d);
            assert!(quarter.contains_date(d));

            for other in Quarter::ALL {
                if other != quarter {
                    assert!(!other.contains_date(d));
                }
            }
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(Quarter::Q1.label(2026), "Q1 2026");
        assert_eq!(Quarter::Q4.label(2025), "Q4 2025");
    }

    #[test]
    fn test_quarters_cover_the_year() {
        let (start, _) = Quarter::Q1.months();
        let (_, end) = Quarter::Q4.months();
        assert_eq!(start, 1);
        assert_eq!(end, 12);
    }
}
