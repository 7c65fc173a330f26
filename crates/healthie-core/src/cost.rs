//! Free-text price range parsing and rendering.
//!
//! Costs arrive from the generative service as loose text ("40-50 บาท",
//! "ประมาณ 60 บาท", "1,200 - 1,500 บาท"). Every run of ASCII digits is read as
//! one number; the smallest and largest become the range bounds.

use std::{fmt, ops::Add};

/// Currency unit appended to rendered amounts.
pub const CURRENCY_UNIT: &str = "บาท";

/// Rendering of a range with no parseable amount.
pub const NOT_AVAILABLE: &str = "N/A";

/// Inclusive cost bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostRange {
    pub min: u64,
    pub max: u64,
}

impl CostRange {
    pub const ZERO: CostRange = CostRange { min: 0, max: 0 };

    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Parses a free-text price. Absent or number-free text is zero.
    pub fn parse(text: &str) -> Self {
        let mut numbers = digit_runs(text);
        let Some(first) = numbers.next() else {
            return Self::ZERO;
        };
        numbers.fold(Self::new(first, first), |range, n| {
            Self::new(range.min.min(n), range.max.max(n))
        })
    }

    /// Whether the range carries no amount at all.
    pub fn is_zero(&self) -> bool {
        self.min == 0 && self.max == 0
    }
}

impl Add for CostRange {
    type Output = CostRange;

    fn add(self, rhs: CostRange) -> CostRange {
        CostRange::new(
            self.min.saturating_add(rhs.min),
            self.max.saturating_add(rhs.max),
        )
    }
}

impl std::iter::Sum for CostRange {
    fn sum<I: Iterator<Item = CostRange>>(iter: I) -> Self {
        iter.fold(CostRange::ZERO, Add::add)
    }
}

impl fmt::Display for CostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "{NOT_AVAILABLE}")
        } else if self.min == self.max {
            write!(f, "{} {CURRENCY_UNIT}", self.min)
        } else {
            write!(f, "{}-{} {CURRENCY_UNIT}", self.min, self.max)
        }
    }
}

/// Parses `text` into `(min, max)` bounds.
pub fn parse(text: &str) -> (u64, u64) {
    let range = CostRange::parse(text);
    (range.min, range.max)
}

/// Renders bounds as "N/A", "`n` บาท" or "`min`-`max` บาท".
pub fn format(min: u64, max: u64) -> String {
    CostRange::new(min, max).to_string()
}

fn digit_runs(text: &str) -> impl Iterator<Item = u64> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        // Runs too long for u64 are not prices; skip them.
        .filter_map(|run| run.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse("40-50 บาท"), (40, 50));
        assert_eq!(parse("ราคา 80 - 60"), (60, 80));
    }

    #[test]
    fn test_parse_single_number() {
        assert_eq!(parse("ประมาณ 35 บาท"), (35, 35));
    }

    #[test]
    fn test_parse_many_numbers_takes_extremes() {
        assert_eq!(parse("30, 45 หรือ 25 บาท"), (25, 45));
    }

    #[test]
    fn test_parse_thousands_separator_splits_digits() {
        assert_eq!(parse("1,200"), (1, 200));
    }

    #[test]
    fn test_parse_without_numbers_is_zero() {
        assert_eq!(parse(""), (0, 0));
        assert_eq!(parse("ฟรี"), (0, 0));
        assert!(CostRange::parse("   ").is_zero());
    }

    #[test]
    fn test_parse_skips_overlong_runs() {
        assert_eq!(parse("99999999999999999999999 or 12"), (12, 12));
    }

    #[test]
    fn test_format_variants() {
        assert_eq!(format(0, 0), "N/A");
        assert_eq!(format(50, 50), "50 บาท");
        assert_eq!(format(160, 210), "160-210 บาท");
        assert_eq!(format(0, 40), "0-40 บาท");
    }

    #[test]
    fn test_sum_of_ranges() {
        let total: CostRange = ["40-50", "60-80", "60-80"]
            .into_iter()
            .map(CostRange::parse)
            .sum();
        assert_eq!(total, CostRange::new(160, 210));
        assert_eq!(total.to_string(), "160-210 บาท");
    }
}
