//! NAV price history
//!
//! A per-scheme series of price points with the date-proximity lookup the
//! valuation and redemption flows rely on. The feed adapter fills this in
//! from the registrar's history endpoint; the domain only ever reads it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::SchemeCode;

/// Maximum distance between a requested date and a usable price point
pub const NAV_TOLERANCE_DAYS: i64 = 50;

/// A single NAV price point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// NAV history for one scheme, kept in ascending date order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavHistory {
    pub scheme_code: SchemeCode,
    points: Vec<NavPoint>,
}

impl NavHistory {
    /// Creates an empty history
    pub fn new(scheme_code: SchemeCode) -> Self {
        Self {
            scheme_code,
            points: Vec::new(),
        }
    }

    /// Builds a history from unordered points
    pub fn from_points(scheme_code: SchemeCode, mut points: Vec<NavPoint>) -> Self {
        points.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            scheme_code,
            points,
        }
    }

    /// Adds a price point, keeping the series sorted
    pub fn add(&mut self, point: NavPoint) {
        self.points.push(point);
        self.points.sort_by(|a, b| a.date.cmp(&b.date));
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The most recent price point
    pub fn latest(&self) -> Option<&NavPoint> {
        self.points.last()
    }

    /// The price point closest to `date`, regardless of distance
    ///
    /// Ties resolve to the earlier point.
    pub fn closest_to(&self, date: NaiveDate) -> Option<&NavPoint> {
        let mut best: Option<(&NavPoint, i64)> = None;
        for point in &self.points {
            let diff = (point.date - date).num_days().abs();
            if best.map_or(true, |(_, best_diff)| diff < best_diff) {
                best = Some((point, diff));
            }
        }
        best.map(|(point, _)| point)
    }

    /// The price nearest `date`, if one lies within the tolerance window
    pub fn price_near(&self, date: NaiveDate) -> Option<Decimal> {
        self.closest_to(date)
            .filter(|p| (p.date - date).num_days().abs() <= NAV_TOLERANCE_DAYS)
            .map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history() -> NavHistory {
        NavHistory::from_points(
            SchemeCode(120503),
            vec![
                NavPoint {
                    date: date(2024, 3, 1),
                    value: dec!(52),
                },
                NavPoint {
                    date: date(2024, 1, 1),
                    value: dec!(50),
                },
                NavPoint {
                    date: date(2024, 2, 1),
                    value: dec!(51),
                },
            ],
        )
    }

    #[test]
    fn test_latest_is_most_recent_by_date() {
        assert_eq!(history().latest().map(|p| p.value), Some(dec!(52)));
    }

    #[test]
    fn test_price_near_picks_closest_point() {
        assert_eq!(history().price_near(date(2024, 1, 25)), Some(dec!(51)));
    }

    #[test]
    fn test_price_near_respects_tolerance_window() {
        // 61 days past the last point: outside the 50-day window
        assert_eq!(history().price_near(date(2024, 5, 1)), None);
        // 50 days exactly is still usable
        assert_eq!(history().price_near(date(2024, 4, 20)), Some(dec!(52)));
    }

    #[test]
    fn test_tie_resolves_to_earlier_point() {
        let h = NavHistory::from_points(
            SchemeCode(1),
            vec![
                NavPoint {
                    date: date(2024, 1, 1),
                    value: dec!(10),
                },
                NavPoint {
                    date: date(2024, 1, 3),
                    value: dec!(11),
                },
            ],
        );
        assert_eq!(h.price_near(date(2024, 1, 2)), Some(dec!(10)));
    }

    #[test]
    fn test_empty_history_has_no_prices() {
        let h = NavHistory::new(SchemeCode(1));
        assert!(h.latest().is_none());
        assert!(h.price_near(date(2024, 1, 1)).is_none());
    }
}
