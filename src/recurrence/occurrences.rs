use chrono::{Days, NaiveDate};
use std::iter::FusedIterator;

use crate::model::RecurrenceRule;

/// Lazy series of due dates for one recurring rule.
///
/// Yields the start date first, unconditionally, then keeps stepping while
/// the date is on or before the end date. Without an end date the series is
/// unbounded and the caller decides when to stop; it still ends if the date
/// arithmetic would overflow.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    step: Days,
    end: Option<NaiveDate>,
    started: bool,
}

impl Occurrences {
    /// `None` when the rule does not recur.
    pub fn new(start: NaiveDate, rule: &RecurrenceRule) -> Option<Self> {
        let step = rule.step_days()?;
        Some(Self {
            next: Some(start),
            step: Days::new(step),
            end: rule.end_date,
            started: false,
        })
    }

    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }

    fn is_past_end(&self, date: NaiveDate) -> bool {
        self.end.is_some_and(|end| date > end)
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        if self.started && self.is_past_end(current) {
            self.next = None;
            return None;
        }
        self.started = true;
        self.next = current.checked_add_days(self.step);
        Some(current)
    }
}

impl FusedIterator for Occurrences {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_none_frequency_has_no_series() {
        let rule = RecurrenceRule::new(Frequency::None);
        assert!(Occurrences::new(date(2024, 1, 1), &rule).is_none());
    }

    #[test]
    fn test_start_after_end_yields_start_only() {
        let rule = RecurrenceRule::new(Frequency::Daily).until(date(2023, 12, 1));
        let dates: Vec<_> = Occurrences::new(date(2024, 1, 1), &rule).unwrap().collect();
        assert_eq!(dates, vec![date(2024, 1, 1)]);
    }

    #[test]
    fn test_unbounded_series_is_lazy() {
        let rule = RecurrenceRule::new(Frequency::Weekly).every(2);
        let series = Occurrences::new(date(2024, 1, 1), &rule).unwrap();
        assert!(!series.is_bounded());
        let dates: Vec<_> = series.take(3).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 29)]);
    }

    #[test]
    fn test_stops_on_date_overflow() {
        let rule = RecurrenceRule::new(Frequency::Daily);
        let mut series = Occurrences::new(NaiveDate::MAX, &rule).unwrap();
        assert_eq!(series.next(), Some(NaiveDate::MAX));
        assert_eq!(series.next(), None);
        assert_eq!(series.next(), None);
    }

    #[test]
    fn test_crosses_month_and_leap_day() {
        let rule = RecurrenceRule::new(Frequency::Daily).until(date(2024, 3, 1));
        let dates: Vec<_> = Occurrences::new(date(2024, 2, 28), &rule).unwrap().collect();
        assert_eq!(dates, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }
}
