//! Small derived values the front-end renders but never stores.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

pub const JOURNAL_PREVIEW_CHARS: usize = 100;

/// How close a due date is, relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DueUrgency {
    Overdue,
    Today,
    Tomorrow,
    Later,
}

impl DueUrgency {
    pub fn classify(due: NaiveDate, today: NaiveDate) -> Self {
        if due < today {
            DueUrgency::Overdue
        } else if due == today {
            DueUrgency::Today
        } else if today.checked_add_days(Days::new(1)) == Some(due) {
            DueUrgency::Tomorrow
        } else {
            DueUrgency::Later
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DueUrgency::Overdue => "overdue",
            DueUrgency::Today => "today",
            DueUrgency::Tomorrow => "tomorrow",
            DueUrgency::Later => "later",
        }
    }
}

impl fmt::Display for DueUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First [`JOURNAL_PREVIEW_CHARS`] characters of a journal entry, with
/// `...` appended when anything was cut.
pub fn journal_preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(JOURNAL_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_classify() {
        let today = date(2024, 2, 28);
        assert_eq!(DueUrgency::classify(date(2024, 2, 27), today), DueUrgency::Overdue);
        assert_eq!(DueUrgency::classify(today, today), DueUrgency::Today);
        assert_eq!(DueUrgency::classify(date(2024, 2, 29), today), DueUrgency::Tomorrow);
        assert_eq!(DueUrgency::classify(date(2024, 3, 1), today), DueUrgency::Later);
    }

    #[test]
    fn test_preview_short_content_untouched() {
        assert_eq!(journal_preview("short note"), "short note");
        let exact = "a".repeat(100);
        assert_eq!(journal_preview(&exact), exact);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "ü".repeat(101);
        let preview = journal_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 103);
    }
}
