use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    None,
    Daily,
    Weekly,
    Custom,
}

impl Frequency {
    pub fn to_db_str(self) -> &'static str {
        match self {
            Frequency::None => "None",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Custom => "Custom",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Frequency> {
        s.parse().ok()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Frequency::None),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            _ => Err(format!("Invalid frequency: {}", s)),
        }
    }
}

/// How a task template regenerates its occurrences.
///
/// `interval` is kept as entered: it may be absent, zero or negative. Use
/// [`RecurrenceRule::step_days`] for the step the expander actually takes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "lenient_interval")]
    pub interval: Option<i64>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: None,
            end_date: None,
        }
    }

    pub fn every(mut self, interval: i64) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency != Frequency::None
    }

    /// Interval with absent and non-positive values collapsed to 1.
    pub fn effective_interval(&self) -> u64 {
        match self.interval {
            Some(n) if n > 0 => n as u64,
            _ => 1,
        }
    }

    /// Days between two consecutive occurrences, or `None` for a
    /// non-recurring rule.
    pub fn step_days(&self) -> Option<u64> {
        let interval = self.effective_interval();
        match self.frequency {
            Frequency::None => None,
            Frequency::Daily | Frequency::Custom => Some(interval),
            Frequency::Weekly => Some(interval.saturating_mul(7)),
        }
    }
}

/// Accepts a number, a numeric string, or anything else (read as absent).
fn lenient_interval<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(serde_json::Value::String(s)) => leading_integer(&s),
        _ => None,
    })
}

/// Integer prefix of `s` after leading whitespace, `"3 days"` reads as 3.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['-', '+']));
    let digits = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len() - sign_len);
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_step_days() {
        assert_eq!(RecurrenceRule::new(Frequency::None).step_days(), None);
        assert_eq!(RecurrenceRule::new(Frequency::Daily).every(2).step_days(), Some(2));
        assert_eq!(RecurrenceRule::new(Frequency::Weekly).every(3).step_days(), Some(21));
        assert_eq!(RecurrenceRule::new(Frequency::Custom).step_days(), Some(1));
    }

    #[test]
    fn test_non_positive_interval_counts_as_one() {
        assert_eq!(RecurrenceRule::new(Frequency::Daily).every(0).step_days(), Some(1));
        assert_eq!(RecurrenceRule::new(Frequency::Weekly).every(-4).step_days(), Some(7));
    }

    #[test]
    fn test_deserialize_interval_variants() {
        let rule: RecurrenceRule =
            serde_json::from_str(r#"{"frequency":"Custom","interval":"3","endDate":null}"#)
                .unwrap();
        assert_eq!(rule.interval, Some(3));

        let rule: RecurrenceRule =
            serde_json::from_str(r#"{"frequency":"Daily","interval":"often"}"#).unwrap();
        assert_eq!(rule.interval, None);
        assert_eq!(rule.step_days(), Some(1));

        let rule: RecurrenceRule =
            serde_json::from_str(r#"{"frequency":"Weekly","interval":2,"endDate":"2024-01-22"}"#)
                .unwrap();
        assert_eq!(rule.interval, Some(2));
        assert_eq!(rule.end_date, NaiveDate::from_ymd_opt(2024, 1, 22));
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("12abc"), Some(12));
        assert_eq!(leading_integer("  -2"), Some(-2));
        assert_eq!(leading_integer("x1"), None);
        assert_eq!(leading_integer(""), None);
    }
}
