//! Wall-clock helpers and the 12-hour time label parser.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::CoreError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes since midnight, always in `0..=1439`.
///
/// Only ever produced by parsing a 12-hour label (`"08:15 AM"`), and rendered
/// back in the same form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "08:00 AM")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Renders the `HH:MM AM|PM` form the parser accepts.
    pub fn to_label(self) -> String {
        let hour24 = self.0 / 60;
        let minute = self.0 % 60;
        let (hour12, marker) = match hour24 {
            0 => (12, "AM"),
            1..=11 => (hour24, "AM"),
            12 => (12, "PM"),
            _ => (hour24 - 12, "PM"),
        };
        format!("{:02}:{:02} {}", hour12, minute, marker)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_label())
    }
}

impl FromStr for TimeOfDay {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_label(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_time_label(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_label()
    }
}

/// Parses `HH:MM AM|PM` (hour 1-12, minute 00-59) into minutes since midnight.
///
/// `12:xx AM` is the first hour of the day and `12:xx PM` is noon. Anything
/// else, including 24-hour input such as `"17:00"`, is rejected.
pub fn parse_time_label(label: &str) -> Result<TimeOfDay, CoreError> {
    let malformed = || CoreError::MalformedTimeLabel(label.to_string());

    let (clock, marker) = label.trim().split_once(' ').ok_or_else(malformed)?;
    let (hour, minute) = clock.split_once(':').ok_or_else(malformed)?;

    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return Err(malformed());
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let hour: u16 = hour.parse().map_err(|_| malformed())?;
    let minute: u16 = minute.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(malformed());
    }

    let hour24 = if marker.eq_ignore_ascii_case("AM") {
        if hour == 12 {
            0
        } else {
            hour
        }
    } else if marker.eq_ignore_ascii_case("PM") {
        if hour == 12 {
            12
        } else {
            hour + 12
        }
    } else {
        return Err(malformed());
    };

    Ok(TimeOfDay(hour24 * 60 + minute))
}

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns the current UTC time, aligned with the configured timezone.
pub fn now_utc(tz: &Tz) -> DateTime<Utc> {
    now_in_timezone(tz).with_timezone(&Utc)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(label: &str) -> u16 {
        parse_time_label(label).unwrap().minutes()
    }

    #[test]
    fn midnight_noon_and_last_minute() {
        assert_eq!(minutes("12:00 AM"), 0);
        assert_eq!(minutes("12:00 PM"), 720);
        assert_eq!(minutes("11:59 PM"), 1439);
        assert_eq!(minutes("01:00 AM"), 60);
        assert_eq!(minutes("12:30 AM"), 30);
        assert_eq!(minutes("04:00 PM"), 960);
    }

    #[test]
    fn single_digit_hour_and_lowercase_marker_accepted() {
        assert_eq!(minutes("8:15 am"), 495);
        assert_eq!(minutes(" 07:45 AM "), 465);
    }

    #[test]
    fn malformed_labels_rejected() {
        for label in [
            "", "08:00", "0800 AM", "13:00 PM", "00:30 AM", "08:60 AM", "08:5 AM", "08:00 XM",
            "-1:00 AM", "+8:00 AM", "08:00AM", "17:00:00",
        ] {
            assert!(
                matches!(parse_time_label(label), Err(CoreError::MalformedTimeLabel(_))),
                "{label:?} should be rejected"
            );
        }
    }

    #[test]
    fn label_rendering_is_canonical() {
        for label in ["12:00 AM", "12:00 PM", "11:59 PM", "01:05 AM", "06:15 PM"] {
            assert_eq!(parse_time_label(label).unwrap().to_label(), label);
        }
    }

    #[test]
    fn serde_uses_label_form() {
        let time: TimeOfDay = serde_json::from_str("\"09:15 AM\"").unwrap();
        assert_eq!(time.minutes(), 555);
        assert_eq!(serde_json::to_value(time).unwrap(), serde_json::json!("09:15 AM"));
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00 PM\"").is_err());
    }

    #[test]
    fn from_minutes_bounds() {
        assert!(TimeOfDay::from_minutes(1439).is_some());
        assert!(TimeOfDay::from_minutes(1440).is_none());
    }

    #[test]
    fn now_utc_is_close_to_utc_now() {
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let diff = (now_utc(&tz) - Utc::now()).num_seconds().abs();
        assert!(diff < 2);
    }
}
