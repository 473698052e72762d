//! Administrator-chosen date/time windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::utils::time::{parse_time_label, TimeOfDay};

/// Window as typed into the filter form. Every field may still be blank, and
/// nothing is parsed until [`WindowInput::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WindowInput {
    #[serde(default)]
    #[schema(format = Date, example = "2025-10-18")]
    pub from_date: Option<String>,
    #[serde(default)]
    #[schema(example = "08:00 AM")]
    pub from_time: Option<String>,
    #[serde(default)]
    #[schema(format = Date, example = "2025-10-20")]
    pub to_date: Option<String>,
    #[serde(default)]
    #[schema(example = "04:00 PM")]
    pub to_time: Option<String>,
}

impl WindowInput {
    /// Checks completeness, then the dates, then the time labels, then date
    /// ordering.
    pub fn validate(&self) -> Result<DateTimeWindow, CoreError> {
        let fields = [
            ("from_date", non_blank(&self.from_date)),
            ("from_time", non_blank(&self.from_time)),
            ("to_date", non_blank(&self.to_date)),
            ("to_time", non_blank(&self.to_time)),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        match fields.map(|(_, value)| value) {
            [Some(from_date), Some(from_time), Some(to_date), Some(to_time)] => {
                let from_date = parse_date(from_date)?;
                let to_date = parse_date(to_date)?;
                DateTimeWindow::new(
                    from_date,
                    parse_time_label(from_time)?,
                    to_date,
                    parse_time_label(to_time)?,
                )
            }
            _ => Err(CoreError::IncompleteWindow { missing }),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CoreError::MalformedDate(value.to_string()))
}

/// A validated `[from, to]` window over leaving timestamps.
///
/// `from_date <= to_date` always holds. The time bounds only constrain the
/// boundary days; when both dates are equal they bound the same day from
/// both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DateTimeWindow {
    #[schema(value_type = String, format = Date)]
    from_date: NaiveDate,
    from_time: TimeOfDay,
    #[schema(value_type = String, format = Date)]
    to_date: NaiveDate,
    to_time: TimeOfDay,
}

impl DateTimeWindow {
    pub fn new(
        from_date: NaiveDate,
        from_time: TimeOfDay,
        to_date: NaiveDate,
        to_time: TimeOfDay,
    ) -> Result<Self, CoreError> {
        if from_date > to_date {
            return Err(CoreError::InvertedWindow {
                from: from_date,
                to: to_date,
            });
        }
        Ok(Self {
            from_date,
            from_time,
            to_date,
            to_time,
        })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn from_time(&self) -> TimeOfDay {
        self.from_time
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }

    pub fn to_time(&self) -> TimeOfDay {
        self.to_time
    }

    pub fn is_single_day(&self) -> bool {
        self.from_date == self.to_date
    }
}

impl From<DateTimeWindow> for WindowInput {
    fn from(window: DateTimeWindow) -> Self {
        Self {
            from_date: Some(window.from_date.format("%Y-%m-%d").to_string()),
            from_time: Some(window.from_time.to_label()),
            to_date: Some(window.to_date.format("%Y-%m-%d").to_string()),
            to_time: Some(window.to_time.to_label()),
        }
    }
}
