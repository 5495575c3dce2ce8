use std::fmt;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats the calendar day of `instant`, in the instant's own timezone, as `YYYY-MM-DD`.
pub fn format_day_key<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    format_date(instant.date_naive())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Key of one calendar day inside a completion history.
///
/// Keys built from dates are always zero-padded, so comparing two of them as strings
/// orders them chronologically. Keys coming from stored data are kept verbatim, even
/// when they are not valid dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format_date(date))
    }

    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(format_day_key(instant))
    }

    /// Key of the current local calendar day.
    pub fn today() -> Self {
        Self::from_instant(&Local::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the key back into a date. `None` for keys that did not come from a date.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DAY_KEY_FORMAT).ok()
    }

    /// Key of the previous calendar day, if this key is a valid date.
    pub fn previous(&self) -> Option<Self> {
        self.date()
            .and_then(|date| date.pred_opt())
            .map(Self::from_date)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<&str> for DayKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for DayKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for DayKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
