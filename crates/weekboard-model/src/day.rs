//! Days of the week and task ordering.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A column of the weekly board.
///
/// Serialized as the lowercase English name. Payloads written by the first
/// version of the board keyed days by their Russian names; those are still
/// accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[serde(alias = "Понедельник")]
    Monday,
    #[serde(alias = "Вторник")]
    Tuesday,
    #[serde(alias = "Среда")]
    Wednesday,
    #[serde(alias = "Четверг")]
    Thursday,
    #[serde(alias = "Пятница")]
    Friday,
    #[serde(alias = "Суббота")]
    Saturday,
    #[serde(alias = "Воскресенье")]
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a day name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day: {0}")]
pub struct ParseWeekdayError(String);

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    /// Accepts full names and three-letter abbreviations, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_lowercase();
                name == lower || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| ParseWeekdayError(s.to_owned()))
    }
}

/// How tasks within a day are ordered. Pinned tasks always come first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Oldest first.
    #[default]
    Created,
    /// By title.
    Alpha,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Alpha => "alpha",
        })
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "alpha" => Ok(Self::Alpha),
            other => Err(format!("unknown sort mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday() {
        assert_eq!("monday".parse(), Ok(Weekday::Monday));
        assert_eq!("Wed".parse(), Ok(Weekday::Wednesday));
        assert_eq!(" SUNDAY ".parse(), Ok(Weekday::Sunday));
        assert!("mo".parse::<Weekday>().is_err());
        assert!("someday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_weekday_serde() {
        assert_eq!(serde_json::to_string(&Weekday::Friday).unwrap(), r#""friday""#);
        let legacy: Weekday = serde_json::from_str(r#""Пятница""#).unwrap();
        assert_eq!(legacy, Weekday::Friday);
    }

    #[test]
    fn test_sort_mode() {
        assert_eq!(SortMode::default(), SortMode::Created);
        assert_eq!("alpha".parse(), Ok(SortMode::Alpha));
        assert_eq!(serde_json::to_string(&SortMode::Alpha).unwrap(), r#""alpha""#);
    }
}
