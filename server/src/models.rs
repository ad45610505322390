use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validation::ValidationError;

// ─── Entity model aliases ───

pub use crate::entities::recording::Model as Recording;
pub use crate::entities::safe_zone::Model as SafeZone;
pub use crate::entities::user::Model as User;

// ─── Account types ───

/// Standard account identity shared by every user record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identity {
    pub username: String,
    /// Plaintext; hashed before it reaches the `password` column.
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// Profile fields layered on top of the identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub nickname: String,
    pub location: String,
}

// ─── Weekday set ───

const ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Stored label for each weekday, Monday first.
const LABELS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

fn label(day: Weekday) -> &'static str {
    LABELS[day.num_days_from_monday() as usize]
}

fn parse_day(token: &str) -> Result<Weekday, ValidationError> {
    let korean = token.strip_suffix("요일").unwrap_or(token);
    if let Some(idx) = LABELS.iter().position(|l| *l == korean) {
        return Ok(ORDER[idx]);
    }
    Weekday::from_str(token).map_err(|_| ValidationError::UnknownWeekday(token.to_string()))
}

/// Set of weekdays a safe zone applies to, kept in Monday-first order without
/// duplicates. Stored as comma-delimited labels, e.g. `월,화,수,목,금`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaysActive(Vec<Weekday>);

impl DaysActive {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut mask = [false; 7];
        for day in days {
            mask[day.num_days_from_monday() as usize] = true;
        }
        Self(
            ORDER
                .iter()
                .zip(mask)
                .filter_map(|(day, on)| on.then_some(*day))
                .collect(),
        )
    }

    /// Monday through Friday.
    pub fn weekdays() -> Self {
        Self(ORDER[..5].to_vec())
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }
}

impl Default for DaysActive {
    fn default() -> Self {
        Self::weekdays()
    }
}

impl fmt::Display for DaysActive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(|d| label(*d)).collect();
        f.write_str(&labels.join(","))
    }
}

impl FromStr for DaysActive {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(parse_day)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(days))
    }
}

impl Serialize for DaysActive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DaysActive {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
