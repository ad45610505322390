use chrono::NaiveTime;
use sea_orm::DbErr;
use thiserror::Error;

/// Field-level constraint violations caught before a row is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("start_time {start} must be before end_time {end}")]
    InvertedWindow { start: NaiveTime, end: NaiveTime },

    #[error("unknown weekday label: {0:?}")]
    UnknownWeekday(String),

    #[error("{0} cannot be changed once written")]
    Immutable(&'static str),
}

impl From<ValidationError> for DbErr {
    fn from(err: ValidationError) -> Self {
        DbErr::Custom(err.to_string())
    }
}

/// Character limit check, counted in chars like a `VARCHAR(n)` column.
pub fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub fn non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

pub fn ordered_window(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if start >= end {
        return Err(ValidationError::InvertedWindow { start, end });
    }
    Ok(())
}
