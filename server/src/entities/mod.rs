pub mod recording;
pub mod safe_zone;
pub mod user;

use sea_orm::{ActiveValue, Value};

/// Value an active model field will hold after the write, if known.
pub(crate) fn present<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}
