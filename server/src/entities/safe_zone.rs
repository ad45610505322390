use std::fmt;

use async_trait::async_trait;
use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{QueryOrder, Select};
use serde::{Deserialize, Serialize};

use super::present;
use crate::models::DaysActive;
use crate::validation::{self, ValidationError};

pub const DAYS_ACTIVE_MAX: usize = 20;

/// A daily time-of-day window active on a set of weekdays.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "safe_zones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_days_active")]
    pub days_active: String,
}

fn default_days_active() -> String {
    DaysActive::default().to_string()
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Newest safe zones first. There is no creation timestamp on this table, so
/// the auto-increment id stands in for insertion order.
pub fn find_recent() -> Select<Entity> {
    Entity::find().order_by_desc(Column::Id)
}

impl Model {
    pub fn days(&self) -> Result<DaysActive, ValidationError> {
        self.days_active.parse()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} ({})",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.days_active
        )
    }
}

impl ActiveModel {
    /// Normalize a newly written `days_active` to its stored form and check
    /// its length. Values already in the row are left alone.
    fn normalize_days(&mut self) -> Result<(), ValidationError> {
        let canonical = match &self.days_active {
            Set(raw) => raw.parse::<DaysActive>()?.to_string(),
            _ => return Ok(()),
        };
        validation::max_chars("days_active", &canonical, DAYS_ACTIVE_MAX)?;
        self.days_active = Set(canonical);
        Ok(())
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.days_active.is_not_set() {
            self.days_active = Set(default_days_active());
        }
        self.normalize_days()?;

        let mut start = present(&self.start_time).copied();
        let mut end = present(&self.end_time).copied();
        if !insert && (start.is_none() || end.is_none()) {
            if let Some(id) = present(&self.id) {
                if let Some(stored) = Entity::find_by_id(*id).one(db).await? {
                    start = start.or(Some(stored.start_time));
                    end = end.or(Some(stored.end_time));
                }
            }
        }
        if let (Some(start), Some(end)) = (start, end) {
            validation::ordered_window(start, end)?;
        }

        Ok(self)
    }
}
