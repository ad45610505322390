use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use super::present;
use crate::validation::{self, ValidationError};

pub const NAME_MAX: usize = 255;

/// An audio recording. The owning user's id is the primary key, so each user
/// holds at most one recording.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recordings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub recording_name: String,
    /// Seconds
    pub recording_duration: i32,
    /// Bytes
    pub file_size: i64,
    #[sea_orm(column_type = "Text")]
    pub file_path: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Model {
    /// Display label, e.g. `evening walk (minji)`.
    pub fn label(&self, owner: &super::user::Model) -> String {
        format!("{} ({})", self.recording_name, owner.username)
    }

    pub async fn owner<C>(&self, db: &C) -> Result<Option<super::user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.find_related(super::user::Entity).one(db).await
    }
}

impl ActiveModel {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = present(&self.recording_name) {
            validation::max_chars("recording_name", name, NAME_MAX)?;
        }
        if let Some(duration) = present(&self.recording_duration) {
            validation::non_negative("recording_duration", i64::from(*duration))?;
        }
        if let Some(size) = present(&self.file_size) {
            validation::non_negative("file_size", *size)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // Stored recordings are only ever replaced by delete + insert
        if !insert {
            return Err(ValidationError::Immutable("recording").into());
        }
        self.validate()?;
        self.created_at = Set(Utc::now());
        tracing::debug!(user_id = ?present(&self.user_id), "Storing recording");
        Ok(self)
    }
}
