pub use argon2::password_hash;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{self, Set};
use serde::{Deserialize, Serialize};

use super::present;
use crate::models::{Identity, Profile};
use crate::password;
use crate::validation::{self, ValidationError};

pub const USERNAME_MAX: usize = 150;
pub const NAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const NICKNAME_MAX: usize = 50;
pub const LOCATION_MAX: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(skip_serializing)]
    pub password: String,
    pub last_login: Option<DateTimeUtc>,
    pub is_superuser: bool,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
    pub nickname: String,
    pub location: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::recording::Entity")]
    Recording,
}

impl Related<super::recording::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recording.def()
    }
}

/// Build an insertable account from its identity and profile parts.
/// Timestamps are filled in on insert.
pub fn new_account(identity: Identity, profile: Profile) -> Result<ActiveModel, password_hash::Error> {
    Ok(ActiveModel {
        password: Set(password::hash_password(&identity.password)?),
        last_login: Set(None),
        is_superuser: Set(identity.is_superuser),
        username: Set(identity.username),
        first_name: Set(identity.first_name),
        last_name: Set(identity.last_name),
        email: Set(identity.email),
        is_staff: Set(identity.is_staff),
        is_active: Set(true),
        nickname: Set(profile.nickname),
        location: Set(profile.location),
        ..Default::default()
    })
}

impl Model {
    pub fn check_password(&self, candidate: &str) -> bool {
        password::verify_password(candidate, &self.password)
    }

    /// The user's recording slot, if filled.
    pub async fn recording<C>(&self, db: &C) -> Result<Option<super::recording::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.find_related(super::recording::Entity).one(db).await
    }
}

impl ActiveModel {
    pub fn change_password(&mut self, plain: &str) -> Result<(), password_hash::Error> {
        self.password = Set(password::hash_password(plain)?);
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(username) = present(&self.username) {
            validation::non_empty("username", username)?;
            validation::max_chars("username", username, USERNAME_MAX)?;
        }
        if let Some(first_name) = present(&self.first_name) {
            validation::max_chars("first_name", first_name, NAME_MAX)?;
        }
        if let Some(last_name) = present(&self.last_name) {
            validation::max_chars("last_name", last_name, NAME_MAX)?;
        }
        if let Some(email) = present(&self.email) {
            validation::max_chars("email", email, EMAIL_MAX)?;
        }
        if let Some(nickname) = present(&self.nickname) {
            validation::max_chars("nickname", nickname, NICKNAME_MAX)?;
        }
        if let Some(location) = present(&self.location) {
            validation::max_chars("location", location, LOCATION_MAX)?;
        }
        Ok(())
    }
}

/// Next `updated_at`: the current time, or one microsecond past the stored
/// value when the clock has not moved beyond it.
fn advance(previous: Option<DateTimeUtc>, now: DateTimeUtc) -> DateTimeUtc {
    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

async fn stored_updated_at<C>(db: &C, id: &ActiveValue<i32>) -> Result<Option<DateTimeUtc>, DbErr>
where
    C: ConnectionTrait,
{
    let Some(id) = present(id) else {
        return Ok(None);
    };
    Ok(Entity::find_by_id(*id).one(db).await?.map(|m| m.updated_at))
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.validate()?;

        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
            self.updated_at = Set(now);
            if self.date_joined.is_not_set() {
                self.date_joined = Set(now);
            }
            return Ok(self);
        }

        if self.created_at.is_set() {
            return Err(ValidationError::Immutable("created_at").into());
        }
        // The stored row is the only reference; caller-supplied values are ignored
        let stored = stored_updated_at(db, &self.id).await?;
        self.updated_at = Set(advance(stored, now));
        tracing::debug!(user_id = ?present(&self.id), "Updating user");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_forward_with_clock() {
        let prev = Utc::now();
        let later = prev + Duration::seconds(5);
        assert_eq!(advance(Some(prev), later), later);
        assert_eq!(advance(None, later), later);
    }

    #[test]
    fn test_advance_when_clock_stalls() {
        let prev = Utc::now();
        assert_eq!(advance(Some(prev), prev), prev + Duration::microseconds(1));
        let earlier = prev - Duration::seconds(1);
        assert_eq!(advance(Some(prev), earlier), prev + Duration::microseconds(1));
    }

    #[test]
    fn test_new_account_hashes_password() {
        let identity = Identity {
            username: "minji".to_string(),
            password: "s3cret!!".to_string(),
            ..Default::default()
        };
        let profile = Profile {
            nickname: "MJ".to_string(),
            location: "Seoul".to_string(),
        };
        let account = new_account(identity, profile).unwrap();
        let hash = present(&account.password).unwrap();
        assert_ne!(hash, "s3cret!!");
        assert!(password::verify_password("s3cret!!", hash));
        assert!(account.created_at.is_not_set());
        assert_eq!(present(&account.is_active), Some(&true));
    }

    #[test]
    fn test_change_password_replaces_hash() {
        let mut account = <ActiveModel as Default>::default();
        account.change_password("first-pass").unwrap();
        let first = present(&account.password).cloned().unwrap();
        account.change_password("second-pass").unwrap();
        let second = present(&account.password).unwrap();
        assert!(!password::verify_password("first-pass", second));
        assert!(password::verify_password("first-pass", &first));
    }

    #[test]
    fn test_validate_rejects_long_nickname() {
        let account = ActiveModel {
            username: Set("minji".to_string()),
            nickname: Set("n".repeat(NICKNAME_MAX + 1)),
            ..Default::default()
        };
        assert!(matches!(
            account.validate(),
            Err(ValidationError::TooLong { field: "nickname", .. })
        ));
    }
}
