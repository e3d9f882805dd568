use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::UserEntity,
    value_objects::enums::{plan_types::PlanType, user_roles::UserRole},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub subscription_level: Option<PlanType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            role: UserRole::from_str(&entity.role),
            subscription_level: entity
                .subscription_level
                .as_deref()
                .and_then(PlanType::from_str),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub subscription_level: Option<PlanType>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `null` clears the level.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubscriptionLevelRequest {
    pub subscription_level: Option<PlanType>,
}

/// Splits a display name into the first/last name pair the checkout form wants.
pub fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}
