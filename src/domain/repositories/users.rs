use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::users::UserEntity,
    value_objects::{enums::plan_types::PlanType, pagination::PageRequest},
};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;

    async fn list(
        &self,
        subscription_level: Option<PlanType>,
        page: PageRequest,
    ) -> Result<(Vec<UserEntity>, i64)>;

    /// Returns the updated row, or `None` when the user does not exist.
    async fn update_subscription_level(
        &self,
        user_id: Uuid,
        subscription_level: Option<PlanType>,
    ) -> Result<Option<UserEntity>>;
}
