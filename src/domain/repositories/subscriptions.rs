use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, PaymentNotificationEntity, SubscriptionEntity,
    },
    value_objects::{
        enums::{plan_types::PlanType, subscription_statuses::SubscriptionStatus},
        pagination::PageRequest, subscriptions::SubscriptionFilter,
    },
};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn create(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<SubscriptionEntity>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>>;

    async fn list(
        &self,
        filter: SubscriptionFilter,
        page: PageRequest,
    ) -> Result<(Vec<SubscriptionEntity>, i64)>;

    /// Applies a provider notification. Returns `false` when the row is no longer
    /// in `expected_status`, so a concurrent change is never overwritten.
    async fn apply_payment_notification(
        &self,
        subscription_id: Uuid,
        expected_status: SubscriptionStatus,
        changes: PaymentNotificationEntity,
    ) -> Result<bool>;

    /// Marks the subscription `success` and copies `plan_type` onto the owner's
    /// subscription level in one transaction. Returns `false` when the row is no
    /// longer awaiting review.
    async fn approve(
        &self,
        subscription_id: Uuid,
        admin_id: Uuid,
        plan_type: PlanType,
    ) -> Result<bool>;

    /// Marks the subscription `failed`. Returns `false` when the row is no longer
    /// awaiting review.
    async fn reject(
        &self,
        subscription_id: Uuid,
        admin_id: Uuid,
        reason: Option<String>,
    ) -> Result<bool>;
}
