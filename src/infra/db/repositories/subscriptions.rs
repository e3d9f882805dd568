use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{subscriptions, users},
    },
};
use domain::{
    entities::{
        subscriptions::{
            ApproveSubscriptionEntity, InsertSubscriptionEntity, PaymentNotificationEntity,
            RejectSubscriptionEntity, SubscriptionEntity,
        },
        users::UpdateSubscriptionLevelEntity,
    },
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        enums::{plan_types::PlanType, subscription_statuses::SubscriptionStatus},
        pagination::PageRequest,
        subscriptions::SubscriptionFilter,
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(filter: &SubscriptionFilter) -> subscriptions::BoxedQuery<'static, Pg> {
        let mut query = subscriptions::table.into_boxed();

        if let Some(status) = filter.status {
            query = query.filter(subscriptions::status.eq(status.as_str()));
        }
        if let Some(plan_type) = filter.plan_type {
            query = query.filter(subscriptions::plan_type.eq(plan_type.as_str()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(subscriptions::user_id.eq(user_id));
        }

        query
    }

    fn reviewable_statuses() -> Vec<&'static str> {
        vec![
            SubscriptionStatus::Pending.as_str(),
            SubscriptionStatus::Paid.as_str(),
        ]
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::id.eq(subscription_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::order_id.eq(order_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .order(subscriptions::created_at.desc())
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list(
        &self,
        filter: SubscriptionFilter,
        page: PageRequest,
    ) -> Result<(Vec<SubscriptionEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let results = Self::filtered(&filter)
            .order(subscriptions::created_at.desc())
            .then_order_by(subscriptions::id.asc())
            .limit(page.limit)
            .offset(page.offset())
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn apply_payment_notification(
        &self,
        subscription_id: Uuid,
        expected_status: SubscriptionStatus,
        changes: PaymentNotificationEntity,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .filter(subscriptions::status.eq(expected_status.as_str()))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn approve(
        &self,
        subscription_id: Uuid,
        admin_id: Uuid,
        plan_type: PlanType,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        conn.transaction::<bool, anyhow::Error, _>(|conn| {
            let owner = update(subscriptions::table)
                .filter(subscriptions::id.eq(subscription_id))
                .filter(subscriptions::status.eq_any(Self::reviewable_statuses()))
                .set(&ApproveSubscriptionEntity {
                    status: SubscriptionStatus::Success.to_string(),
                    approved_at: Some(now),
                    approved_by: Some(admin_id),
                    updated_at: now,
                })
                .returning(subscriptions::user_id)
                .get_result::<Uuid>(conn)
                .optional()?;

            let Some(user_id) = owner else {
                return Ok(false);
            };

            let affected = update(users::table)
                .filter(users::id.eq(user_id))
                .set(&UpdateSubscriptionLevelEntity {
                    subscription_level: Some(plan_type.to_string()),
                    updated_at: now,
                })
                .execute(conn)?;

            if affected == 0 {
                bail!("subscription owner {} does not exist", user_id);
            }

            Ok(true)
        })
    }

    async fn reject(
        &self,
        subscription_id: Uuid,
        admin_id: Uuid,
        reason: Option<String>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let affected = update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .filter(subscriptions::status.eq_any(Self::reviewable_statuses()))
            .set(&RejectSubscriptionEntity {
                status: SubscriptionStatus::Failed.to_string(),
                rejection_reason: reason,
                rejected_at: Some(now),
                rejected_by: Some(admin_id),
                updated_at: now,
            })
            .execute(&mut conn)?;

        Ok(affected > 0)
    }
}
