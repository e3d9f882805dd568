use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::users},
};
use domain::{
    entities::users::{UpdateSubscriptionLevelEntity, UserEntity},
    repositories::users::UserRepository,
    value_objects::{enums::plan_types::PlanType, pagination::PageRequest},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(subscription_level: Option<PlanType>) -> users::BoxedQuery<'static, Pg> {
        let mut query = users::table.into_boxed();
        if let Some(level) = subscription_level {
            query = query.filter(users::subscription_level.eq(level.as_str()));
        }
        query
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::id.eq(user_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(
        &self,
        subscription_level: Option<PlanType>,
        page: PageRequest,
    ) -> Result<(Vec<UserEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(subscription_level)
            .count()
            .get_result::<i64>(&mut conn)?;

        let results = Self::filtered(subscription_level)
            .order(users::created_at.desc())
            .then_order_by(users::id.asc())
            .limit(page.limit)
            .offset(page.offset())
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn update_subscription_level(
        &self,
        user_id: Uuid,
        subscription_level: Option<PlanType>,
    ) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(users::table)
            .filter(users::id.eq(user_id))
            .set(&UpdateSubscriptionLevelEntity {
                subscription_level: subscription_level.map(|level| level.to_string()),
                updated_at: Utc::now(),
            })
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
