use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, pg::Pg, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::feedback},
};
use domain::{
    entities::feedback::{FeedbackEntity, InsertFeedbackEntity, UpdateFeedbackModerationEntity},
    repositories::feedback::FeedbackRepository,
    value_objects::{
        feedback::{FeedbackFilter, FeedbackSort, FeedbackSortField, SortOrder},
        pagination::PageRequest,
    },
};

pub struct FeedbackPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl FeedbackPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered(filter: &FeedbackFilter) -> feedback::BoxedQuery<'static, Pg> {
        let mut query = feedback::table
            .filter(feedback::is_active.eq(true))
            .into_boxed();

        if let Some(user_id) = filter.user_id {
            query = query.filter(feedback::user_id.eq(user_id));
        }
        if let Some(sentiment) = filter.sentiment {
            query = query.filter(feedback::sentiment.eq(sentiment.as_str()));
        }
        if let Some(level) = filter.confidence {
            let (min, max) = level.bounds();
            query = query.filter(feedback::confidence.ge(min));
            if let Some(max) = max {
                query = query.filter(feedback::confidence.lt(max));
            }
        }
        if let Some(from) = filter.created_from {
            query = query.filter(feedback::created_at.ge(from));
        }
        if let Some(before) = filter.created_before {
            query = query.filter(feedback::created_at.lt(before));
        }
        if let Some(is_reviewed) = filter.is_reviewed {
            query = query.filter(feedback::is_reviewed.eq(is_reviewed));
        }
        if let Some(is_addressed) = filter.is_addressed {
            query = query.filter(feedback::is_addressed.eq(is_addressed));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(feedback::priority.eq(priority.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(feedback::category.eq(category.as_str()));
        }
        if let Some(search) = filter.search.as_deref() {
            query = query.filter(feedback::text.ilike(format!("%{}%", escape_like(search))));
        }

        query
    }

    fn sorted(
        query: feedback::BoxedQuery<'static, Pg>,
        sort: FeedbackSort,
    ) -> feedback::BoxedQuery<'static, Pg> {
        let query = match (sort.field, sort.order) {
            (FeedbackSortField::CreatedAt, SortOrder::Asc) => {
                query.order(feedback::created_at.asc())
            }
            (FeedbackSortField::CreatedAt, SortOrder::Desc) => {
                query.order(feedback::created_at.desc())
            }
            (FeedbackSortField::Confidence, SortOrder::Asc) => {
                query.order(feedback::confidence.asc())
            }
            (FeedbackSortField::Confidence, SortOrder::Desc) => {
                query.order(feedback::confidence.desc())
            }
            (FeedbackSortField::Sentiment, SortOrder::Asc) => {
                query.order(feedback::sentiment.asc())
            }
            (FeedbackSortField::Sentiment, SortOrder::Desc) => {
                query.order(feedback::sentiment.desc())
            }
        };

        // Tie-break on id so pages stay stable.
        query.then_order_by(feedback::id.asc())
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl FeedbackRepository for FeedbackPostgres {
    async fn insert(&self, insert_feedback_entity: InsertFeedbackEntity) -> Result<FeedbackEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(feedback::table)
            .values(&insert_feedback_entity)
            .returning(FeedbackEntity::as_returning())
            .get_result::<FeedbackEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_active_by_id(&self, feedback_id: Uuid) -> Result<Option<FeedbackEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = feedback::table
            .filter(feedback::id.eq(feedback_id))
            .filter(feedback::is_active.eq(true))
            .select(FeedbackEntity::as_select())
            .first::<FeedbackEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(
        &self,
        filter: FeedbackFilter,
        sort: FeedbackSort,
        page: PageRequest,
    ) -> Result<(Vec<FeedbackEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let results = Self::sorted(Self::filtered(&filter), sort)
            .limit(page.limit)
            .offset(page.offset())
            .select(FeedbackEntity::as_select())
            .load::<FeedbackEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn list_all(
        &self,
        filter: FeedbackFilter,
        sort: FeedbackSort,
    ) -> Result<Vec<FeedbackEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = Self::sorted(Self::filtered(&filter), sort)
            .select(FeedbackEntity::as_select())
            .load::<FeedbackEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_moderation(
        &self,
        feedback_id: Uuid,
        changes: UpdateFeedbackModerationEntity,
    ) -> Result<Option<FeedbackEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(feedback::table)
            .filter(feedback::id.eq(feedback_id))
            .filter(feedback::is_active.eq(true))
            .set(&changes)
            .returning(FeedbackEntity::as_returning())
            .get_result::<FeedbackEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn soft_delete(&self, feedback_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(feedback::table)
            .filter(feedback::id.eq(feedback_id))
            .filter(feedback::is_active.eq(true))
            .set((
                feedback::is_active.eq(false),
                feedback::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_neutralises_wildcards() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
