use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::feedback::{FeedbackEntity, InsertFeedbackEntity, UpdateFeedbackModerationEntity},
    value_objects::{
        feedback::{FeedbackFilter, FeedbackSort},
        pagination::PageRequest,
    },
};

#[automock]
#[async_trait]
pub trait FeedbackRepository {
    async fn insert(&self, insert_feedback_entity: InsertFeedbackEntity) -> Result<FeedbackEntity>;

    async fn find_active_by_id(&self, feedback_id: Uuid) -> Result<Option<FeedbackEntity>>;

    async fn list(
        &self,
        filter: FeedbackFilter,
        sort: FeedbackSort,
        page: PageRequest,
    ) -> Result<(Vec<FeedbackEntity>, i64)>;

    /// Every active row matching `filter`, for stats, trends and export.
    async fn list_all(&self, filter: FeedbackFilter, sort: FeedbackSort)
    -> Result<Vec<FeedbackEntity>>;

    /// Returns the updated row, or `None` when no active feedback has this id.
    async fn update_moderation(
        &self,
        feedback_id: Uuid,
        changes: UpdateFeedbackModerationEntity,
    ) -> Result<Option<FeedbackEntity>>;

    /// Clears the active flag. Returns `false` when no active feedback has this id.
    async fn soft_delete(&self, feedback_id: Uuid) -> Result<bool>;
}
