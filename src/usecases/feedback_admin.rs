use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::feedback::{FeedbackEntity, UpdateFeedbackModerationEntity},
    repositories::feedback::FeedbackRepository,
    value_objects::{
        feedback::{
            ExportFormat, FeedbackFilter, FeedbackModel, FeedbackQuery, FeedbackSort,
            FeedbackSortField, SortOrder, UpdateFeedbackRequest,
        },
        feedback_analytics::{FeedbackStats, TrendPoint, build_trends},
        pagination::{PageRequest, Paginated},
    },
};

use super::feedback::{FeedbackError, UseCaseResult};

pub const CSV_HEADER: &str =
    "id,user_id,text,sentiment,confidence,priority,category,is_reviewed,is_addressed,created_at";

/// Rendered export ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackExport {
    pub content_type: &'static str,
    pub filename: String,
    pub body: String,
}

pub struct FeedbackAdminUseCase<F>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    feedback_repo: Arc<F>,
}

impl<F> FeedbackAdminUseCase<F>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    pub fn new(feedback_repo: Arc<F>) -> Self {
        Self { feedback_repo }
    }

    pub async fn list(&self, query: FeedbackQuery) -> UseCaseResult<Paginated<FeedbackModel>> {
        let filter = Self::filter(&query)?;
        let sort = query.sort();
        let page = PageRequest::new(query.page, query.limit);
        info!(
            ?filter,
            ?sort,
            page = page.page,
            limit = page.limit,
            "feedback_admin: list requested"
        );

        let (rows, total) = self
            .feedback_repo
            .list(filter, sort, page)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "feedback_admin: failed to list feedback");
                FeedbackError::Internal(err)
            })?;

        let items = rows
            .into_iter()
            .map(FeedbackModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn get(&self, feedback_id: Uuid) -> UseCaseResult<FeedbackModel> {
        let entity = self
            .feedback_repo
            .find_active_by_id(feedback_id)
            .await
            .map_err(|err| {
                error!(%feedback_id, db_error = ?err, "feedback_admin: failed to load feedback");
                FeedbackError::Internal(err)
            })?
            .ok_or(FeedbackError::NotFound)?;

        Ok(FeedbackModel::try_from(entity)?)
    }

    pub async fn stats(&self, query: FeedbackQuery) -> UseCaseResult<FeedbackStats> {
        let entries = self
            .matching(Self::filter(&query)?, FeedbackSort::default())
            .await?;
        let stats = FeedbackStats::from_entries(&entries);
        info!(total = stats.total, "feedback_admin: stats computed");
        Ok(stats)
    }

    pub async fn trends(&self, query: FeedbackQuery) -> UseCaseResult<Vec<TrendPoint>> {
        let interval = query.interval.unwrap_or_default();
        let sort = FeedbackSort {
            field: FeedbackSortField::CreatedAt,
            order: SortOrder::Asc,
        };
        let entries = self.matching(Self::filter(&query)?, sort).await?;
        let trends = build_trends(&entries, interval);
        info!(
            ?interval,
            buckets = trends.len(),
            "feedback_admin: trends computed"
        );
        Ok(trends)
    }

    pub async fn export(&self, query: FeedbackQuery) -> UseCaseResult<FeedbackExport> {
        let format = query.format.unwrap_or_default();
        let entries = self.matching(Self::filter(&query)?, query.sort()).await?;
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        info!(?format, rows = entries.len(), "feedback_admin: export generated");

        match format {
            ExportFormat::Csv => Ok(FeedbackExport {
                content_type: "text/csv; charset=utf-8",
                filename: format!("feedback-{}.csv", stamp),
                body: render_csv(&entries),
            }),
            ExportFormat::Json => {
                let models = entries
                    .into_iter()
                    .map(FeedbackModel::try_from)
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let body = serde_json::to_string_pretty(&models)
                    .map_err(|err| FeedbackError::Internal(err.into()))?;
                Ok(FeedbackExport {
                    content_type: "application/json",
                    filename: format!("feedback-{}.json", stamp),
                    body,
                })
            }
        }
    }

    /// Applies moderation changes. Marking reviewed or addressed stamps the time and
    /// records the acting admin as responder.
    pub async fn update(
        &self,
        feedback_id: Uuid,
        admin_id: Uuid,
        request: UpdateFeedbackRequest,
    ) -> UseCaseResult<FeedbackModel> {
        if request.is_empty() {
            return Err(FeedbackError::EmptyUpdate);
        }

        let now = Utc::now();
        let mut changes = UpdateFeedbackModerationEntity {
            is_reviewed: request.is_reviewed,
            is_addressed: request.is_addressed,
            admin_response: request
                .admin_response
                .map(|response| response.trim().to_string()),
            priority: request.priority.map(|priority| priority.to_string()),
            category: request.category.map(|category| category.to_string()),
            updated_at: Some(now),
            ..Default::default()
        };
        if request.is_reviewed == Some(true) {
            changes.reviewed_at = Some(now);
            changes.responded_by = Some(admin_id);
        }
        if request.is_addressed == Some(true) {
            changes.addressed_at = Some(now);
            changes.responded_by = Some(admin_id);
        }
        if changes.admin_response.is_some() {
            changes.responded_by = Some(admin_id);
        }

        let entity = self
            .feedback_repo
            .update_moderation(feedback_id, changes)
            .await
            .map_err(|err| {
                error!(%feedback_id, db_error = ?err, "feedback_admin: failed to update feedback");
                FeedbackError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%feedback_id, "feedback_admin: update target not found");
                FeedbackError::NotFound
            })?;

        info!(%feedback_id, %admin_id, "feedback_admin: moderation updated");
        Ok(FeedbackModel::try_from(entity)?)
    }

    pub async fn delete(&self, feedback_id: Uuid, admin_id: Uuid) -> UseCaseResult<()> {
        let deleted = self
            .feedback_repo
            .soft_delete(feedback_id)
            .await
            .map_err(|err| {
                error!(%feedback_id, db_error = ?err, "feedback_admin: failed to delete feedback");
                FeedbackError::Internal(err)
            })?;
        if !deleted {
            return Err(FeedbackError::NotFound);
        }

        info!(%feedback_id, %admin_id, "feedback_admin: feedback deactivated");
        Ok(())
    }

    async fn matching(
        &self,
        filter: FeedbackFilter,
        sort: FeedbackSort,
    ) -> UseCaseResult<Vec<FeedbackEntity>> {
        self.feedback_repo
            .list_all(filter, sort)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "feedback_admin: failed to load feedback");
                FeedbackError::Internal(err)
            })
    }

    fn filter(query: &FeedbackQuery) -> UseCaseResult<FeedbackFilter> {
        query.filter().map_err(FeedbackError::InvalidQuery)
    }
}

pub fn render_csv(entries: &[FeedbackEntity]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + entries.len() * 128);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for entry in entries {
        let row = [
            entry.id.to_string(),
            entry.user_id.to_string(),
            quote_csv(&entry.text),
            entry.sentiment.clone(),
            entry.confidence.to_string(),
            entry.priority.clone(),
            entry.category.clone(),
            entry.is_reviewed.to_string(),
            entry.is_addressed.to_string(),
            entry.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn quote_csv(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
