use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::feedback::FeedbackEntity,
    value_objects::enums::{
        feedback_tags::{FeedbackCategory, FeedbackPriority},
        sentiments::{ClassificationSource, ConfidenceLevel, Sentiment},
    },
};

pub const MIN_FEEDBACK_CHARS: usize = 3;
pub const MAX_FEEDBACK_CHARS: usize = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub classification_source: ClassificationSource,
    pub is_reviewed: bool,
    pub is_addressed: bool,
    pub admin_response: Option<String>,
    pub responded_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub addressed_at: Option<DateTime<Utc>>,
    pub priority: FeedbackPriority,
    pub category: FeedbackCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FeedbackEntity> for FeedbackModel {
    type Error = anyhow::Error;

    fn try_from(entity: FeedbackEntity) -> Result<Self> {
        let sentiment = Sentiment::from_str(&entity.sentiment)
            .ok_or_else(|| anyhow!("unknown sentiment in storage: {}", entity.sentiment))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            text: entity.text,
            sentiment,
            confidence: entity.confidence,
            confidence_level: ConfidenceLevel::of(entity.confidence),
            classification_source: ClassificationSource::from_str(&entity.classification_source),
            is_reviewed: entity.is_reviewed,
            is_addressed: entity.is_addressed,
            admin_response: entity.admin_response,
            responded_by: entity.responded_by,
            reviewed_at: entity.reviewed_at,
            addressed_at: entity.addressed_at,
            priority: FeedbackPriority::from_str(&entity.priority).unwrap_or_default(),
            category: FeedbackCategory::from_str(&entity.category).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSortField {
    #[default]
    CreatedAt,
    Confidence,
    Sentiment,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackSort {
    pub field: FeedbackSortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendInterval {
    #[default]
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Typed filter handed to the repository. Only active feedback is ever returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilter {
    pub user_id: Option<Uuid>,
    pub sentiment: Option<Sentiment>,
    pub confidence: Option<ConfidenceLevel>,
    /// Inclusive lower bound.
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub created_before: Option<DateTime<Utc>>,
    pub is_reviewed: Option<bool>,
    pub is_addressed: Option<bool>,
    pub priority: Option<FeedbackPriority>,
    pub category: Option<FeedbackCategory>,
    pub search: Option<String>,
}

/// Raw admin query string shared by list, stats, trends and export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackQuery {
    pub sentiment: Option<Sentiment>,
    pub confidence: Option<ConfidenceLevel>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_reviewed: Option<bool>,
    pub is_addressed: Option<bool>,
    pub priority: Option<FeedbackPriority>,
    pub category: Option<FeedbackCategory>,
    pub search: Option<String>,
    pub sort_by: Option<FeedbackSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub interval: Option<TrendInterval>,
    pub format: Option<ExportFormat>,
}

impl FeedbackQuery {
    /// Builds the repository filter; `end_date` covers the whole day.
    pub fn filter(&self) -> std::result::Result<FeedbackFilter, String> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err("start_date must not be after end_date".to_string());
            }
        }

        let created_from = self
            .start_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
        let created_before = match self.end_date {
            Some(date) => Some(
                date.and_hms_opt(0, 0, 0)
                    .and_then(|naive| naive.and_utc().checked_add_signed(Duration::days(1)))
                    .ok_or_else(|| "end_date out of range".to_string())?,
            ),
            None => None,
        };

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);

        Ok(FeedbackFilter {
            user_id: None,
            sentiment: self.sentiment,
            confidence: self.confidence,
            created_from,
            created_before,
            is_reviewed: self.is_reviewed,
            is_addressed: self.is_addressed,
            priority: self.priority,
            category: self.category,
            search,
        })
    }

    pub fn sort(&self) -> FeedbackSort {
        FeedbackSort {
            field: self.sort_by.unwrap_or_default(),
            order: self.sort_order.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFeedbackRequest {
    pub is_reviewed: Option<bool>,
    pub is_addressed: Option<bool>,
    pub admin_response: Option<String>,
    pub priority: Option<FeedbackPriority>,
    pub category: Option<FeedbackCategory>,
}

impl UpdateFeedbackRequest {
    pub fn is_empty(&self) -> bool {
        self.is_reviewed.is_none()
            && self.is_addressed.is_none()
            && self.admin_response.is_none()
            && self.priority.is_none()
            && self.category.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyFeedbackQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Trims and collapses runs of whitespace the same way the classifier script does.
pub fn normalize_feedback_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_date_is_inclusive_of_the_whole_day() {
        let query = FeedbackQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
            ..Default::default()
        };

        let filter = query.filter().unwrap();

        assert_eq!(
            filter.created_from.unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
        assert_eq!(
            filter.created_before.unwrap().to_rfc3339(),
            "2024-04-01T00:00:00+00:00"
        );
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let query = FeedbackQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };

        assert!(query.filter().is_err());
    }

    #[test]
    fn end_date_at_the_calendar_limit_is_rejected() {
        let query = FeedbackQuery {
            end_date: Some(NaiveDate::MAX),
            ..Default::default()
        };

        assert_eq!(query.filter().unwrap_err(), "end_date out of range");
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = FeedbackQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };

        assert_eq!(query.filter().unwrap().search, None);
    }

    #[test]
    fn sort_defaults_to_newest_first() {
        let sort = FeedbackQuery::default().sort();
        assert_eq!(sort.field, FeedbackSortField::CreatedAt);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_feedback_text("  great \n\n app\tthanks "), "great app thanks");
    }
}
