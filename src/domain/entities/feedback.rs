use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::feedback;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = feedback)]
pub struct FeedbackEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub sentiment: String,
    pub confidence: f64,
    pub classification_source: String,
    pub is_active: bool,
    pub is_reviewed: bool,
    pub is_addressed: bool,
    pub admin_response: Option<String>,
    pub responded_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub addressed_at: Option<DateTime<Utc>>,
    pub priority: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = feedback)]
pub struct InsertFeedbackEntity {
    pub user_id: Uuid,
    pub text: String,
    pub sentiment: String,
    pub confidence: f64,
    pub classification_source: String,
    pub is_active: bool,
    pub is_reviewed: bool,
    pub is_addressed: bool,
    pub priority: String,
    pub category: String,
}

/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = feedback)]
pub struct UpdateFeedbackModerationEntity {
    pub is_reviewed: Option<bool>,
    pub is_addressed: Option<bool>,
    pub admin_response: Option<String>,
    pub responded_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub addressed_at: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
