use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    value_objects::{
        enums::{plan_types::PlanType, subscription_statuses::SubscriptionStatus},
        money::format_minor_units,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePaymentRequest {
    pub plan_type: PlanType,
    pub amount: f64,
}

/// Everything the PayHere hosted checkout form expects.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentFormFields {
    pub merchant_id: String,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    pub order_id: String,
    pub items: String,
    pub amount: String,
    pub currency: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub hash: String,
    pub custom_1: String,
    pub custom_2: String,
}

/// Form body PayHere posts to the notify URL.
#[derive(Debug, Clone, Deserialize)]
pub struct PayHereNotification {
    pub merchant_id: String,
    pub order_id: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub payhere_amount: String,
    pub payhere_currency: String,
    pub status_code: i32,
    pub md5sig: String,
    #[serde(default)]
    pub custom_1: Option<String>,
    #[serde(default)]
    pub custom_2: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Updated {
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    },
    Unchanged {
        status: SubscriptionStatus,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_type: PlanType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub order_id: String,
    pub payment_id: Option<String>,
    pub amount: String,
    pub currency: String,
    pub status: SubscriptionStatus,
    pub status_message: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionEntity> for SubscriptionModel {
    type Error = anyhow::Error;

    fn try_from(entity: SubscriptionEntity) -> Result<Self> {
        let plan_type = PlanType::from_str(&entity.plan_type)
            .ok_or_else(|| anyhow!("unknown plan type in storage: {}", entity.plan_type))?;
        let status = SubscriptionStatus::from_str(&entity.status)
            .ok_or_else(|| anyhow!("unknown subscription status in storage: {}", entity.status))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_type,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            order_id: entity.order_id,
            payment_id: entity.payment_id,
            amount: format_minor_units(entity.amount_minor),
            currency: entity.currency,
            status,
            status_message: entity.status_message,
            rejection_reason: entity.rejection_reason,
            approved_at: entity.approved_at,
            approved_by: entity.approved_by,
            rejected_at: entity.rejected_at,
            rejected_by: entity.rejected_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionListQuery {
    pub status: Option<SubscriptionStatus>,
    pub plan_type: Option<PlanType>,
    pub user_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionFilter {
    pub status: Option<SubscriptionStatus>,
    pub plan_type: Option<PlanType>,
    pub user_id: Option<Uuid>,
}

impl SubscriptionListQuery {
    pub fn filter(&self) -> SubscriptionFilter {
        SubscriptionFilter {
            status: self.status,
            plan_type: self.plan_type,
            user_id: self.user_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectSubscriptionRequest {
    pub reason: Option<String>,
}
