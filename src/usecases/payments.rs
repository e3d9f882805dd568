use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::config_model::PayHereConfig,
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, PaymentNotificationEntity},
        repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
        value_objects::{
            enums::{payhere_statuses::PayHereStatus, subscription_statuses::SubscriptionStatus},
            money::{format_minor_units, to_minor_units},
            subscriptions::{
                InitiatePaymentRequest, NotificationOutcome, PayHereNotification,
                PaymentFormFields,
            },
            users::split_name,
        },
    },
    payments::payhere::PayHereSigner,
};

pub const SUBSCRIPTION_VALIDITY_DAYS: i64 = 365;
const CHECKOUT_COUNTRY: &str = "Sri Lanka";
const CHECKOUT_CITY: &str = "Colombo";
const CHECKOUT_ADDRESS: &str = "N/A";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("user not found")]
    UserNotFound,
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("invalid payment signature")]
    InvalidSignature,
    #[error("order not found")]
    OrderNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::UserNotFound | PaymentError::OrderNotFound => StatusCode::NOT_FOUND,
            PaymentError::InvalidAmount | PaymentError::InvalidSignature => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

pub struct PaymentUseCase<S, U>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    user_repo: Arc<U>,
    signer: PayHereSigner,
    payhere: PayHereConfig,
}

impl<S, U> PaymentUseCase<S, U>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, user_repo: Arc<U>, payhere: PayHereConfig) -> Self {
        Self {
            subscription_repo,
            user_repo,
            signer: PayHereSigner::from_config(&payhere),
            payhere,
        }
    }

    /// Creates a pending subscription and returns the signed checkout form.
    pub async fn initiate_payment(
        &self,
        user_id: Uuid,
        request: InitiatePaymentRequest,
    ) -> UseCaseResult<PaymentFormFields> {
        info!(
            %user_id,
            plan_type = %request.plan_type,
            "payments: initiate requested"
        );

        let amount_minor = to_minor_units(request.amount).ok_or_else(|| {
            warn!(%user_id, amount = request.amount, "payments: rejected invalid amount");
            PaymentError::InvalidAmount
        })?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load user");
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "payments: user not found");
                PaymentError::UserNotFound
            })?;

        let now = Utc::now();
        let order_id = generate_order_id(now.timestamp_millis());
        let subscription = self
            .subscription_repo
            .create(InsertSubscriptionEntity {
                user_id,
                plan_type: request.plan_type.as_str().to_string(),
                starts_at: now,
                ends_at: now + Duration::days(SUBSCRIPTION_VALIDITY_DAYS),
                order_id: order_id.clone(),
                amount_minor,
                currency: self.payhere.currency.clone(),
                status: SubscriptionStatus::Pending.to_string(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, %order_id, db_error = ?err, "payments: failed to create subscription");
                PaymentError::Internal(err)
            })?;

        let amount = format_minor_units(amount_minor);
        let hash = self
            .signer
            .checkout_hash(&order_id, &amount, &self.payhere.currency);
        let (first_name, last_name) = split_name(&user.name);

        info!(
            %user_id,
            subscription_id = %subscription.id,
            %order_id,
            %amount,
            "payments: pending subscription created"
        );

        Ok(PaymentFormFields {
            merchant_id: self.signer.merchant_id().to_string(),
            return_url: self.payhere.return_url.clone(),
            cancel_url: self.payhere.cancel_url.clone(),
            notify_url: self.payhere.notify_url.clone(),
            order_id,
            items: request.plan_type.label().to_string(),
            amount,
            currency: self.payhere.currency.clone(),
            first_name,
            last_name,
            email: user.email,
            phone: user.phone.unwrap_or_default(),
            address: CHECKOUT_ADDRESS.to_string(),
            city: CHECKOUT_CITY.to_string(),
            country: CHECKOUT_COUNTRY.to_string(),
            hash,
            custom_1: subscription.id.to_string(),
            custom_2: request.plan_type.as_str().to_string(),
        })
    }

    /// Verifies and applies a provider notification.
    ///
    /// A successful payment only moves the subscription to `paid`; activation is left
    /// to an admin. Notifications that would regress the lifecycle are acknowledged
    /// without touching the row.
    pub async fn handle_notification(
        &self,
        notification: PayHereNotification,
    ) -> UseCaseResult<NotificationOutcome> {
        let order_id = notification.order_id.clone();
        info!(
            %order_id,
            status_code = notification.status_code,
            payment_id = ?notification.payment_id,
            "payments: notification received"
        );

        if let Err(err) = self.signer.verify_notification(&notification) {
            warn!(%order_id, error = %err, "payments: notification signature rejected");
            return Err(PaymentError::InvalidSignature);
        }

        let subscription = self
            .subscription_repo
            .find_by_order_id(&order_id)
            .await
            .map_err(|err| {
                error!(%order_id, db_error = ?err, "payments: failed to load subscription");
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%order_id, "payments: notification for unknown order");
                PaymentError::OrderNotFound
            })?;

        let current = SubscriptionStatus::from_str(&subscription.status).ok_or_else(|| {
            PaymentError::Internal(anyhow::anyhow!(
                "unknown subscription status in storage: {}",
                subscription.status
            ))
        })?;
        let provider_status = PayHereStatus::from_code(notification.status_code);
        let next = provider_status.to_subscription_status();

        if !current.can_transition_to(next) {
            info!(
                %order_id,
                current = %current,
                requested = %next,
                "payments: notification does not advance subscription, ignoring"
            );
            return Ok(NotificationOutcome::Unchanged { status: current });
        }

        let applied = self
            .subscription_repo
            .apply_payment_notification(
                subscription.id,
                current,
                PaymentNotificationEntity {
                    status: next.to_string(),
                    payment_id: notification.payment_id.clone(),
                    status_message: notification.status_message.clone(),
                    updated_at: Utc::now(),
                },
            )
            .await
            .map_err(|err| {
                error!(%order_id, db_error = ?err, "payments: failed to apply notification");
                PaymentError::Internal(err)
            })?;

        if !applied {
            warn!(
                %order_id,
                expected = %current,
                "payments: subscription changed concurrently, notification not applied"
            );
            return Ok(NotificationOutcome::Unchanged { status: current });
        }

        info!(
            %order_id,
            subscription_id = %subscription.id,
            provider_status = %provider_status,
            from = %current,
            to = %next,
            "payments: subscription status updated"
        );
        Ok(NotificationOutcome::Updated {
            from: current,
            to: next,
        })
    }
}

/// `ORDER_<unix millis>_<8 random lowercase alphanumerics>`.
fn generate_order_id(timestamp_millis: i64) -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(8)
        .collect::<String>()
        .to_lowercase();
    format!("ORDER_{}_{}", timestamp_millis, suffix)
}
