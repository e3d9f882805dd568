use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        enums::{plan_types::PlanType, subscription_statuses::SubscriptionStatus},
        pagination::{PageRequest, Paginated},
        subscriptions::{SubscriptionListQuery, SubscriptionModel},
    },
};

#[derive(Debug, Error)]
pub enum SubscriptionAdminError {
    #[error("subscription not found")]
    NotFound,
    #[error("subscription is {0} and can no longer be reviewed")]
    InvalidStatus(SubscriptionStatus),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionAdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionAdminError::NotFound => StatusCode::NOT_FOUND,
            SubscriptionAdminError::InvalidStatus(_) => StatusCode::CONFLICT,
            SubscriptionAdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionAdminError>;

pub struct SubscriptionUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
}

impl<S> SubscriptionUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>) -> Self {
        Self { subscription_repo }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> UseCaseResult<Vec<SubscriptionModel>> {
        info!(%user_id, "subscriptions: listing own subscriptions");
        let subscriptions = self
            .subscription_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to list own subscriptions");
                SubscriptionAdminError::Internal(err)
            })?;

        subscriptions
            .into_iter()
            .map(|entity| SubscriptionModel::try_from(entity).map_err(SubscriptionAdminError::from))
            .collect()
    }

    /// Looks up one of the caller's subscriptions by order id. Other users' orders
    /// are reported as missing.
    pub async fn status_for_user(
        &self,
        user_id: Uuid,
        order_id: &str,
    ) -> UseCaseResult<SubscriptionModel> {
        let subscription = self
            .subscription_repo
            .find_by_order_id(order_id)
            .await
            .map_err(|err| {
                error!(%user_id, %order_id, db_error = ?err, "subscriptions: failed to load order");
                SubscriptionAdminError::Internal(err)
            })?
            .filter(|subscription| subscription.user_id == user_id)
            .ok_or(SubscriptionAdminError::NotFound)?;

        Ok(SubscriptionModel::try_from(subscription)?)
    }

    pub async fn list(
        &self,
        query: SubscriptionListQuery,
    ) -> UseCaseResult<Paginated<SubscriptionModel>> {
        let page = PageRequest::new(query.page, query.limit);
        let filter = query.filter();
        info!(
            status = ?filter.status,
            plan_type = ?filter.plan_type,
            page = page.page,
            limit = page.limit,
            "subscriptions: admin list requested"
        );

        let (rows, total) = self
            .subscription_repo
            .list(filter, page)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to list subscriptions");
                SubscriptionAdminError::Internal(err)
            })?;

        let items = rows
            .into_iter()
            .map(SubscriptionModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn get(&self, subscription_id: Uuid) -> UseCaseResult<SubscriptionModel> {
        let subscription = self.load(subscription_id).await?;
        Ok(SubscriptionModel::try_from(subscription)?)
    }

    /// Activates a paid (or still pending) subscription and grants its plan to the owner.
    pub async fn approve(
        &self,
        subscription_id: Uuid,
        admin_id: Uuid,
    ) -> UseCaseResult<SubscriptionModel> {
        info!(%subscription_id, %admin_id, "subscriptions: approve requested");
        let subscription = self.load(subscription_id).await?;
        let status = Self::reviewable_status(&subscription)?;
        let plan_type = PlanType::from_str(&subscription.plan_type).ok_or_else(|| {
            anyhow::anyhow!("unknown plan type in storage: {}", subscription.plan_type)
        })?;

        let approved = self
            .subscription_repo
            .approve(subscription_id, admin_id, plan_type)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: approve failed");
                SubscriptionAdminError::Internal(err)
            })?;
        if !approved {
            return Err(self.lost_race(subscription_id, status).await);
        }

        info!(
            %subscription_id,
            %admin_id,
            user_id = %subscription.user_id,
            plan_type = %plan_type,
            "subscriptions: approved and user level updated"
        );
        self.get(subscription_id).await
    }

    pub async fn reject(
        &self,
        subscription_id: Uuid,
        admin_id: Uuid,
        reason: Option<String>,
    ) -> UseCaseResult<SubscriptionModel> {
        info!(%subscription_id, %admin_id, "subscriptions: reject requested");
        let subscription = self.load(subscription_id).await?;
        let status = Self::reviewable_status(&subscription)?;
        let reason = reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());

        let rejected = self
            .subscription_repo
            .reject(subscription_id, admin_id, reason)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: reject failed");
                SubscriptionAdminError::Internal(err)
            })?;
        if !rejected {
            return Err(self.lost_race(subscription_id, status).await);
        }

        info!(%subscription_id, %admin_id, "subscriptions: rejected");
        self.get(subscription_id).await
    }

    async fn load(&self, subscription_id: Uuid) -> UseCaseResult<SubscriptionEntity> {
        self.subscription_repo
            .find_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: failed to load subscription");
                SubscriptionAdminError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%subscription_id, "subscriptions: not found");
                SubscriptionAdminError::NotFound
            })
    }

    fn reviewable_status(subscription: &SubscriptionEntity) -> UseCaseResult<SubscriptionStatus> {
        let status = SubscriptionStatus::from_str(&subscription.status).ok_or_else(|| {
            anyhow::anyhow!("unknown subscription status in storage: {}", subscription.status)
        })?;
        if !status.awaits_review() {
            warn!(
                subscription_id = %subscription.id,
                status = %status,
                "subscriptions: review rejected, wrong status"
            );
            return Err(SubscriptionAdminError::InvalidStatus(status));
        }
        Ok(status)
    }

    /// The conditional update matched nothing; report the status the row moved to.
    async fn lost_race(
        &self,
        subscription_id: Uuid,
        seen: SubscriptionStatus,
    ) -> SubscriptionAdminError {
        match self.load(subscription_id).await {
            Ok(current) => SubscriptionAdminError::InvalidStatus(
                SubscriptionStatus::from_str(&current.status).unwrap_or(seen),
            ),
            Err(err) => err,
        }
    }
}
