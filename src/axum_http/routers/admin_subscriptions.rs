use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    axum_http::error_responses::AppError,
    domain::{
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            pagination::Paginated,
            subscriptions::{RejectSubscriptionRequest, SubscriptionListQuery, SubscriptionModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::subscriptions::SubscriptionPostgres,
    },
    usecases::subscriptions::SubscriptionUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let subscription_usecase = SubscriptionUseCase::new(Arc::new(subscription_repository));

    Router::new()
        .route("/", get(list::<SubscriptionPostgres>))
        .route("/:id", get(get_one::<SubscriptionPostgres>))
        .route("/:id/approve", post(approve::<SubscriptionPostgres>))
        .route("/:id/reject", post(reject::<SubscriptionPostgres>))
        .with_state(Arc::new(subscription_usecase))
}

pub async fn list<S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S>>>,
    _admin: AdminUser,
    Query(query): Query<SubscriptionListQuery>,
) -> Result<Json<Paginated<SubscriptionModel>>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    Ok(Json(subscription_usecase.list(query).await?))
}

pub async fn get_one<S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S>>>,
    _admin: AdminUser,
    Path(subscription_id): Path<Uuid>,
) -> Result<Json<SubscriptionModel>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    Ok(Json(subscription_usecase.get(subscription_id).await?))
}

pub async fn approve<S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S>>>,
    AdminUser(admin): AdminUser,
    Path(subscription_id): Path<Uuid>,
) -> Result<Json<SubscriptionModel>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let subscription = subscription_usecase
        .approve(subscription_id, admin.user_id)
        .await?;
    Ok(Json(subscription))
}

/// The body is optional; a missing or empty body rejects without a reason.
pub async fn reject<S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S>>>,
    AdminUser(admin): AdminUser,
    Path(subscription_id): Path<Uuid>,
    payload: Option<Json<RejectSubscriptionRequest>>,
) -> Result<Json<SubscriptionModel>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let reason = payload.and_then(|Json(request)| request.reason);
    let subscription = subscription_usecase
        .reject(subscription_id, admin.user_id, reason)
        .await?;
    Ok(Json(subscription))
}
