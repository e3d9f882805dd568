use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::info;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    domain::{
        repositories::subscriptions::SubscriptionRepository,
        value_objects::subscriptions::SubscriptionModel,
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
        .route("/me", get(list_mine::<SubscriptionPostgres>))
        .route(
            "/status/:order_id",
            get(status_by_order::<SubscriptionPostgres>),
        )
        .with_state(Arc::new(subscription_usecase))
}

pub async fn list_mine<S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<Vec<SubscriptionModel>>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let subscriptions = subscription_usecase.list_for_user(user_id).await?;
    Ok(Json(subscriptions))
}

pub async fn status_by_order<S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<SubscriptionModel>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(%user_id, %order_id, "subscriptions: status request received");
    let subscription = subscription_usecase
        .status_for_user(user_id, &order_id)
        .await?;
    Ok(Json(subscription))
}
