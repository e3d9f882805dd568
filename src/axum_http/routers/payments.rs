use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    routing::post,
};
use tracing::info;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
        value_objects::subscriptions::{
            InitiatePaymentRequest, NotificationOutcome, PayHereNotification, PaymentFormFields,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{subscriptions::SubscriptionPostgres, users::UserPostgres},
    },
    usecases::payments::PaymentUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let payment_usecase = PaymentUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(user_repository),
        config.payhere.clone(),
    );

    Router::new()
        .route(
            "/initiate",
            post(initiate::<SubscriptionPostgres, UserPostgres>),
        )
        .route("/notify", post(notify::<SubscriptionPostgres, UserPostgres>))
        .with_state(Arc::new(payment_usecase))
}

pub async fn initiate<S, U>(
    State(payment_usecase): State<Arc<PaymentUseCase<S, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    payload: Result<Json<InitiatePaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentFormFields>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "payments: initiate request received");
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let form = payment_usecase.initiate_payment(user_id, request).await?;
    Ok(Json(form))
}

/// Provider callback. Public; authenticity comes from the `md5sig` field.
pub async fn notify<S, U>(
    State(payment_usecase): State<Arc<PaymentUseCase<S, U>>>,
    payload: Result<Form<PayHereNotification>, FormRejection>,
) -> Result<Json<NotificationOutcome>, AppError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let Form(notification) =
        payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let outcome = payment_usecase.handle_notification(notification).await?;
    Ok(Json(outcome))
}
