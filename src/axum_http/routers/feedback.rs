use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use tracing::info;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::feedback::FeedbackRepository,
        value_objects::{
            feedback::{FeedbackModel, MyFeedbackQuery, SubmitFeedbackRequest},
            pagination::Paginated,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::feedback::FeedbackPostgres,
    },
    sentiment::{SentimentClassifier, python_classifier::PythonSentimentClassifier},
    usecases::feedback::FeedbackUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let feedback_repository = FeedbackPostgres::new(Arc::clone(&db_pool));
    let classifier = PythonSentimentClassifier::new(&config.sentiment);
    let feedback_usecase =
        FeedbackUseCase::new(Arc::new(feedback_repository), Arc::new(classifier));

    Router::new()
        .route(
            "/",
            post(submit::<FeedbackPostgres, PythonSentimentClassifier>),
        )
        .route(
            "/me",
            get(list_mine::<FeedbackPostgres, PythonSentimentClassifier>),
        )
        .with_state(Arc::new(feedback_usecase))
}

pub async fn submit<F, C>(
    State(feedback_usecase): State<Arc<FeedbackUseCase<F, C>>>,
    AuthUser { user_id, .. }: AuthUser,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackModel>), AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
    C: SentimentClassifier + Send + Sync + 'static,
{
    info!(%user_id, "feedback: submit request received");
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let feedback = feedback_usecase.submit(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn list_mine<F, C>(
    State(feedback_usecase): State<Arc<FeedbackUseCase<F, C>>>,
    AuthUser { user_id, .. }: AuthUser,
    Query(query): Query<MyFeedbackQuery>,
) -> Result<Json<Paginated<FeedbackModel>>, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
    C: SentimentClassifier + Send + Sync + 'static,
{
    Ok(Json(feedback_usecase.list_mine(user_id, query).await?))
}
