use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    axum_http::error_responses::AppError,
    domain::{
        repositories::feedback::FeedbackRepository,
        value_objects::{
            feedback::{FeedbackModel, FeedbackQuery, UpdateFeedbackRequest},
            feedback_analytics::{FeedbackStats, TrendPoint},
            pagination::Paginated,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::feedback::FeedbackPostgres,
    },
    usecases::feedback_admin::FeedbackAdminUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let feedback_repository = FeedbackPostgres::new(Arc::clone(&db_pool));
    let feedback_usecase = FeedbackAdminUseCase::new(Arc::new(feedback_repository));

    Router::new()
        .route("/", get(list::<FeedbackPostgres>))
        .route("/stats", get(stats::<FeedbackPostgres>))
        .route("/trends", get(trends::<FeedbackPostgres>))
        .route("/export", get(export::<FeedbackPostgres>))
        .route(
            "/:id",
            get(get_one::<FeedbackPostgres>)
                .patch(update::<FeedbackPostgres>)
                .delete(remove::<FeedbackPostgres>),
        )
        .with_state(Arc::new(feedback_usecase))
}

pub async fn list<F>(
    State(feedback_usecase): State<Arc<FeedbackAdminUseCase<F>>>,
    _admin: AdminUser,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<Paginated<FeedbackModel>>, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    Ok(Json(feedback_usecase.list(query).await?))
}

pub async fn stats<F>(
    State(feedback_usecase): State<Arc<FeedbackAdminUseCase<F>>>,
    _admin: AdminUser,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<FeedbackStats>, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    Ok(Json(feedback_usecase.stats(query).await?))
}

pub async fn trends<F>(
    State(feedback_usecase): State<Arc<FeedbackAdminUseCase<F>>>,
    _admin: AdminUser,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<Vec<TrendPoint>>, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    Ok(Json(feedback_usecase.trends(query).await?))
}

pub async fn export<F>(
    State(feedback_usecase): State<Arc<FeedbackAdminUseCase<F>>>,
    _admin: AdminUser,
    Query(query): Query<FeedbackQuery>,
) -> Result<Response, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    let export = feedback_usecase.export(query).await?;
    let disposition = format!("attachment; filename=\"{}\"", export.filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

pub async fn get_one<F>(
    State(feedback_usecase): State<Arc<FeedbackAdminUseCase<F>>>,
    _admin: AdminUser,
    Path(feedback_id): Path<Uuid>,
) -> Result<Json<FeedbackModel>, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    Ok(Json(feedback_usecase.get(feedback_id).await?))
}

pub async fn update<F>(
    State(feedback_usecase): State<Arc<FeedbackAdminUseCase<F>>>,
    AdminUser(admin): AdminUser,
    Path(feedback_id): Path<Uuid>,
    payload: Result<Json<UpdateFeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackModel>, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let feedback = feedback_usecase
        .update(feedback_id, admin.user_id, request)
        .await?;
    Ok(Json(feedback))
}

pub async fn remove<F>(
    State(feedback_usecase): State<Arc<FeedbackAdminUseCase<F>>>,
    AdminUser(admin): AdminUser,
    Path(feedback_id): Path<Uuid>,
) -> Result<StatusCode, AppError>
where
    F: FeedbackRepository + Send + Sync + 'static,
{
    feedback_usecase.delete(feedback_id, admin.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
