use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    auth::AdminUser,
    axum_http::error_responses::AppError,
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            pagination::Paginated,
            users::{UpdateSubscriptionLevelRequest, UserListQuery, UserModel},
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres,
    },
    usecases::users::UserAdminUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserAdminUseCase::new(Arc::new(user_repository));

    Router::new()
        .route("/", get(list::<UserPostgres>))
        .route("/:id", get(get_one::<UserPostgres>))
        .route(
            "/:id/subscription-level",
            put(update_subscription_level::<UserPostgres>),
        )
        .with_state(Arc::new(user_usecase))
}

pub async fn list<U>(
    State(user_usecase): State<Arc<UserAdminUseCase<U>>>,
    _admin: AdminUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Paginated<UserModel>>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    Ok(Json(user_usecase.list(query).await?))
}

pub async fn get_one<U>(
    State(user_usecase): State<Arc<UserAdminUseCase<U>>>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    Ok(Json(user_usecase.get(user_id).await?))
}

pub async fn update_subscription_level<U>(
    State(user_usecase): State<Arc<UserAdminUseCase<U>>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<UpdateSubscriptionLevelRequest>, JsonRejection>,
) -> Result<Json<UserModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let user = user_usecase
        .update_subscription_level(user_id, admin.user_id, request.subscription_level)
        .await?;
    Ok(Json(user))
}
