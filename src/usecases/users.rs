use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::users::UserRepository,
    value_objects::{
        enums::plan_types::PlanType,
        pagination::{PageRequest, Paginated},
        users::{UserListQuery, UserModel},
    },
};

#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserAdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UserAdminError::NotFound => StatusCode::NOT_FOUND,
            UserAdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UserAdminError>;

pub struct UserAdminUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> UserAdminUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn list(&self, query: UserListQuery) -> UseCaseResult<Paginated<UserModel>> {
        let page = PageRequest::new(query.page, query.limit);
        info!(
            subscription_level = ?query.subscription_level,
            page = page.page,
            limit = page.limit,
            "users: admin list requested"
        );

        let (rows, total) = self
            .user_repo
            .list(query.subscription_level, page)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to list users");
                UserAdminError::Internal(err)
            })?;

        Ok(Paginated::new(
            rows.into_iter().map(UserModel::from).collect(),
            total,
            page,
        ))
    }

    pub async fn get(&self, user_id: Uuid) -> UseCaseResult<UserModel> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load user");
                UserAdminError::Internal(err)
            })?
            .map(UserModel::from)
            .ok_or(UserAdminError::NotFound)
    }

    /// Overrides a user's level regardless of their subscriptions.
    pub async fn update_subscription_level(
        &self,
        user_id: Uuid,
        admin_id: Uuid,
        subscription_level: Option<PlanType>,
    ) -> UseCaseResult<UserModel> {
        info!(
            %user_id,
            %admin_id,
            subscription_level = ?subscription_level,
            "users: forced subscription level update"
        );

        self.user_repo
            .update_subscription_level(user_id, subscription_level)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to update subscription level");
                UserAdminError::Internal(err)
            })?
            .map(UserModel::from)
            .ok_or_else(|| {
                warn!(%user_id, "users: update target not found");
                UserAdminError::NotFound
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::users::UserEntity, repositories::users::MockUserRepository,
        value_objects::enums::user_roles::UserRole,
    };
    use chrono::Utc;
    use mockall::predicate::eq;

    fn sample_user(subscription_level: Option<&str>) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: Uuid::new_v4(),
            name: "Kamala Silva".to_string(),
            email: "kamala@example.com".to_string(),
            phone: None,
            role: "user".to_string(),
            subscription_level: subscription_level.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn forced_update_returns_new_level() {
        let mut user = sample_user(Some("basic"));
        let user_id = user.id;
        user.subscription_level = Some("al_pro".to_string());

        let mut repo = MockUserRepository::new();
        repo.expect_update_subscription_level()
            .with(eq(user_id), eq(Some(PlanType::AlPro)))
            .times(1)
            .returning(move |_, _| Ok(Some(user.clone())));

        let model = UserAdminUseCase::new(Arc::new(repo))
            .update_subscription_level(user_id, Uuid::new_v4(), Some(PlanType::AlPro))
            .await
            .unwrap();

        assert_eq!(model.subscription_level, Some(PlanType::AlPro));
        assert_eq!(model.role, UserRole::User);
    }

    #[tokio::test]
    async fn forced_update_of_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_subscription_level()
            .returning(|_, _| Ok(None));

        let err = UserAdminUseCase::new(Arc::new(repo))
            .update_subscription_level(Uuid::new_v4(), Uuid::new_v4(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, UserAdminError::NotFound));
    }

    #[tokio::test]
    async fn list_filters_by_level_and_clamps_limit() {
        let rows = vec![sample_user(Some("school_pro")), sample_user(Some("school_pro"))];

        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .withf(|level, page| *level == Some(PlanType::SchoolPro) && page.limit == 100)
            .returning(move |_, _| Ok((rows.clone(), 2)));

        let page = UserAdminUseCase::new(Arc::new(repo))
            .list(UserListQuery {
                subscription_level: Some(PlanType::SchoolPro),
                page: None,
                limit: Some(500),
            })
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 1);
    }
}
