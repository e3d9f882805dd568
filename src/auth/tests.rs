use super::*;
use axum::http::Request;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";
const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn token(role: &str, exp: usize, secret: &str) -> String {
    let claims = Claims {
        sub: USER_ID.to_string(),
        role: role.to_string(),
        email: Some("test@example.com".to_string()),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn parts_with(authorization: Option<String>) -> Parts {
    let mut builder = Request::builder().uri("/api/v1/feedback");
    if let Some(value) = authorization {
        builder = builder.header(axum::http::header::AUTHORIZATION, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    parts.extensions.insert(Arc::new(AuthConfig {
        jwt_secret: SECRET.to_string(),
    }));
    parts
}

#[test]
fn test_validate_jwt_success() {
    let token = token("user", 9999999999, SECRET);

    let claims = validate_jwt(&token, SECRET).expect("Valid token should pass");
    assert_eq!(claims.sub, USER_ID);
    assert_eq!(claims.email.as_deref(), Some("test@example.com"));
}

#[test]
fn test_validate_jwt_expired() {
    let token = token("user", 1, SECRET);
    assert!(validate_jwt(&token, SECRET).is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    let token = token("user", 9999999999, "wrongsecret");
    assert!(validate_jwt(&token, SECRET).is_err());
}

#[tokio::test]
async fn test_auth_user_extracted_from_bearer_token() {
    let mut parts = parts_with(Some(format!("Bearer {}", token("user", 9999999999, SECRET))));

    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.user_id, Uuid::parse_str(USER_ID).unwrap());
    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let mut parts = parts_with(None);

    let (status, _) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let mut parts = parts_with(Some("Basic dXNlcjpwYXNz".to_string()));

    let (status, _) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_extractor_forbids_regular_users() {
    let mut parts = parts_with(Some(format!("Bearer {}", token("user", 9999999999, SECRET))));

    let (status, _) = AdminUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_extractor_accepts_admin_role() {
    let mut parts = parts_with(Some(format!("Bearer {}", token("admin", 9999999999, SECRET))));

    let AdminUser(admin) = AdminUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(admin.role, UserRole::Admin);
}
