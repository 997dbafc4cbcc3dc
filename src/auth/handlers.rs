use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{
            AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, PublicUser,
            RegisterRequest,
        },
        extractors::{ApiJson, AuthUser},
        use_cases::ResetOutcome,
    },
    error::{AppError, AppResult},
    state::AppState,
};

/// Same wording whether or not the email exists.
pub const RESET_MESSAGE: &str =
    "If an account with that email exists, its password has been reset.";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let user = state.register_user.execute(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully!".into(),
            access_token: None,
            user: Some(PublicUser::from(&user)),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let outcome = state.login_user.execute(payload.into()).await?;
    Ok(Json(AuthResponse {
        message: "Login successful!".into(),
        access_token: Some(outcome.access_token),
        user: Some(PublicUser::from(&outcome.user)),
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let outcome = state.forgot_password.execute(payload.into()).await?;
    info!(performed = outcome == ResetOutcome::Performed, "forgot-password handled");
    Ok(Json(MessageResponse {
        message: RESET_MESSAGE.into(),
    }))
}

#[instrument(skip(state, subject), fields(user_id = %subject.id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(subject): AuthUser,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .users
        .find_by_id(subject.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

    Ok(Json(AuthResponse {
        message: "Profile loaded.".into(),
        access_token: None,
        user: Some(PublicUser::from(&user)),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::app::build_app;
    use crate::auth::memory::InMemoryUserRepository;
    use crate::error::INVALID_CREDENTIALS;

    fn app() -> (Router, Arc<InMemoryUserRepository>) {
        let (state, repo) = AppState::fake();
        (build_app(state), repo)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, "POST", uri, Some(body), None).await
    }

    async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        send(app, "GET", uri, None, bearer).await
    }

    fn register_body(username: &str, email: &str) -> Value {
        json!({
            "username": username,
            "password": "P1!",
            "confirmPassword": "P1!",
            "firstName": "U",
            "lastName": "One",
            "address": "Main St 1",
            "gender": "n/a",
            "age": 30,
            "email": email
        })
    }

    fn credentials(username: &str, password: &str) -> Value {
        json!({ "username": username, "password": password })
    }

    fn reset_body(email: &str, new: &str, confirm: &str) -> Value {
        json!({ "email": email, "newPassword": new, "confirmNewPassword": confirm })
    }

    #[tokio::test]
    async fn register_then_login_scenario() {
        let (app, _) = app();

        let (status, body) =
            post(&app, "/api/auth/register", register_body("u1", "u1@x.com")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["username"], "u1");
        assert_eq!(body["message"], "User registered successfully!");
        assert!(body["user"].get("passwordHash").is_none());

        let (status, body) = post(&app, "/api/auth/login", credentials("u1", "P1!")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["email"], "u1@x.com");

        let (status, body) = post(&app, "/api/auth/login", credentials("u1", "wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn register_accepts_timestamp_date_of_birth() {
        let (app, repo) = app();
        let mut body = register_body("u1", "u1@x.com");
        body["dateOfBirth"] = json!("1997-11-19T00:00:00.000Z");

        let (status, body) = post(&app, "/api/auth/register", body).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        let stored = repo.get(id).expect("stored user");
        assert_eq!(stored.date_of_birth, Some(time::macros::date!(1997 - 11 - 19)));
    }

    #[tokio::test]
    async fn unknown_user_gets_same_response_as_wrong_password() {
        let (app, _) = app();
        post(&app, "/api/auth/register", register_body("u1", "u1@x.com")).await;

        let unknown = post(&app, "/api/auth/login", credentials("ghost", "P1!")).await;
        let wrong = post(&app, "/api/auth/login", credentials("u1", "nope")).await;
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_400_with_message() {
        let (app, _) = app();
        post(&app, "/api/auth/register", register_body("u1", "u1@x.com")).await;

        let (status, body) =
            post(&app, "/api/auth/register", register_body("u1", "other@x.com")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username already taken.");

        let (status, body) =
            post(&app, "/api/auth/register", register_body("u2", "u1@x.com")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email address already registered.");
    }

    #[tokio::test]
    async fn malformed_json_is_a_400_with_message() {
        let (app, _) = app();
        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn forgot_password_answers_generically() {
        let (app, repo) = app();
        post(&app, "/api/auth/register", register_body("u1", "u1@x.com")).await;

        let known =
            post(&app, "/api/auth/forgot-password", reset_body("u1@x.com", "N1!", "N1!")).await;
        let unknown =
            post(&app, "/api/auth/forgot-password", reset_body("ghost@x.com", "N1!", "N1!")).await;
        assert_eq!(known, unknown);
        assert_eq!(known.0, StatusCode::OK);
        assert_eq!(known.1["message"], RESET_MESSAGE);
        assert_eq!(repo.len(), 1);

        let (status, _) = post(&app, "/api/auth/login", credentials("u1", "N1!")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn forgot_password_mismatch_is_400() {
        let (app, _) = app();
        let (status, body) =
            post(&app, "/api/auth/forgot-password", reset_body("u1@x.com", "N1!", "N2!")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "New passwords do not match.");
    }

    #[tokio::test]
    async fn me_requires_a_valid_token() {
        let (app, _) = app();
        post(&app, "/api/auth/register", register_body("u1", "u1@x.com")).await;
        let (_, login) = post(&app, "/api/auth/login", credentials("u1", "P1!")).await;
        let token = login["accessToken"].as_str().unwrap().to_string();

        let (status, body) = get(&app, "/api/auth/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "u1");

        let (status, _) = get(&app, "/api/auth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get(&app, "/api/auth/me", Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn storage_failure_is_a_generic_500() {
        let repo = Arc::new(InMemoryUserRepository::failing());
        let state = AppState::new(Arc::new(crate::config::test_config()), repo);
        let app = build_app(state);
        let (status, body) = post(&app, "/api/auth/login", credentials("u1", "P1!")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error.");
    }
}
