use axum::{Json, Router, http::StatusCode, routing::post};

use super::dto::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest};
use crate::config::AUTH_TOKEN_LENGTH;
use crate::error::{AppError, AppResult};
use crate::extractor::AuthUser;
use crate::repositories::UserRepository;
use crate::static_service::database;
use crate::utils::random::generate_random_string;

const MIN_PASSWORD_LENGTH: usize = 8;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

fn bearer(token: String, user: crate::entities::user::Model) -> AuthResponse {
    AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        user: user.into(),
    }
}

/// Register a student or instructor account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid email, name or password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Authentication"
)]
pub async fn register(
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = payload.email.trim().to_lowercase();
    let name = payload.name.trim().to_string();

    if !email.contains('@') {
        return Err(AppError::Validation("Email is not valid".to_string()));
    }
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let db = database()?;
    let user_repo = UserRepository::new(db);

    if user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    let token = generate_random_string(AUTH_TOKEN_LENGTH);

    let user = user_repo
        .create(email, name, password_hash, payload.role, Some(token.clone()))
        .await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");

    Ok((StatusCode::CREATED, Json(bearer(token, user))))
}

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(Json(payload): Json<LoginRequest>) -> AppResult<Json<AuthResponse>> {
    let db = database()?;
    let user_repo = UserRepository::new(db);

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = user_repo
        .find_by_email(&payload.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;
    if !password_valid {
        return Err(invalid());
    }

    let token = generate_random_string(AUTH_TOKEN_LENGTH);
    let user = user_repo.set_token(user, Some(token.clone())).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(bearer(token, user)))
}

/// Invalidate the current bearer token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn logout(AuthUser(user): AuthUser) -> AppResult<Json<LogoutResponse>> {
    let db = database()?;
    let user = UserRepository::new(db).set_token(user, None).await?;

    tracing::info!(user_id = %user.id, "User logged out");

    Ok(Json(LogoutResponse {
        message: "Logged out".to_string(),
    }))
}
