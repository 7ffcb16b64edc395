use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest,
            RegisterResponse,
        },
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking, MIN_PASSWORD_LEN},
        repo_types::User,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token/refresh", post(refresh))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// A concurrent registration can slip past `User::exists`; the unique index decides.
pub(crate) fn duplicate_as_conflict(e: sqlx::Error) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            warn!(error = %db, "registration raced an existing user");
            AppError::Conflict("User already exists")
        }
        _ => AppError::Persistence(e),
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(mut payload) = payload?;
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    if User::exists(&state.db, &payload.username, &payload.email).await? {
        warn!(username = %payload.username, "user already exists");
        return Err(AppError::Conflict("User already exists"));
    }

    let hash = hash_password_blocking(payload.password).await?;
    let user = User::create(&state.db, &payload.username, &payload.email, &hash)
        .await
        .map_err(duplicate_as_conflict)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user: PublicUser {
                id: user.id,
                username: user.username,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let username = payload.username.trim();

    let Some(user) = User::find_by_username(&state.db, username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::Unauthorized("Invalid username or password"));
    };

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid username or password"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        refresh_token,
        is_setup_complete: user.is_setup_complete,
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token")
    })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("User not found"))?;

    Ok(Json(AuthResponse {
        message: "Token refreshed",
        token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id)?,
        is_setup_complete: user.is_setup_complete,
    }))
}
