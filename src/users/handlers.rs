use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};

use crate::{
    state::AppState,
    users::{
        dto::{LoginRequest, PublicUser, SignupRequest},
        errors::UserError,
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> Result<String, UserError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(UserError::Validation("invalid email".into()));
    }
    Ok(email)
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(signup))
        .route("/user/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let email = normalize_email(&payload.email)?;

    let name = payload.name.trim();
    if name.is_empty() {
        warn!("empty name");
        return Err(UserError::Validation("name must not be empty".into()).into());
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(UserError::Validation("password must not be empty".into()).into());
    }

    let user = state
        .users
        .signup(name, &email, &payload.password)
        .await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    // A malformed email can never match a record, so answer like an unknown one.
    let email = normalize_email(&payload.email).map_err(|_| UserError::InvalidCredentials)?;

    let user = state.users.login(&email, &payload.password).await?;
    Ok(Json(user.into()))
}
