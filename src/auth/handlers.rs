use axum::{extract::State, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::instrument;

use crate::auth::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::state::AppState;

fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.username = payload.username.trim().to_string();

    if !is_valid_username(&payload.username) {
        return Err(ApiError::Validation(
            "Username must be 3-32 characters of letters, digits, '.', '_' or '-'".into(),
        ));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }

    let response = state
        .auth
        .register(&payload.username, &payload.password, &payload.role)
        .await?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.username = payload.username.trim().to_string();
    let response = state
        .auth
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_shape() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("bob_42.driver-x"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("a@b"));
        assert!(!is_valid_username(&"x".repeat(33)));
    }
}
