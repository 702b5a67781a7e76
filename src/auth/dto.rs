use serde::{Deserialize, Serialize};

use crate::store::Role;

/// Request body for user registration. The role travels as a raw string and
/// is strictly validated into `Role` by the service, so a bad value surfaces
/// as a domain validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
}
