use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::dto::AuthResponse;
use crate::auth::jwt::JwtKeys;
use crate::auth::password;
use crate::error::ApiError;
use crate::store::{NewUser, Role, UserStore};

// Both login failure paths share this message so responses never reveal
// which usernames are registered.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration and login: turns credentials into issued tokens while
/// enforcing the account invariants.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<AuthResponse, ApiError> {
        if self.users.exists_by_username(username).await? {
            warn!(%username, "registration with taken username");
            return Err(ApiError::Validation("Username already exists".into()));
        }

        let role: Role = role
            .parse()
            .map_err(|_| ApiError::Validation("Role must be USER or DRIVER".into()))?;

        let password_hash = password::hash_password(password)?;
        let user = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await?;

        let token = self.keys.sign(&user.username, user.role)?;
        info!(user_id = %user.id, username = %user.username, role = %user.role, "user registered");
        Ok(AuthResponse {
            token,
            username: user.username,
            role: user.role,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let user = match self.users.find_by_username(username).await? {
            Some(u) => u,
            None => {
                warn!(%username, "login with unknown username");
                return Err(ApiError::Validation(INVALID_CREDENTIALS.into()));
            }
        };

        if !password::verify_password(password, &user.password_hash)? {
            warn!(%username, user_id = %user.id, "login with wrong password");
            return Err(ApiError::Validation(INVALID_CREDENTIALS.into()));
        }

        // A fresh token is minted on every login; nothing is cached.
        let token = self.keys.sign(&user.username, user.role)?;
        info!(user_id = %user.id, username = %user.username, "user logged in");
        Ok(AuthResponse {
            token,
            username: user.username,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::store::memory::MemoryUserStore;

    fn test_keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        })
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryUserStore::new()), test_keys())
    }

    #[tokio::test]
    async fn register_issues_a_decodable_token() {
        let auth = service();
        let res = auth
            .register("alice", "hunter22hunter22", "USER")
            .await
            .expect("register should succeed");

        assert_eq!(res.username, "alice");
        assert_eq!(res.role, Role::User);

        let claims = test_keys().verify(&res.token).expect("token should verify");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let auth = service();
        auth.register("alice", "hunter22hunter22", "USER")
            .await
            .unwrap();

        let err = auth
            .register("alice", "other-password", "DRIVER")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "Username already exists");
    }

    #[tokio::test]
    async fn register_rejects_unknown_roles() {
        let auth = service();
        for bad_role in ["ADMIN", "user", "Driver", ""] {
            let err = auth
                .register("brand-new-name", "hunter22hunter22", bad_role)
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "role {bad_role:?}");
            assert_eq!(err.to_string(), "Role must be USER or DRIVER");
        }
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_password() {
        let auth = service();
        auth.register("bob", "hunter22hunter22", "DRIVER")
            .await
            .unwrap();

        let res = auth.login("bob", "hunter22hunter22").await.expect("login");
        assert_eq!(res.username, "bob");
        assert_eq!(res.role, Role::Driver);

        let claims = test_keys().verify(&res.token).unwrap();
        assert_eq!(claims.sub, "bob");
        assert_eq!(claims.role, Role::Driver);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let auth = service();
        auth.register("alice", "hunter22hunter22", "USER")
            .await
            .unwrap();

        let wrong_password = auth.login("alice", "not-the-password").await.unwrap_err();
        let unknown_user = auth.login("mallory", "whatever-at-all").await.unwrap_err();

        assert!(matches!(wrong_password, ApiError::Validation(_)));
        assert!(matches!(unknown_user, ApiError::Validation(_)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.to_string(), "Invalid credentials");
    }
}
