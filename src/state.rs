use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::jwt::JwtKeys;
use crate::auth::service::AuthService;
use crate::config::AppConfig;
use crate::rides::service::RideService;
use crate::store::memory::{MemoryRideStore, MemoryUserStore};
use crate::store::postgres::{PgRideStore, PgUserStore};
use crate::store::{RideStore, UserStore};

/// Shared application state. The stores are injected as trait objects so the
/// services never reach for ambient globals and tests can swap in the
/// in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<PgPool>,
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub rides: RideService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let Some(database_url) = config.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; falling back to in-memory stores");
            return Ok(Self::in_memory(config));
        };

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url)
            .await
            .context("connect to database")?;

        let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.clone()));
        let rides: Arc<dyn RideStore> = Arc::new(PgRideStore::new(db.clone()));
        Ok(Self::from_parts(Some(db), config, users, rides))
    }

    pub fn from_parts(
        db: Option<PgPool>,
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        rides: Arc<dyn RideStore>,
    ) -> Self {
        let keys = JwtKeys::from_config(&config.jwt);
        let auth = AuthService::new(users.clone(), keys);
        let ride_service = RideService::new(rides, users, config.completion_policy);
        Self {
            db,
            config,
            auth,
            rides: ride_service,
        }
    }

    /// State over the in-memory stores; no database required.
    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let rides: Arc<dyn RideStore> = Arc::new(MemoryRideStore::new());
        Self::from_parts(None, config, users, rides)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    use crate::config::{CompletionPolicy, JwtConfig};
    AppConfig {
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        },
        completion_policy: CompletionPolicy::AnyAuthenticated,
    }
}
