use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Who is allowed to complete an accepted ride. The role gate at the API
/// layer applies either way; this policy decides whether the caller must
/// additionally be a party to the ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Any authenticated rider or driver may complete (default).
    AnyAuthenticated,
    /// Only the ride's own rider or its accepting driver may complete.
    ParticipantsOnly,
}

impl CompletionPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "any_authenticated" => Some(CompletionPolicy::AnyAuthenticated),
            "participants_only" => Some(CompletionPolicy::ParticipantsOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string; when unset the app runs over the
    /// in-memory stores.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub completion_policy: CompletionPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "rideshare".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "rideshare-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let completion_policy = std::env::var("RIDE_COMPLETION_POLICY")
            .ok()
            .and_then(|v| CompletionPolicy::parse(&v))
            .unwrap_or(CompletionPolicy::AnyAuthenticated);
        Ok(Self {
            database_url,
            jwt,
            completion_policy,
        })
    }
}
