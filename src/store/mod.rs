use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
pub mod types;

pub use types::{NewRide, NewUser, Ride, RideStatus, Role, User};

/// Credential store: user records keyed by username.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool>;

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Insert a new user; the store assigns id and created_at.
    async fn insert(&self, new: NewUser) -> anyhow::Result<User>;
}

/// Ride store: ride records keyed by ride id, queryable by owner and status.
#[async_trait]
pub trait RideStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ride>>;

    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Ride>>;

    async fn find_by_status(&self, status: RideStatus) -> anyhow::Result<Vec<Ride>>;

    /// Insert a new ride; the store assigns id, created_at and the initial
    /// Requested status.
    async fn insert(&self, new: NewRide) -> anyhow::Result<Ride>;

    /// Conditional status update: succeeds only if the ride's status still
    /// equals `expected`, otherwise returns `None`. `driver_id`, when given,
    /// is set in the same write. Concurrent accepts on one ride are
    /// serialized by this guard.
    async fn transition(
        &self,
        id: Uuid,
        expected: RideStatus,
        next: RideStatus,
        driver_id: Option<Uuid>,
    ) -> anyhow::Result<Option<Ride>>;
}
