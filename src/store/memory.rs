//! In-memory store implementations backed by `RwLock<HashMap>`, used by the
//! test suite and available for local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewRide, NewUser, Ride, RideStatus, RideStore, User, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, new: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&new.username) {
            anyhow::bail!("username taken: {}", new.username);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username.clone(),
            password_hash: new.password_hash,
            role: new.role,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(new.username, user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct MemoryRideStore {
    rides: RwLock<HashMap<Uuid, Ride>>,
}

impl MemoryRideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RideStore for MemoryRideStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ride>> {
        Ok(self.rides.read().await.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Ride>> {
        let rides = self.rides.read().await;
        let mut owned: Vec<Ride> = rides
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|r| r.created_at);
        Ok(owned)
    }

    async fn find_by_status(&self, status: RideStatus) -> anyhow::Result<Vec<Ride>> {
        let rides = self.rides.read().await;
        let mut matching: Vec<Ride> = rides
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.created_at);
        Ok(matching)
    }

    async fn insert(&self, new: NewRide) -> anyhow::Result<Ride> {
        let ride = Ride {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            driver_id: None,
            pickup_location: new.pickup_location,
            drop_location: new.drop_location,
            status: RideStatus::Requested,
            created_at: OffsetDateTime::now_utc(),
        };
        self.rides.write().await.insert(ride.id, ride.clone());
        Ok(ride)
    }

    async fn transition(
        &self,
        id: Uuid,
        expected: RideStatus,
        next: RideStatus,
        driver_id: Option<Uuid>,
    ) -> anyhow::Result<Option<Ride>> {
        // Compare-and-swap under the write lock, matching the conditional
        // UPDATE the Postgres store issues.
        let mut rides = self.rides.write().await;
        match rides.get_mut(&id) {
            Some(ride) if ride.status == expected => {
                ride.status = next;
                if driver_id.is_some() {
                    ride.driver_id = driver_id;
                }
                Ok(Some(ride.clone()))
            }
            _ => Ok(None),
        }
    }
}
