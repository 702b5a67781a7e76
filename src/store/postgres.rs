use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NewRide, NewUser, Ride, RideStatus, RideStore, User, UserStore};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists_by_username(&self, username: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(new.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgRideStore {
    pool: PgPool,
}

impl PgRideStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RideStore for PgRideStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ride>> {
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            SELECT id, user_id, driver_id, pickup_location, drop_location, status, created_at
            FROM rides
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ride)
    }

    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Ride>> {
        let rides = sqlx::query_as::<_, Ride>(
            r#"
            SELECT id, user_id, driver_id, pickup_location, drop_location, status, created_at
            FROM rides
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rides)
    }

    async fn find_by_status(&self, status: RideStatus) -> anyhow::Result<Vec<Ride>> {
        let rides = sqlx::query_as::<_, Ride>(
            r#"
            SELECT id, user_id, driver_id, pickup_location, drop_location, status, created_at
            FROM rides
            WHERE status = $1
            ORDER BY created_at
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rides)
    }

    async fn insert(&self, new: NewRide) -> anyhow::Result<Ride> {
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            INSERT INTO rides (user_id, pickup_location, drop_location)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, driver_id, pickup_location, drop_location, status, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.pickup_location)
        .bind(&new.drop_location)
        .fetch_one(&self.pool)
        .await?;
        Ok(ride)
    }

    async fn transition(
        &self,
        id: Uuid,
        expected: RideStatus,
        next: RideStatus,
        driver_id: Option<Uuid>,
    ) -> anyhow::Result<Option<Ride>> {
        // Single-statement check-and-set: the status guard in the WHERE
        // clause makes concurrent transitions on one ride lose cleanly
        // instead of overwriting each other.
        let ride = sqlx::query_as::<_, Ride>(
            r#"
            UPDATE rides
            SET status = $3, driver_id = COALESCE($4, driver_id)
            WHERE id = $1 AND status = $2
            RETURNING id, user_id, driver_id, pickup_location, drop_location, status, created_at
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ride)
    }
}
