use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Driver,
}

#[derive(Debug, thiserror::Error)]
#[error("role must be USER or DRIVER")]
pub struct InvalidRole;

impl FromStr for Role {
    type Err = InvalidRole;

    // Exact match only: no alternate casings or spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "DRIVER" => Ok(Role::Driver),
            _ => Err(InvalidRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("USER"),
            Role::Driver => f.write_str("DRIVER"),
        }
    }
}

/// Ride lifecycle state. Transitions are strictly
/// Requested -> Accepted -> Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "ride_status", rename_all = "UPPERCASE")]
pub enum RideStatus {
    Requested,
    Accepted,
    Completed,
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideStatus::Requested => f.write_str("REQUESTED"),
            RideStatus::Accepted => f.write_str("ACCEPTED"),
            RideStatus::Completed => f.write_str("COMPLETED"),
        }
    }
}

/// User record in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

/// Fields the caller supplies on registration; the store assigns the rest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Ride record in the store. `driver_id` is set exactly when the status is
/// Accepted or Completed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ride {
    pub id: Uuid,
    pub user_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub pickup_location: String,
    pub drop_location: String,
    pub status: RideStatus,
    pub created_at: OffsetDateTime,
}

/// Fields the rider supplies when requesting a ride; the store assigns id,
/// created_at and the initial Requested status.
#[derive(Debug, Clone)]
pub struct NewRide {
    pub user_id: Uuid,
    pub pickup_location: String,
    pub drop_location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_exact_spellings_only() {
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("DRIVER".parse::<Role>().unwrap(), Role::Driver);
        assert!("ADMIN".parse::<Role>().is_err());
        assert!("user".parse::<Role>().is_err());
        assert!("Driver".parse::<Role>().is_err());
        assert!("DRIVER ".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_and_status_display_wire_form() {
        assert_eq!(Role::User.to_string(), "USER");
        assert_eq!(Role::Driver.to_string(), "DRIVER");
        assert_eq!(RideStatus::Requested.to_string(), "REQUESTED");
        assert_eq!(RideStatus::Accepted.to_string(), "ACCEPTED");
        assert_eq!(RideStatus::Completed.to_string(), "COMPLETED");
    }

    #[test]
    fn user_json_never_carries_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            password_hash: "$argon2id$fake".into(),
            role: Role::User,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(json.contains("\"USER\""));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }
}
