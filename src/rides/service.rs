use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CompletionPolicy;
use crate::error::ApiError;
use crate::store::{NewRide, Ride, RideStatus, RideStore, UserStore};

/// The ride lifecycle state machine: Requested -> Accepted -> Completed,
/// strictly linear, with its existence and state preconditions. Role gating
/// stays at the API layer.
#[derive(Clone)]
pub struct RideService {
    rides: Arc<dyn RideStore>,
    users: Arc<dyn UserStore>,
    completion_policy: CompletionPolicy,
}

impl RideService {
    pub fn new(
        rides: Arc<dyn RideStore>,
        users: Arc<dyn UserStore>,
        completion_policy: CompletionPolicy,
    ) -> Self {
        Self {
            rides,
            users,
            completion_policy,
        }
    }

    pub async fn create_ride(
        &self,
        pickup: &str,
        drop: &str,
        requesting_username: &str,
    ) -> Result<Ride, ApiError> {
        // Only existence is required here; the rider role gate already ran
        // at the API layer.
        let user = self
            .users
            .find_by_username(requesting_username)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

        let ride = self
            .rides
            .insert(NewRide {
                user_id: user.id,
                pickup_location: pickup.to_string(),
                drop_location: drop.to_string(),
            })
            .await?;
        info!(ride_id = %ride.id, user_id = %user.id, "ride requested");
        Ok(ride)
    }

    pub async fn user_rides(&self, username: &str) -> Result<Vec<Ride>, ApiError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
        Ok(self.rides.find_by_user(user.id).await?)
    }

    /// The full open queue, unfiltered and unpaginated.
    pub async fn pending_rides(&self) -> Result<Vec<Ride>, ApiError> {
        Ok(self.rides.find_by_status(RideStatus::Requested).await?)
    }

    pub async fn accept_ride(
        &self,
        ride_id: Uuid,
        driver_username: &str,
    ) -> Result<Ride, ApiError> {
        // Precondition order is part of the contract: missing ride, then
        // state, then driver resolution.
        let ride = self
            .rides
            .find_by_id(ride_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Ride not found".into()))?;

        if ride.status != RideStatus::Requested {
            return Err(ApiError::Validation(
                "Ride is not in REQUESTED status".into(),
            ));
        }

        // The caller's DRIVER role is enforced by the API-layer gate, not
        // re-checked here.
        let driver = self
            .users
            .find_by_username(driver_username)
            .await?
            .ok_or_else(|| ApiError::NotFound("Driver not found".into()))?;

        let updated = self
            .rides
            .transition(
                ride_id,
                RideStatus::Requested,
                RideStatus::Accepted,
                Some(driver.id),
            )
            .await?;
        match updated {
            Some(ride) => {
                info!(ride_id = %ride.id, driver_id = %driver.id, "ride accepted");
                Ok(ride)
            }
            None => {
                warn!(%ride_id, driver_id = %driver.id, "accept lost the status race");
                Err(ApiError::Conflict("Ride was already accepted".into()))
            }
        }
    }

    pub async fn complete_ride(
        &self,
        ride_id: Uuid,
        caller_username: &str,
    ) -> Result<Ride, ApiError> {
        let ride = self
            .rides
            .find_by_id(ride_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Ride not found".into()))?;

        if ride.status != RideStatus::Accepted {
            return Err(ApiError::Validation(
                "Ride must be ACCEPTED to complete".into(),
            ));
        }

        if self.completion_policy == CompletionPolicy::ParticipantsOnly {
            let caller = self
                .users
                .find_by_username(caller_username)
                .await?
                .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
            let is_party = caller.id == ride.user_id || ride.driver_id == Some(caller.id);
            if !is_party {
                warn!(%ride_id, caller_id = %caller.id, "completion by non-participant rejected");
                return Err(ApiError::Validation(
                    "Only the rider or driver may complete this ride".into(),
                ));
            }
        }

        let updated = self
            .rides
            .transition(ride_id, RideStatus::Accepted, RideStatus::Completed, None)
            .await?;
        match updated {
            Some(ride) => {
                info!(ride_id = %ride.id, "ride completed");
                Ok(ride)
            }
            None => {
                warn!(%ride_id, "complete lost the status race");
                Err(ApiError::Conflict("Ride was already completed".into()))
            }
        }
    }
}
