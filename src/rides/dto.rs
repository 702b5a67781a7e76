use serde::Deserialize;

/// Request body for creating a ride.
#[derive(Debug, Deserialize)]
pub struct CreateRideRequest {
    pub pickup_location: String,
    pub drop_location: String,
}
