use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::jwt::CurrentUser;
use crate::error::ApiError;
use crate::rides::dto::CreateRideRequest;
use crate::state::AppState;
use crate::store::{Ride, Role};

pub fn ride_routes() -> Router<AppState> {
    Router::new()
        .route("/rides", post(create_ride))
        .route("/rides/:ride_id/complete", post(complete_ride))
        .route("/user/rides", get(user_rides))
        .route("/driver/rides/requests", get(pending_rides))
        .route("/driver/rides/:ride_id/accept", post(accept_ride))
}

#[instrument(skip(state, payload))]
pub async fn create_ride(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateRideRequest>,
) -> Result<Json<Ride>, ApiError> {
    user.require_role(Role::User)?;

    if payload.pickup_location.trim().is_empty() || payload.drop_location.trim().is_empty() {
        return Err(ApiError::Validation(
            "Pickup and drop locations are required".into(),
        ));
    }

    let ride = state
        .rides
        .create_ride(
            &payload.pickup_location,
            &payload.drop_location,
            &user.username,
        )
        .await?;
    Ok(Json(ride))
}

#[instrument(skip(state))]
pub async fn user_rides(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Ride>>, ApiError> {
    user.require_role(Role::User)?;
    let rides = state.rides.user_rides(&user.username).await?;
    Ok(Json(rides))
}

#[instrument(skip(state))]
pub async fn pending_rides(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Ride>>, ApiError> {
    user.require_role(Role::Driver)?;
    let rides = state.rides.pending_rides().await?;
    Ok(Json(rides))
}

#[instrument(skip(state))]
pub async fn accept_ride(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<Ride>, ApiError> {
    user.require_role(Role::Driver)?;
    let ride = state.rides.accept_ride(ride_id, &user.username).await?;
    Ok(Json(ride))
}

#[instrument(skip(state))]
pub async fn complete_ride(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<Ride>, ApiError> {
    user.require_any_role(&[Role::User, Role::Driver])?;
    let ride = state.rides.complete_ride(ride_id, &user.username).await?;
    Ok(Json(ride))
}
