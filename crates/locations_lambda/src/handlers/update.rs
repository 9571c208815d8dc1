use chrono::{DateTime, Utc};
use locations_core::contract::{parse_update_request, Location};
use locations_core::timestamp::next_timestamp;

use super::error::LocationError;
use super::request::GatewayRequest;
use super::response::{format_response, ApiGatewayResponse};
use crate::adapters::location_store::LocationStore;

pub fn handle_update_location(
    request: &GatewayRequest,
    store: &dyn LocationStore,
    now: DateTime<Utc>,
) -> ApiGatewayResponse {
    match update_location(request, store, now) {
        Ok(location) => format_response(200, &location),
        Err(error) => error.into_response(),
    }
}

/// Merges the supplied fields into the stored record and writes it back.
///
/// Read and write are separate calls with no version check: a concurrent
/// writer between them is overwritten. `updatedAt` always moves past the
/// stored value, even when `now` lags it.
pub fn update_location(
    request: &GatewayRequest,
    store: &dyn LocationStore,
    now: DateTime<Utc>,
) -> Result<Location, LocationError> {
    let id = request.location_id()?;
    let patch = parse_update_request(&request.json_body()?)?;

    let Some(mut location) = store.get_location(id)? else {
        return Err(LocationError::not_found(id));
    };
    let updated_at = next_timestamp(&location.updated_at, now);
    location.apply_patch(patch, &updated_at);
    store.put_location(&location)?;

    tracing::info!(location_id = %location.id, "Updated location");
    Ok(location)
}
