use chrono::{DateTime, Utc};
use locations_core::contract::{parse_create_request, Location};
use locations_core::timestamp::format_timestamp;
use uuid::Uuid;

use super::error::LocationError;
use super::request::GatewayRequest;
use super::response::{format_response, ApiGatewayResponse};
use crate::adapters::location_store::LocationStore;

pub fn handle_create_location(
    request: &GatewayRequest,
    store: &dyn LocationStore,
    now: DateTime<Utc>,
) -> ApiGatewayResponse {
    match create_location(request, store, now) {
        Ok(location) => format_response(201, &location),
        Err(error) => error.into_response(),
    }
}

/// Validates the body, assigns a fresh id and both timestamps, and writes
/// exactly one record. Nothing is written when validation fails.
pub fn create_location(
    request: &GatewayRequest,
    store: &dyn LocationStore,
    now: DateTime<Utc>,
) -> Result<Location, LocationError> {
    let payload = request.json_body()?;
    let new_location = parse_create_request(&payload)?;

    let location = new_location.into_location(Uuid::new_v4().to_string(), &format_timestamp(now));
    store.put_location(&location)?;

    tracing::info!(location_id = %location.id, "Created location");
    Ok(location)
}
