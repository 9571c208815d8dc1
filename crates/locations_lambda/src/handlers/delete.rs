use super::error::LocationError;
use super::request::GatewayRequest;
use super::response::{empty_response, ApiGatewayResponse};
use crate::adapters::location_store::LocationStore;

pub fn handle_delete_location(
    request: &GatewayRequest,
    store: &dyn LocationStore,
) -> ApiGatewayResponse {
    match delete_location(request, store) {
        Ok(()) => empty_response(204),
        Err(error) => error.into_response(),
    }
}

/// Check-then-delete. The two calls are not atomic; a record removed by a
/// concurrent request in between still yields a successful delete here.
pub fn delete_location(
    request: &GatewayRequest,
    store: &dyn LocationStore,
) -> Result<(), LocationError> {
    let id = request.location_id()?;

    if store.get_location(id)?.is_none() {
        return Err(LocationError::not_found(id));
    }
    store.delete_location(id)?;

    tracing::info!(location_id = %id, "Deleted location");
    Ok(())
}
