use chrono::{DateTime, Utc};

use super::create::handle_create_location;
use super::delete::handle_delete_location;
use super::get_all::handle_get_locations;
use super::request::{GatewayRequest, COLLECTION_SEGMENT};
use super::response::{error_response, preflight_response, ApiGatewayResponse};
use super::update::handle_update_location;
use crate::adapters::location_store::LocationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListLocations,
    CreateLocation,
    UpdateLocation,
    DeleteLocation,
    Preflight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    NotFound,
    MethodNotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Collection,
    Item,
}

pub fn resolve_route(request: &GatewayRequest) -> Result<Route, RouteError> {
    let method = request.http_method.to_ascii_uppercase();
    if method == "OPTIONS" {
        return Ok(Route::Preflight);
    }

    let target = match request.path_segments().as_slice() {
        [collection] if *collection == COLLECTION_SEGMENT => Target::Collection,
        [collection, _] if *collection == COLLECTION_SEGMENT => Target::Item,
        _ => return Err(RouteError::NotFound),
    };

    match (method.as_str(), target) {
        ("GET", Target::Collection) => Ok(Route::ListLocations),
        ("POST", Target::Collection) => Ok(Route::CreateLocation),
        ("PUT", Target::Item) => Ok(Route::UpdateLocation),
        ("DELETE", Target::Item) => Ok(Route::DeleteLocation),
        _ => Err(RouteError::MethodNotAllowed),
    }
}

/// Entry point for a single function serving every route.
pub fn route_request(
    request: &GatewayRequest,
    store: &dyn LocationStore,
    now: DateTime<Utc>,
) -> ApiGatewayResponse {
    match resolve_route(request) {
        Ok(Route::ListLocations) => handle_get_locations(store),
        Ok(Route::CreateLocation) => handle_create_location(request, store, now),
        Ok(Route::UpdateLocation) => handle_update_location(request, store, now),
        Ok(Route::DeleteLocation) => handle_delete_location(request, store),
        Ok(Route::Preflight) => preflight_response(),
        Err(RouteError::NotFound) => {
            tracing::info!(method = %request.http_method, path = ?request.path, "No route");
            error_response(404, "Route not found")
        }
        Err(RouteError::MethodNotAllowed) => {
            tracing::info!(method = %request.http_method, path = ?request.path, "Method not allowed");
            error_response(405, "Method not allowed")
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::memory::InMemoryLocationStore;
    use crate::handlers::testing::{at, item_request, post_request};

    fn request(method: &str, path: &str) -> GatewayRequest {
        GatewayRequest {
            http_method: method.to_string(),
            path: Some(path.to_string()),
            ..GatewayRequest::default()
        }
    }

    #[test]
    fn resolves_every_declared_route() {
        let cases = [
            ("GET", "/locations", Route::ListLocations),
            ("POST", "/locations/", Route::CreateLocation),
            ("PUT", "/locations/abc", Route::UpdateLocation),
            ("delete", "/locations/abc", Route::DeleteLocation),
            ("OPTIONS", "/locations/abc", Route::Preflight),
        ];
        for (method, path, expected) in cases {
            assert_eq!(resolve_route(&request(method, path)), Ok(expected), "{method} {path}");
        }
    }

    #[test]
    fn resource_template_takes_precedence_over_path() {
        let request = GatewayRequest {
            http_method: "PUT".to_string(),
            resource: Some("/locations/{id}".to_string()),
            path: Some("/prod/locations/abc".to_string()),
            ..GatewayRequest::default()
        };
        assert_eq!(resolve_route(&request), Ok(Route::UpdateLocation));
    }

    #[test]
    fn rejects_unknown_paths_and_methods() {
        assert_eq!(resolve_route(&request("GET", "/places")), Err(RouteError::NotFound));
        assert_eq!(
            resolve_route(&request("PATCH", "/locations/abc")),
            Err(RouteError::MethodNotAllowed)
        );
        assert_eq!(
            resolve_route(&request("GET", "/locations/abc")),
            Err(RouteError::MethodNotAllowed)
        );
    }

    #[test]
    fn full_lifecycle_through_the_router() {
        let store = InMemoryLocationStore::with_page_size(1);

        let created = route_request(
            &post_request(json!({"name": "Hub", "latitude": "12.50", "longitude": "-3.75"})),
            &store,
            at(0),
        );
        assert_eq!(created.status_code, 201);
        let id = created.json_body().expect("json")["id"]
            .as_str()
            .expect("id")
            .to_string();

        let updated = route_request(
            &item_request("PUT", &id, Some(json!({"address": "Main St 1"}))),
            &store,
            at(5),
        );
        assert_eq!(updated.status_code, 200);

        let listed = route_request(&request("GET", "/locations"), &store, at(10));
        let body = listed.json_body().expect("json");
        assert_eq!(body[0]["latitude"].to_string(), "12.50");
        assert_eq!(body[0]["address"], "Main St 1");

        let deleted = route_request(&item_request("DELETE", &id, None), &store, at(15));
        assert_eq!(deleted.status_code, 204);

        let listed = route_request(&request("GET", "/locations"), &store, at(20));
        assert_eq!(listed.json_body().expect("json"), json!([]));
    }

    #[test]
    fn unknown_route_is_json_404() {
        let response = route_request(&request("GET", "/"), &InMemoryLocationStore::new(), at(0));
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, r#"{"error":"Route not found"}"#);
    }
}
