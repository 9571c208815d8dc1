use locations_core::contract::Location;

use super::error::LocationError;
use super::response::{format_response, ApiGatewayResponse};
use crate::adapters::location_store::{LocationStore, StoreError};

pub fn handle_get_locations(store: &dyn LocationStore) -> ApiGatewayResponse {
    match list_locations(store) {
        Ok(locations) => format_response(200, &locations),
        Err(error) => error.into_response(),
    }
}

/// Reads the whole table, following scan cursors until the store reports no
/// more pages. A failure on any page fails the whole listing.
pub fn list_locations(store: &dyn LocationStore) -> Result<Vec<Location>, LocationError> {
    let mut locations = Vec::new();
    let mut start_key: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store.scan_page(start_key.as_deref())?;
        pages += 1;
        locations.extend(page.locations);

        match page.last_evaluated_key {
            Some(next_key) if start_key.as_deref() == Some(next_key.as_str()) => {
                return Err(StoreError::request("Scan", "scan cursor did not advance").into());
            }
            Some(next_key) => start_key = Some(next_key),
            None => break,
        }
    }

    tracing::info!(count = locations.len(), pages, "Listed locations");
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{json, Value};

    use super::*;
    use crate::adapters::location_store::ScanPage;
    use crate::adapters::memory::InMemoryLocationStore;
    use crate::handlers::create::create_location;
    use crate::handlers::testing::{at, post_request, FailingStore};

    /// Serves pages from an inner store and fails once `fail_on_page` is reached.
    struct FlakyScanStore {
        inner: InMemoryLocationStore,
        fail_on_page: usize,
        pages_served: AtomicUsize,
    }

    impl LocationStore for FlakyScanStore {
        fn put_location(&self, location: &Location) -> Result<(), StoreError> {
            self.inner.put_location(location)
        }

        fn get_location(&self, id: &str) -> Result<Option<Location>, StoreError> {
            self.inner.get_location(id)
        }

        fn delete_location(&self, id: &str) -> Result<(), StoreError> {
            self.inner.delete_location(id)
        }

        fn scan_page(&self, start_key: Option<&str>) -> Result<ScanPage, StoreError> {
            let page_number = self.pages_served.fetch_add(1, Ordering::SeqCst) + 1;
            if page_number >= self.fail_on_page {
                return Err(StoreError::request("Scan", "ProvisionedThroughputExceeded"));
            }
            self.inner.scan_page(start_key)
        }
    }

    fn seed(store: &dyn LocationStore, count: usize) -> Vec<String> {
        (0..count)
            .map(|index| {
                let request = post_request(json!({
                    "name": format!("Site {index}"),
                    "latitude": index,
                    "longitude": index
                }));
                create_location(&request, store, at(0)).expect("seed").id
            })
            .collect()
    }

    #[test]
    fn returns_every_record_across_pages() {
        let store = InMemoryLocationStore::with_page_size(2);
        let mut created = seed(&store, 5);

        let mut listed: Vec<String> = list_locations(&store)
            .expect("listing")
            .into_iter()
            .map(|location| location.id)
            .collect();

        created.sort();
        listed.sort();
        assert_eq!(listed, created);
    }

    #[test]
    fn three_created_records_come_back_as_a_json_array() {
        let store = InMemoryLocationStore::with_page_size(1);
        seed(&store, 3);

        let response = handle_get_locations(&store);

        assert_eq!(response.status_code, 200);
        let body = response.json_body().expect("json body");
        assert_eq!(body.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn empty_table_lists_as_empty_array() {
        let response = handle_get_locations(&InMemoryLocationStore::new());
        assert_eq!(response.status_code, 200);
        assert_eq!(response.json_body().expect("json body"), Value::Array(Vec::new()));
    }

    #[test]
    fn failure_mid_scan_discards_partial_results() {
        let store = FlakyScanStore {
            inner: InMemoryLocationStore::with_page_size(1),
            fail_on_page: 2,
            pages_served: AtomicUsize::new(0),
        };
        seed(&store, 3);

        let response = handle_get_locations(&store);

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, r#"{"error":"Internal server error"}"#);
    }

    #[test]
    fn storage_failure_maps_to_internal_error() {
        assert_eq!(handle_get_locations(&FailingStore).status_code, 500);
    }
}
