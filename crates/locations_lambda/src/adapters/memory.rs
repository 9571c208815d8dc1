use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard, PoisonError};

use locations_core::contract::Location;

use super::location_store::{LocationStore, ScanPage, StoreError};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Process-local store for tests and local runs.
///
/// Scans are split into pages of `page_size` records ordered by id, so
/// callers see the same continuation behavior as a DynamoDB scan.
#[derive(Debug)]
pub struct InMemoryLocationStore {
    locations: Mutex<BTreeMap<String, Location>>,
    page_size: usize,
}

impl Default for InMemoryLocationStore {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            locations: Mutex::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    /// Record count. Reads through a poisoned lock rather than hiding the
    /// records behind it.
    pub fn len(&self) -> usize {
        self.locations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Location>>, StoreError> {
        self.locations
            .lock()
            .map_err(|_| StoreError::request("Lock", "in-memory store mutex poisoned"))
    }
}

impl LocationStore for InMemoryLocationStore {
    fn put_location(&self, location: &Location) -> Result<(), StoreError> {
        self.lock()?.insert(location.id.clone(), location.clone());
        Ok(())
    }

    fn get_location(&self, id: &str) -> Result<Option<Location>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn delete_location(&self, id: &str) -> Result<(), StoreError> {
        self.lock()?.remove(id);
        Ok(())
    }

    fn scan_page(&self, start_key: Option<&str>) -> Result<ScanPage, StoreError> {
        let locations = self.lock()?;
        let lower = match start_key {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };

        let mut remaining = locations
            .range::<str, _>((lower, Bound::Unbounded))
            .map(|(_, location)| location);
        let page: Vec<Location> = remaining.by_ref().take(self.page_size).cloned().collect();
        let last_evaluated_key = match (remaining.next(), page.last()) {
            (Some(_), Some(last)) => Some(last.id.clone()),
            _ => None,
        };

        Ok(ScanPage {
            locations: page,
            last_evaluated_key,
        })
    }
}
