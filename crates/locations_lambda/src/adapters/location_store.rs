use locations_core::contract::Location;
use thiserror::Error;

/// One page of a full-table scan.
///
/// `last_evaluated_key` is the continuation cursor; `None` means the scan is
/// exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    pub locations: Vec<Location>,
    pub last_evaluated_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{operation} failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },
    #[error("malformed location item: {0}")]
    MalformedItem(String),
}

impl StoreError {
    pub fn request(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Request {
            operation,
            message: message.into(),
        }
    }
}

/// Access to the table holding location records, keyed by `id`.
pub trait LocationStore {
    /// Writes the full record, replacing any record with the same id.
    fn put_location(&self, location: &Location) -> Result<(), StoreError>;

    fn get_location(&self, id: &str) -> Result<Option<Location>, StoreError>;

    /// Removes the record. Deleting an absent id is not an error.
    fn delete_location(&self, id: &str) -> Result<(), StoreError>;

    /// Reads the page that starts after `start_key`, or the first page.
    fn scan_page(&self, start_key: Option<&str>) -> Result<ScanPage, StoreError>;
}
