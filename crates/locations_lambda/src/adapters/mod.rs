pub mod dynamodb;
pub mod location_store;
pub mod memory;
