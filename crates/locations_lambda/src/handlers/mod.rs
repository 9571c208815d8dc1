pub mod create;
pub mod delete;
pub mod error;
pub mod get_all;
pub mod request;
pub mod response;
pub mod router;
pub mod update;
