// Data-access layer for the class booking backend

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{DataError, DataResult};
pub use services::Store;
