//! Games service contract, storage adapters and the service that ties them
//! together. The HTTP surface lives in the `api` crate.

pub mod models;
pub mod repositories;
pub mod services;
