//! Request and response messages of the games service.

pub mod requests;
pub mod responses;
