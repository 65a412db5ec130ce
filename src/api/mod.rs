//! Backend access. Every request the front end makes goes through [`ApiClient`].

mod client;
mod error;

pub use client::{ApiClient, ApiResult, Health, SessionTicket};
pub use error::{ApiError, LogOnError};
