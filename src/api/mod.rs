//! HTTP access to the photo API.

mod client;
pub mod models;
pub mod routes;

pub use client::{decode, ApiClient};
