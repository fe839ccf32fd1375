//! Client core for a paginated photo feed backed by the Unsplash REST API.
//!
//! The crate covers the parts of a photo client that hold state:
//! OAuth2 code exchange and token storage, the paginated feed with like
//! toggling, the profile/avatar lookups, and logout. Rendering is left to
//! whoever subscribes to the change events.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod inflight;
pub mod logging;
pub mod profile;
pub mod session;
pub mod token;

pub use error::{ServiceError, ServiceResult};
pub use session::Session;
