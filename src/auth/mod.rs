//! OAuth2 authorization-code flow.

mod authorize;
mod client;

pub use authorize::{authorization_url, extract_code, NATIVE_REDIRECT_PATH};
pub use client::AuthClient;
