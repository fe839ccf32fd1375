//! Authorization page URL and redirect handling.

use reqwest::Url;

use crate::config::ApiConfig;
use crate::error::{ServiceError, ServiceResult};

/// Path the authorization page redirects to once the user approves.
pub const NATIVE_REDIRECT_PATH: &str = "/oauth/authorize/native";

/// URL of the login page the user approves access on.
pub fn authorization_url(api: &ApiConfig) -> ServiceResult<Url> {
    let mut url = Url::parse(&api.authorize_url).map_err(|e| {
        ServiceError::InvalidRequest(format!("authorize_url '{}': {}", api.authorize_url, e))
    })?;
    // Scopes are configured '+'-joined; form encoding turns the spaces
    // back into '+' on the wire.
    let scope = api.access_scope.split('+').collect::<Vec<_>>().join(" ");
    url.query_pairs_mut()
        .append_pair("client_id", &api.access_key)
        .append_pair("redirect_uri", &api.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &scope);
    Ok(url)
}

/// Authorization code from a redirect URL, if this is the approval redirect.
pub fn extract_code(url: &Url) -> Option<String> {
    if url.path() != NATIVE_REDIRECT_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}
