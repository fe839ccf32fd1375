//! URL construction for each endpoint.
//!
//! Path segments are appended through `path_segments_mut`, so ids and
//! usernames are percent-encoded rather than spliced into the path.

use reqwest::Url;

use crate::config::ApiConfig;
use crate::error::{ServiceError, ServiceResult};

fn with_segments(base: &Url, segments: &[&str]) -> ServiceResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ServiceError::InvalidRequest(format!("'{}' cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `GET /photos?page=N&per_page=M`
pub fn photos(base: &Url, page: u32, per_page: u32) -> ServiceResult<Url> {
    let mut url = with_segments(base, &["photos"])?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("per_page", &per_page.to_string());
    Ok(url)
}

/// `POST|DELETE /photos/{id}/like`
pub fn photo_like(base: &Url, photo_id: &str) -> ServiceResult<Url> {
    if photo_id.is_empty() {
        return Err(ServiceError::InvalidRequest("photo id is empty".to_string()));
    }
    with_segments(base, &["photos", photo_id, "like"])
}

/// `GET /users/{username}`
pub fn user(base: &Url, username: &str) -> ServiceResult<Url> {
    if username.is_empty() {
        return Err(ServiceError::InvalidRequest("username is empty".to_string()));
    }
    with_segments(base, &["users", username])
}

/// `GET /me`
pub fn me(base: &Url) -> ServiceResult<Url> {
    with_segments(base, &["me"])
}

/// `POST /oauth/token` with the exchange parameters in the query.
pub fn token_exchange(api: &ApiConfig, code: &str) -> ServiceResult<Url> {
    if api.access_key.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "api.access_key is not configured".to_string(),
        ));
    }
    let mut url = Url::parse(&api.token_url).map_err(|e| {
        ServiceError::InvalidRequest(format!("token_url '{}': {}", api.token_url, e))
    })?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("client_id", &api.access_key);
        if let Some(secret) = api.secret_key.as_deref() {
            query.append_pair("client_secret", secret);
        }
        query
            .append_pair("redirect_uri", &api.redirect_uri)
            .append_pair("code", code)
            .append_pair("grant_type", "authorization_code");
    }
    Ok(url)
}
