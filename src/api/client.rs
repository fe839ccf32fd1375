use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Request, Url};
use serde::de::DeserializeOwned;

use crate::config::{Config, Credential};
use crate::error::{ServiceError, ServiceResult};
use crate::token::TokenStore;

/// Longest error body kept in [`ServiceError::HttpStatus`].
const MAX_ERROR_BODY: usize = 512;

/// Shared HTTP client that attaches the stored bearer token.
///
/// Cheap to clone; all clones share the connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> ServiceResult<Self> {
        let base_url = Url::parse(&config.api.base_url).map_err(|e| {
            ServiceError::InvalidRequest(format!(
                "base_url '{}' is not a valid URL: {}",
                config.api.base_url, e
            ))
        })?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(
                config.defaults.connect_timeout_seconds as u64,
            ))
            .timeout(Duration::from_secs(config.defaults.timeout_seconds as u64))
            .build()
            .map_err(|e| ServiceError::InvalidRequest(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Current credential, or `Unauthorized` when none is stored.
    ///
    /// An unreadable store counts as no credential.
    pub fn credential(&self) -> ServiceResult<Credential> {
        match self.tokens.get() {
            Ok(Some(credential)) => Ok(credential),
            Ok(None) => Err(ServiceError::Unauthorized),
            Err(e) => {
                tracing::warn!(error = %e, "Token store unreadable, treating as logged out");
                Err(ServiceError::Unauthorized)
            }
        }
    }

    /// Build a request carrying the bearer token.
    ///
    /// Fails with `Unauthorized` before touching the network if no
    /// credential is available.
    pub fn authorized_request(&self, method: Method, url: Url) -> ServiceResult<Request> {
        let credential = self.credential()?;
        self.http
            .request(method, url)
            .header(AUTHORIZATION, credential.authorization_value())
            .build()
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))
    }

    /// Build a request without credentials (token exchange).
    pub fn anonymous_request(&self, method: Method, url: Url) -> ServiceResult<Request> {
        self.http
            .request(method, url)
            .build()
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))
    }

    /// Send a request and return the body of a successful response.
    pub async fn execute(&self, request: Request) -> ServiceResult<Vec<u8>> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::debug!(%method, %path, error = %e, "Request failed");
            ServiceError::Network(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(ServiceError::Network)?;

        tracing::debug!(%method, %path, status = status.as_u16(), bytes = body.len(), "Response received");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ServiceError::Unauthorized);
        }
        if !status.is_success() {
            let mut text = String::from_utf8_lossy(&body).into_owned();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(ServiceError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(body.to_vec())
    }

    /// Send a request and decode its JSON body.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: Request) -> ServiceResult<T> {
        let body = self.execute(request).await?;
        decode(&body)
    }
}

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> ServiceResult<T> {
    serde_json::from_slice(body).map_err(ServiceError::Decoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;

    fn client_with(store: MemoryTokenStore) -> ApiClient {
        ApiClient::new(&Config::default(), Arc::new(store)).unwrap()
    }

    #[test]
    fn test_authorized_request_without_token_fails_fast() {
        let client = client_with(MemoryTokenStore::new());
        let url = client.base_url().join("/photos").unwrap();
        assert!(matches!(
            client.authorized_request(Method::GET, url),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn test_authorized_request_carries_bearer() {
        let client = client_with(MemoryTokenStore::with_credential(Credential::new("tok")));
        let url = client.base_url().join("/photos").unwrap();
        let request = client.authorized_request(Method::GET, url).unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer tok"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        let result = ApiClient::new(&config, Arc::new(MemoryTokenStore::new()));
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }
}
