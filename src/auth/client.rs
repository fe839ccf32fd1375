use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Method;

use crate::api::models::TokenResponse;
use crate::api::{routes, ApiClient};
use crate::config::{ApiConfig, Credential};
use crate::error::{ServiceError, ServiceResult};
use crate::inflight::{InFlight, Ticket};

/// Exchanges authorization codes for a bearer token.
///
/// At most one exchange runs at a time; a call with a different code
/// cancels the running one. A code is never sent twice once the server
/// may have consumed it.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    api: ApiClient,
    config: ApiConfig,
    state: Mutex<AuthState>,
}

struct AuthState {
    /// Codes that must not be submitted again.
    used: HashSet<String>,
    in_flight: InFlight<String>,
}

/// Releases the in-flight slot if the exchange future is dropped before
/// completing. The request may already have reached the server, so the
/// code is burned.
struct ExchangeGuard<'a> {
    state: &'a Mutex<AuthState>,
    ticket: &'a Ticket,
    code: &'a str,
    armed: bool,
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock();
            if state.in_flight.finish(self.ticket) {
                state.used.insert(self.code.to_string());
                tracing::debug!("Token exchange dropped before completing");
            }
        }
    }
}

impl AuthClient {
    pub fn new(api: ApiClient, config: ApiConfig) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                api,
                config,
                state: Mutex::new(AuthState {
                    used: HashSet::new(),
                    in_flight: InFlight::new(),
                }),
            }),
        }
    }

    /// Trade `code` for a credential and persist it.
    ///
    /// # Errors
    /// - `DuplicateRequest` if `code` is in flight or was already used.
    /// - `Cancelled` if a later call or a reset superseded this one.
    /// - `Network`/`HttpStatus`/`Decoding` on exchange failure.
    pub async fn exchange_code(&self, code: &str) -> ServiceResult<Credential> {
        let inner = &self.inner;
        let (ticket, request) = {
            let mut state = inner.state.lock();
            if state.used.contains(code) || state.in_flight.current().is_some_and(|c| c == code) {
                tracing::warn!("Authorization code already submitted, rejecting");
                return Err(ServiceError::DuplicateRequest);
            }

            let url = routes::token_exchange(&inner.config, code)?;
            let request = inner.api.anonymous_request(Method::POST, url)?;

            let (ticket, superseded) = state.in_flight.start(code.to_string());
            if let Some(old) = superseded {
                tracing::info!("Cancelled superseded token exchange");
                // The server may already have consumed it.
                state.used.insert(old);
            }
            (ticket, request)
        };

        let mut guard = ExchangeGuard {
            state: &inner.state,
            ticket: &ticket,
            code,
            armed: true,
        };
        let result = ticket
            .run(inner.api.execute_json::<TokenResponse>(request))
            .await;
        guard.armed = false;

        let mut state = inner.state.lock();
        if !state.in_flight.finish(&ticket) {
            return Err(ServiceError::Cancelled);
        }

        match result {
            Ok(response) => {
                state.used.insert(code.to_string());
                let credential = Credential::new(response.access_token);
                inner.api.tokens().set(&credential)?;
                tracing::info!(
                    scope = response.scope.as_deref().unwrap_or(""),
                    "Token exchange succeeded"
                );
                Ok(credential)
            }
            Err(e) => {
                if burns_code(&e) {
                    state.used.insert(code.to_string());
                }
                tracing::warn!(error = %e, kind = e.error_type(), "Token exchange failed");
                Err(e)
            }
        }
    }

    /// Whether an exchange is currently running.
    pub fn is_exchanging(&self) -> bool {
        self.inner.state.lock().in_flight.current().is_some()
    }

    /// Cancel a running exchange so its result is never stored. The
    /// cancelled code stays burned.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        if let Some(code) = state.in_flight.cancel() {
            state.used.insert(code);
            tracing::debug!("Cancelled running token exchange");
        }
    }
}

/// A pure transport failure never reached the server, so the code is
/// still valid. Any response means it may have been consumed.
fn burns_code(error: &ServiceError) -> bool {
    !matches!(error, ServiceError::Network(_))
}
