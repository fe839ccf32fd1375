use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Method;

use crate::api::models::UserResult;
use crate::api::{routes, ApiClient};
use crate::error::{ServiceError, ServiceResult};
use crate::events::{AvatarChanged, EventBus, Subscription};
use crate::inflight::{InFlight, Ticket};

/// Fetches the avatar URL; a new fetch cancels the previous one.
#[derive(Clone)]
pub struct AvatarService {
    inner: Arc<AvatarInner>,
}

struct AvatarInner {
    api: ApiClient,
    state: Mutex<AvatarState>,
    events: EventBus<AvatarChanged>,
}

struct AvatarState {
    url: Option<String>,
    in_flight: InFlight<String>,
}

/// Frees the in-flight slot if the fetch future is dropped early.
struct FetchGuard<'a> {
    state: &'a Mutex<AvatarState>,
    ticket: &'a Ticket,
    armed: bool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().in_flight.finish(self.ticket);
        }
    }
}

impl AvatarService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(AvatarInner {
                api,
                state: Mutex::new(AvatarState {
                    url: None,
                    in_flight: InFlight::new(),
                }),
                events: EventBus::new(),
            }),
        }
    }

    /// Fetch the large avatar URL of `username`, cache it and emit
    /// [`AvatarChanged`].
    ///
    /// Any fetch still running is cancelled first, even when this one
    /// fails before sending.
    ///
    /// # Errors
    /// `Cancelled` if a newer fetch or a reset superseded this one.
    pub async fn fetch_avatar_url(&self, username: &str) -> ServiceResult<String> {
        let (ticket, request) = {
            let mut state = self.inner.state.lock();
            let (ticket, superseded) = state.in_flight.start(username.to_string());
            if let Some(previous) = superseded {
                tracing::debug!(previous = %previous, "Cancelled previous avatar fetch");
            }
            let request = routes::user(self.inner.api.base_url(), username)
                .and_then(|url| self.inner.api.authorized_request(Method::GET, url));
            match request {
                Ok(request) => (ticket, request),
                Err(e) => {
                    state.in_flight.finish(&ticket);
                    return Err(e);
                }
            }
        };

        let mut guard = FetchGuard {
            state: &self.inner.state,
            ticket: &ticket,
            armed: true,
        };
        let result = ticket
            .run(self.inner.api.execute_json::<UserResult>(request))
            .await;
        guard.armed = false;

        let mut state = self.inner.state.lock();
        if !state.in_flight.finish(&ticket) {
            return Err(ServiceError::Cancelled);
        }

        let user = match result {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(username, error = %e, "Avatar fetch failed");
                return Err(e);
            }
        };

        let avatar_url = user.profile_image.large;
        state.url = Some(avatar_url.clone());
        self.inner.events.emit(AvatarChanged {
            url: avatar_url.clone(),
        });
        tracing::debug!(username, "Avatar URL updated");
        Ok(avatar_url)
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.inner.state.lock().url.clone()
    }

    pub fn subscribe(&self) -> Subscription<AvatarChanged> {
        self.inner.events.subscribe()
    }

    /// Forget the cached URL and cancel any running fetch.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        state.in_flight.cancel();
        state.url = None;
        tracing::debug!("Avatar state reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Credential};
    use crate::token::MemoryTokenStore;
    use std::net::TcpListener;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dropped_fetch_frees_slot() {
        // Accepts connections into the backlog but never answers.
        let silent = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = Config::default();
        config.api.base_url = format!("http://{}", silent.local_addr().unwrap());
        let tokens = Arc::new(MemoryTokenStore::with_credential(Credential::new("t")));
        let service = AvatarService::new(ApiClient::new(&config, tokens).unwrap());

        let timed_out =
            tokio::time::timeout(Duration::from_millis(100), service.fetch_avatar_url("kate"))
                .await;
        assert!(timed_out.is_err());
        assert!(service.inner.state.lock().in_flight.current().is_none());
        assert!(service.avatar_url().is_none());
    }
}
