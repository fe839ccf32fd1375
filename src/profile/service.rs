use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::{Method, Url};

use crate::api::models::ProfileResult;
use crate::api::{routes, ApiClient};
use crate::error::{ServiceError, ServiceResult};

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    /// First and last name joined, empty if neither is set.
    pub name: String,
    /// `@username`
    pub login_name: String,
    pub bio: Option<String>,
}

impl From<ProfileResult> for Profile {
    fn from(result: ProfileResult) -> Self {
        let name = [result.first_name.as_deref(), result.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Profile {
            login_name: format!("@{}", result.username),
            username: result.username,
            name,
            bio: result.bio.filter(|bio| !bio.trim().is_empty()),
        }
    }
}

/// Fetches and caches the profile. One profile per session.
#[derive(Clone)]
pub struct ProfileService {
    inner: Arc<ProfileInner>,
}

struct ProfileInner {
    api: ApiClient,
    state: Mutex<ProfileState>,
}

#[derive(Default)]
struct ProfileState {
    profile: Option<Profile>,
    generation: u64,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(ProfileInner {
                api,
                state: Mutex::new(ProfileState::default()),
            }),
        }
    }

    /// Profile of `username`, from cache when already fetched.
    pub async fn fetch_profile(&self, username: &str) -> ServiceResult<Profile> {
        if let Some(profile) = self.profile().filter(|p| p.username == username) {
            return Ok(profile);
        }
        let url = routes::user(self.inner.api.base_url(), username)?;
        self.fetch(url).await
    }

    /// Profile of whoever the stored credential belongs to.
    pub async fn fetch_current_profile(&self) -> ServiceResult<Profile> {
        if let Some(profile) = self.profile() {
            return Ok(profile);
        }
        let url = routes::me(self.inner.api.base_url())?;
        self.fetch(url).await
    }

    async fn fetch(&self, url: Url) -> ServiceResult<Profile> {
        let request = self.inner.api.authorized_request(Method::GET, url)?;
        let generation = self.inner.state.lock().generation;

        let profile: Profile = match self
            .inner
            .api
            .execute_json::<ProfileResult>(request)
            .await
        {
            Ok(result) => result.into(),
            Err(e) => {
                tracing::warn!(error = %e, kind = e.error_type(), "Profile fetch failed");
                return Err(e);
            }
        };

        let mut state = self.inner.state.lock();
        if state.generation != generation {
            return Err(ServiceError::Cancelled);
        }
        state.profile = Some(profile.clone());
        tracing::info!(username = %profile.username, "Profile loaded");
        Ok(profile)
    }

    pub fn profile(&self) -> Option<Profile> {
        self.inner.state.lock().profile.clone()
    }

    /// Drop the cached profile. Fetches still running resolve with
    /// `Cancelled` and do not repopulate the cache.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        state.profile = None;
        state.generation += 1;
        tracing::debug!("Profile cache reset");
    }
}
