//! Session wiring.
//!
//! [`Session`] builds every service once, sharing one [`ApiClient`] and
//! one token store, and hands out references. There is no global state:
//! two sessions in one process are fully independent.

mod reset;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::AuthClient;
use crate::config::Config;
use crate::error::ServiceResult;
use crate::events::{SessionEvent, Subscription};
use crate::feed::PhotoFeedService;
use crate::profile::{AvatarService, ProfileService};
use crate::token::{FileTokenStore, TokenStore};

pub use reset::{LogoutReport, LogoutStep, NoSiteData, SessionResetCoordinator, SiteDataCleaner};

pub struct Session {
    api: ApiClient,
    auth: AuthClient,
    feed: PhotoFeedService,
    profile: ProfileService,
    avatar: AvatarService,
    reset: SessionResetCoordinator,
}

impl Session {
    pub fn new(
        config: &Config,
        tokens: Arc<dyn TokenStore>,
        site_data: Arc<dyn SiteDataCleaner>,
    ) -> ServiceResult<Self> {
        let api = ApiClient::new(config, Arc::clone(&tokens))?;
        let auth = AuthClient::new(api.clone(), config.api.clone());
        let feed = PhotoFeedService::new(api.clone(), &config.defaults);
        let profile = ProfileService::new(api.clone());
        let avatar = AvatarService::new(api.clone());
        let reset = SessionResetCoordinator::new(
            auth.clone(),
            tokens,
            site_data,
            feed.clone(),
            profile.clone(),
            avatar.clone(),
        );

        Ok(Self {
            api,
            auth,
            feed,
            profile,
            avatar,
            reset,
        })
    }

    /// Session backed by the token file from `config`, with no web
    /// session data to clear.
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        let tokens = Arc::new(FileTokenStore::new(config.token_path()));
        Self::new(config, tokens, Arc::new(NoSiteData))
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn feed(&self) -> &PhotoFeedService {
        &self.feed
    }

    pub fn profile(&self) -> &ProfileService {
        &self.profile
    }

    pub fn avatar(&self) -> &AvatarService {
        &self.avatar
    }

    /// Whether a credential is stored.
    pub fn is_authenticated(&self) -> bool {
        self.api.credential().is_ok()
    }

    pub fn logout(&self) -> LogoutReport {
        self.reset.logout()
    }

    pub fn subscribe(&self) -> Subscription<SessionEvent> {
        self.reset.subscribe()
    }
}
