//! Logout: wipe the credential and every piece of session state.

use std::sync::Arc;

use crate::auth::AuthClient;
use crate::events::{EventBus, SessionEvent, Subscription};
use crate::feed::PhotoFeedService;
use crate::profile::{AvatarService, ProfileService};
use crate::token::TokenStore;

/// Clears persisted web-session data (cookies, site storage) left by the
/// login page.
pub trait SiteDataCleaner: Send + Sync {
    fn clear_site_data(&self) -> anyhow::Result<()>;
}

/// For hosts without an embedded browser.
pub struct NoSiteData;

impl SiteDataCleaner for NoSiteData {
    fn clear_site_data(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Logout steps that can fail. Resetting services and notifying the
/// presentation layer cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutStep {
    ClearCredential,
    ClearSiteData,
}

/// Steps of a logout that did not succeed. Logout itself always finishes.
#[derive(Debug, Default)]
pub struct LogoutReport {
    pub failures: Vec<(LogoutStep, String)>,
}

impl LogoutReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self, step: LogoutStep) -> bool {
        self.failures.iter().any(|(s, _)| *s == step)
    }
}

pub struct SessionResetCoordinator {
    auth: AuthClient,
    tokens: Arc<dyn TokenStore>,
    site_data: Arc<dyn SiteDataCleaner>,
    feed: PhotoFeedService,
    profile: ProfileService,
    avatar: AvatarService,
    events: EventBus<SessionEvent>,
}

impl SessionResetCoordinator {
    pub fn new(
        auth: AuthClient,
        tokens: Arc<dyn TokenStore>,
        site_data: Arc<dyn SiteDataCleaner>,
        feed: PhotoFeedService,
        profile: ProfileService,
        avatar: AvatarService,
    ) -> Self {
        Self {
            auth,
            tokens,
            site_data,
            feed,
            profile,
            avatar,
            events: EventBus::new(),
        }
    }

    /// Run every logout step regardless of earlier failures.
    pub fn logout(&self) -> LogoutReport {
        let mut report = LogoutReport::default();

        // A running exchange must not store its token after the clear.
        self.auth.reset();

        if let Err(e) = self.tokens.clear() {
            tracing::error!(error = %e, "Failed to clear stored credential");
            report
                .failures
                .push((LogoutStep::ClearCredential, e.to_string()));
        }

        if let Err(e) = self.site_data.clear_site_data() {
            tracing::warn!(error = %e, "Failed to clear web session data");
            report
                .failures
                .push((LogoutStep::ClearSiteData, e.to_string()));
        }

        self.feed.reset();
        self.profile.reset();
        self.avatar.reset();

        let delivered = self.events.emit(SessionEvent::LoggedOut);
        if delivered == 0 {
            tracing::debug!("No presentation layer subscribed to logout");
        }

        tracing::info!(failures = report.failures.len(), "Logged out");
        report
    }

    pub fn subscribe(&self) -> Subscription<SessionEvent> {
        self.events.subscribe()
    }
}
