//! Paginated photo feed with like toggling.
//!
//! The service owns the photo collection exclusively. Pages are fetched
//! one at a time (a second `fetch_next_page` while one is pending is a
//! no-op) and appended in arrival order. Every mutation emits
//! [`FeedChanged`] while the state lock is still held, so subscribers see
//! notifications in mutation order.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Method;

use crate::api::models::{LikeResult, PhotoResult};
use crate::api::{routes, ApiClient};
use crate::config::Defaults;
use crate::error::ServiceResult;
use crate::events::{EventBus, FeedChanged, Subscription};
use crate::feed::Photo;

/// Result of a [`PhotoFeedService::fetch_next_page`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page `page` was appended; `inserted` are the new row indices.
    Loaded { page: u32, inserted: Range<usize> },
    /// Another page fetch was still running; nothing was requested.
    AlreadyLoading,
    /// The feed was reset while the page was in flight; result dropped.
    Discarded,
}

#[derive(Clone)]
pub struct PhotoFeedService {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    api: ApiClient,
    per_page: u32,
    state: Mutex<FeedState>,
    events: EventBus<FeedChanged>,
}

#[derive(Default)]
struct FeedState {
    photos: Vec<Photo>,
    ids: HashSet<String>,
    /// Last successfully loaded page.
    cursor: Option<u32>,
    loading: bool,
    /// Bumped by `reset` so late completions can tell they are stale.
    generation: u64,
}

/// Clears `loading` if the fetch future is dropped before completing.
struct LoadingGuard<'a> {
    inner: &'a FeedInner,
    generation: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.inner.state.lock();
            if state.generation == self.generation {
                state.loading = false;
            }
        }
    }
}

impl PhotoFeedService {
    pub fn new(api: ApiClient, defaults: &Defaults) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                api,
                per_page: defaults.per_page,
                state: Mutex::new(FeedState::default()),
                events: EventBus::new(),
            }),
        }
    }

    /// Fetch the page after the cursor and append it.
    ///
    /// # Errors
    /// `Unauthorized` without a credential (nothing is sent), otherwise
    /// network/decoding failures. On error the cursor does not move and
    /// no event is emitted; calling again retries the same page.
    pub async fn fetch_next_page(&self) -> ServiceResult<PageOutcome> {
        let (page, generation, request) = {
            let mut state = self.inner.state.lock();
            if state.loading {
                tracing::debug!("Page fetch already running, skipping");
                return Ok(PageOutcome::AlreadyLoading);
            }
            let page = state.cursor.map_or(1, |cursor| cursor + 1);
            let url = routes::photos(self.inner.api.base_url(), page, self.inner.per_page)?;
            let request = self.inner.api.authorized_request(Method::GET, url)?;
            state.loading = true;
            (page, state.generation, request)
        };

        let mut guard = LoadingGuard {
            inner: &self.inner,
            generation,
            armed: true,
        };

        tracing::debug!(page, per_page = self.inner.per_page, "Fetching photos page");
        let result = self
            .inner
            .api
            .execute_json::<Vec<PhotoResult>>(request)
            .await;
        guard.armed = false;

        let mut state = self.inner.state.lock();
        if state.generation != generation {
            tracing::debug!(page, "Feed was reset during fetch, dropping page");
            return Ok(PageOutcome::Discarded);
        }
        state.loading = false;

        let results = match result {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(page, error = %e, kind = e.error_type(), "Photos page fetch failed");
                return Err(e);
            }
        };

        let received = results.len();
        let start = state.photos.len();
        for photo in results.into_iter().map(Photo::from) {
            if state.ids.insert(photo.id.clone()) {
                state.photos.push(photo);
            }
        }
        let inserted = start..state.photos.len();
        state.cursor = Some(page);

        if inserted.len() < received {
            tracing::debug!(
                page,
                duplicates = received - inserted.len(),
                "Dropped photos already in feed"
            );
        }
        tracing::info!(page, added = inserted.len(), total = state.photos.len(), "Photos page loaded");

        self.inner.events.emit(FeedChanged);
        Ok(PageOutcome::Loaded { page, inserted })
    }

    /// Like (`like = true`) or unlike a photo.
    ///
    /// On success the photo, if still in the feed, is replaced by a copy
    /// carrying the confirmed state and `FeedChanged` is emitted. The
    /// confirmed state is the one the server reports in the response
    /// body, or the requested state when the body does not say.
    ///
    /// # Errors
    /// The feed is left untouched and the error is returned.
    pub async fn change_like(&self, photo_id: &str, like: bool) -> ServiceResult<bool> {
        let url = routes::photo_like(self.inner.api.base_url(), photo_id)?;
        let method = if like { Method::POST } else { Method::DELETE };
        let request = self.inner.api.authorized_request(method, url)?;

        let body = match self.inner.api.execute(request).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(photo_id, like, error = %e, "Like change failed");
                return Err(e);
            }
        };
        let liked = confirmed_like_state(&body, photo_id).unwrap_or(like);

        let mut state = self.inner.state.lock();
        match state.photos.iter().position(|p| p.id == photo_id) {
            Some(index) => {
                let updated = state.photos[index].with_liked(liked);
                state.photos[index] = updated;
                tracing::debug!(photo_id, liked, "Like state updated");
                self.inner.events.emit(FeedChanged);
            }
            None => {
                tracing::debug!(photo_id, "Liked photo no longer in feed");
            }
        }
        Ok(liked)
    }

    /// Return to the initial empty state. Pending fetches are discarded
    /// when they complete.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        let generation = state.generation + 1;
        *state = FeedState {
            generation,
            ..FeedState::default()
        };
        tracing::debug!("Photo feed reset");
    }

    /// Snapshot of the feed in display order.
    pub fn photos(&self) -> Vec<Photo> {
        self.inner.state.lock().photos.clone()
    }

    pub fn photo(&self, photo_id: &str) -> Option<Photo> {
        self.inner
            .state
            .lock()
            .photos
            .iter()
            .find(|p| p.id == photo_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> Option<u32> {
        self.inner.state.lock().cursor
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().loading
    }

    pub fn per_page(&self) -> u32 {
        self.inner.per_page
    }

    pub fn subscribe(&self) -> Subscription<FeedChanged> {
        self.inner.events.subscribe()
    }
}

fn confirmed_like_state(body: &[u8], photo_id: &str) -> Option<bool> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<LikeResult>(body) {
        Ok(result) if result.photo.id == photo_id => result.photo.liked_by_user,
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(photo_id, error = %e, "Like response not understood, using requested state");
            None
        }
    }
}
