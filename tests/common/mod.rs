//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use photofeed::config::{ApiConfig, Config, Credential, Defaults, StorageConfig};
use photofeed::session::{NoSiteData, SiteDataCleaner};
use photofeed::token::{MemoryTokenStore, TokenStore};
use photofeed::Session;
use std::sync::Arc;

pub const TEST_TOKEN: &str = "test-token";

/// Config pointing every endpoint at `base_url`.
pub fn test_config(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            token_url: format!("{}/oauth/token", base_url),
            authorize_url: format!("{}/oauth/authorize", base_url),
            access_key: "test-access-key".to_string(),
            secret_key: Some("test-secret".to_string()),
            ..ApiConfig::default()
        },
        defaults: Defaults {
            per_page: 2,
            timeout_seconds: 5,
            connect_timeout_seconds: 2,
        },
        storage: StorageConfig::default(),
    }
}

/// Session over an in-memory token store, signed in when `token` is set.
pub fn session_with(base_url: &str, token: Option<&str>) -> (Session, Arc<MemoryTokenStore>) {
    session_with_cleaner(base_url, token, Arc::new(NoSiteData))
}

pub fn session_with_cleaner(
    base_url: &str,
    token: Option<&str>,
    cleaner: Arc<dyn SiteDataCleaner>,
) -> (Session, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_credential(Credential::new(token)),
        None => MemoryTokenStore::new(),
    });
    let session = Session::new(&test_config(base_url), store.clone(), cleaner)
        .expect("Failed to build session");
    (session, store)
}

/// Minimal photo JSON as the photos endpoint returns it.
pub fn photo_json(id: &str, liked: bool, likes: u32) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "created_at": "2024-03-01T10:15:00Z",
            "width": 4000,
            "height": 3000,
            "likes": {likes},
            "liked_by_user": {liked},
            "description": "Photo {id}",
            "urls": {{
                "thumb": "https://images.example.com/{id}?w=200",
                "full": "https://images.example.com/{id}"
            }}
        }}"#
    )
}

/// A page body holding photos with the given ids, all unliked.
pub fn page_json(ids: &[&str]) -> String {
    let photos: Vec<String> = ids.iter().map(|id| photo_json(id, false, 5)).collect();
    format!("[{}]", photos.join(","))
}

pub fn user_json(username: &str, avatar: &str) -> String {
    format!(
        r#"{{
            "id": "u-{username}",
            "username": "{username}",
            "first_name": "Ekaterina",
            "last_name": "Novikova",
            "bio": "Landscapes",
            "profile_image": {{
                "small": "{avatar}?s=32",
                "medium": "{avatar}?s=64",
                "large": "{avatar}?s=128"
            }}
        }}"#
    )
}

/// Current token in `store`, if any.
pub fn stored_token(store: &dyn TokenStore) -> Option<String> {
    store
        .get()
        .expect("token store read failed")
        .map(|c| c.token().expose().to_string())
}
