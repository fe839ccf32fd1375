use chrono::{DateTime, Utc};

use crate::api::models::PhotoResult;

/// One photo in the feed. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub thumb_url: String,
    pub full_url: String,
    pub liked: bool,
    pub likes: u32,
}

impl Photo {
    /// Copy with the liked flag set, adjusting the like counter when the
    /// flag actually flips.
    pub fn with_liked(&self, liked: bool) -> Photo {
        let likes = match (self.liked, liked) {
            (false, true) => self.likes.saturating_add(1),
            (true, false) => self.likes.saturating_sub(1),
            _ => self.likes,
        };
        Photo {
            liked,
            likes,
            ..self.clone()
        }
    }
}

impl From<PhotoResult> for Photo {
    fn from(result: PhotoResult) -> Self {
        let urls = result.urls;
        let thumb_url = urls
            .thumb
            .clone()
            .or_else(|| urls.small.clone())
            .or_else(|| urls.regular.clone())
            .unwrap_or_default();
        let full_url = urls
            .full
            .or(urls.regular)
            .or(urls.raw)
            .unwrap_or_default();

        Photo {
            id: result.id,
            width: result.width,
            height: result.height,
            created_at: result.created_at,
            description: result.description,
            thumb_url,
            full_url,
            liked: result.liked_by_user,
            likes: result.likes.unwrap_or(0),
        }
    }
}
