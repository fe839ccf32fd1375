//! Wire shapes of the REST API responses.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlsResult {
    pub raw: Option<String>,
    pub full: Option<String>,
    pub regular: Option<String>,
    pub small: Option<String>,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoResult {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub likes: Option<u32>,
    #[serde(default)]
    pub liked_by_user: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub urls: UrlsResult,
}

/// Body of the like/unlike endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LikeResult {
    pub photo: LikedPhoto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LikedPhoto {
    pub id: String,
    #[serde(default)]
    pub liked_by_user: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImage {
    pub small: String,
    pub medium: String,
    pub large: String,
}

/// Only the avatar part of a user object.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResult {
    pub profile_image: ProfileImage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResult {
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}
