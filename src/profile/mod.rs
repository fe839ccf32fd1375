//! User profile and avatar.

mod avatar;
mod service;

pub use avatar::AvatarService;
pub use service::{Profile, ProfileService};
