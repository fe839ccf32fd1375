//! Photo feed: entities, pagination service and change tracking.

mod delta;
mod photo;
mod service;

pub use delta::{FeedDelta, FeedObserver};
pub use photo::Photo;
pub use service::{PageOutcome, PhotoFeedService};
