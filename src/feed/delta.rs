use std::ops::Range;

/// What a consumer should redraw after a `FeedChanged`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedDelta {
    /// Rows in this range are new; existing rows are unchanged.
    Inserted(Range<usize>),
    /// Rows changed in place or the feed shrank; redraw everything.
    Reload,
}

/// Turns payload-less feed notifications into row deltas by remembering
/// how many rows the consumer has already shown.
#[derive(Debug, Clone, Default)]
pub struct FeedObserver {
    seen: usize,
}

impl FeedObserver {
    pub fn new(initial_len: usize) -> Self {
        Self { seen: initial_len }
    }

    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Compare against the feed's current length and remember it.
    pub fn observe(&mut self, current_len: usize) -> FeedDelta {
        let previous = self.seen;
        self.seen = current_len;
        if current_len > previous {
            FeedDelta::Inserted(previous..current_len)
        } else {
            FeedDelta::Reload
        }
    }
}
