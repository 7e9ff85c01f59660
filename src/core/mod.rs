// Core exports
pub mod clock;
pub mod feed;
pub mod filters;
pub mod swipe_guard;

pub use clock::{Clock, ManualClock, SystemClock};
pub use feed::{CandidateSource, CardFeed, ShownCards};
pub use filters::{CandidateFilter, SqlValue};
pub use swipe_guard::{AppendOutcome, SwipeError, SwipeGuard, SwipeStore};
