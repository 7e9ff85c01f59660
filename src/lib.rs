//! Ember API - backend service for the Ember dating app
//!
//! This library provides the swipe and feed core used by the Ember backend:
//! a daily swipe quota with same-day duplicate prevention, a card feed that
//! never shows a viewer the same profile twice in one day, and the
//! preference filter that feeds both.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{CandidateFilter, CardFeed, Clock, ManualClock, SwipeError, SwipeGuard, SystemClock};
pub use models::{Card, Preference, PreferredGender, Swipe, SwipeDirection};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let filter = CandidateFilter::from_preferences(1, &Preference::unset(1));
        assert!(filter.matches(2, "female", 30, false));
        assert!(!filter.matches(1, "female", 30, false));
    }
}
