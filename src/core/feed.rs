use chrono::NaiveDate;
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::filters::CandidateFilter;
use crate::models::{Card, Preference};

/// Source of preference-filtered candidate cards
///
/// Implementations apply the filter themselves (in SQL or in memory) and
/// return cards ordered by user id ascending.
pub trait CandidateSource {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Card>, Self::Error>;
}

/// Per-viewer record of which profiles were surfaced on which calendar day
///
/// Infallible by contract: the feed never fails because of this store.
pub trait ShownCards: Send + Sync {
    fn shown_on(&self, viewer_id: i64, profile_id: i64, day: NaiveDate) -> bool;
    fn mark_shown(&self, viewer_id: i64, profile_id: i64, day: NaiveDate);
}

/// Builds the card feed: preference filter, then same-day dedup
///
/// A card the viewer already saw today is skipped; every card that makes it
/// into the result is marked shown-today, once, after the inclusion
/// decision. Skipped and filtered-out profiles are never marked, so they
/// stay eligible.
pub struct CardFeed<C> {
    source: Arc<C>,
    shown: Arc<dyn ShownCards>,
    clock: Arc<dyn Clock>,
}

impl<C> Clone for CardFeed<C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            shown: self.shown.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<C: CandidateSource> CardFeed<C> {
    pub fn new(source: Arc<C>, shown: Arc<dyn ShownCards>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            shown,
            clock,
        }
    }

    /// Next batch of cards for a viewer; recomputed on every call
    ///
    /// A store error aborts the whole call, no partial feed is returned.
    pub async fn next_cards(
        &self,
        viewer_id: i64,
        preferences: &Preference,
    ) -> Result<Vec<Card>, C::Error> {
        let filter = CandidateFilter::from_preferences(viewer_id, preferences);
        let candidates = self.source.candidates(&filter).await?;
        let today = self.clock.today();

        let total = candidates.len();
        let mut cards = Vec::with_capacity(total);
        for card in candidates {
            if self.shown.shown_on(viewer_id, card.user_id, today) {
                continue;
            }
            self.shown.mark_shown(viewer_id, card.user_id, today);
            cards.push(card);
        }

        tracing::debug!(
            "Feed for viewer {}: {} of {} candidates after dedup",
            viewer_id,
            cards.len(),
            total
        );

        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::sync::Mutex;

    struct MemoryCandidates {
        profiles: Vec<(i64, String, i32, bool)>, // (user_id, gender, age, is_deleted)
    }

    impl CandidateSource for MemoryCandidates {
        type Error = Infallible;

        async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Card>, Self::Error> {
            let mut cards: Vec<Card> = self
                .profiles
                .iter()
                .filter(|(id, gender, age, deleted)| filter.matches(*id, gender, *age, *deleted))
                .map(|(id, _, age, _)| Card {
                    user_id: *id,
                    verified: true,
                    name: format!("User {}", id),
                    age: *age,
                    bio: String::new(),
                    photo_url: String::new(),
                })
                .collect();
            cards.sort_by_key(|c| c.user_id);
            Ok(cards)
        }
    }

    #[derive(Default)]
    struct MemoryShown {
        entries: Mutex<HashMap<(i64, i64), NaiveDate>>,
    }

    impl ShownCards for MemoryShown {
        fn shown_on(&self, viewer_id: i64, profile_id: i64, day: NaiveDate) -> bool {
            self.entries.lock().unwrap().get(&(viewer_id, profile_id)) == Some(&day)
        }

        fn mark_shown(&self, viewer_id: i64, profile_id: i64, day: NaiveDate) {
            self.entries
                .lock()
                .unwrap()
                .insert((viewer_id, profile_id), day);
        }
    }

    fn feed(profiles: Vec<(i64, String, i32, bool)>) -> (CardFeed<MemoryCandidates>, ManualClock) {
        let clock = ManualClock::at(Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap());
        let feed = CardFeed::new(
            Arc::new(MemoryCandidates { profiles }),
            Arc::new(MemoryShown::default()),
            Arc::new(clock.clone()),
        );
        (feed, clock)
    }

    #[tokio::test]
    async fn test_cards_returned_once_per_day() {
        let (feed, clock) = feed(vec![
            (2, "female".to_string(), 25, false),
            (3, "female".to_string(), 30, false),
        ]);
        let prefs = Preference::unset(1);

        let first = feed.next_cards(1, &prefs).await.unwrap();
        assert_eq!(first.len(), 2);

        let second = feed.next_cards(1, &prefs).await.unwrap();
        assert!(second.is_empty());

        clock.advance_days(1);
        let next_day = feed.next_cards(1, &prefs).await.unwrap();
        assert_eq!(next_day.len(), 2);
    }

    #[tokio::test]
    async fn test_dedup_is_per_viewer() {
        let (feed, _) = feed(vec![(3, "female".to_string(), 25, false)]);

        let seen_by_1 = feed.next_cards(1, &Preference::unset(1)).await.unwrap();
        assert_eq!(seen_by_1.len(), 1);

        // Another viewer still gets the card
        let seen_by_2 = feed.next_cards(2, &Preference::unset(2)).await.unwrap();
        assert_eq!(seen_by_2.len(), 1);
    }

    #[tokio::test]
    async fn test_filtered_out_cards_are_not_marked() {
        let (feed, _) = feed(vec![(2, "female".to_string(), 40, false)]);

        // Age filter hides the only candidate
        let narrow = Preference {
            min_age: 20,
            max_age: 30,
            ..Preference::unset(1)
        };
        assert!(feed.next_cards(1, &narrow).await.unwrap().is_empty());

        // Widening the filter the same day surfaces it: it was never marked
        let wide = Preference::unset(1);
        assert_eq!(feed.next_cards(1, &wide).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_feed_order_is_ascending_by_id() {
        let (feed, _) = feed(vec![
            (9, "female".to_string(), 25, false),
            (2, "female".to_string(), 26, false),
            (5, "female".to_string(), 27, false),
        ]);

        let cards = feed.next_cards(1, &Preference::unset(1)).await.unwrap();
        let ids: Vec<i64> = cards.iter().map(|c| c.user_id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }
}
