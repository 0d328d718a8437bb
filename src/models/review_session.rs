//! Flashcard review session over the cards due today.
//! A card only counts as reviewed once its new schedule has been saved.

use super::VocabularyEntry;
use super::srs::{Outcome, preview_intervals};
use crate::cache::VocabularyCache;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

/// One pass through a snapshot of the due set, weakest cards first.
pub struct ReviewSession {
    pub cards: Vec<VocabularyEntry>,
    pub current_index: usize,
    pub show_answer: bool,
    pub reviewed_count: usize,
}

impl ReviewSession {
    pub fn from_cache(cache: &VocabularyCache, now: DateTime<Utc>) -> Self {
        Self::new(cache.due(now))
    }

    pub fn new(due_cards: Vec<VocabularyEntry>) -> Self {
        Self {
            cards: due_cards,
            current_index: 0,
            show_answer: false,
            reviewed_count: 0,
        }
    }

    pub fn has_cards(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn current_card(&self) -> Option<&VocabularyEntry> {
        self.cards.get(self.current_index)
    }

    pub fn reveal(&mut self) {
        self.show_answer = true;
    }

    /// Interval preview for the grade buttons of the current card.
    pub fn current_previews(&self) -> Option<[u32; 4]> {
        self.current_card().map(|card| preview_intervals(card.srs_level))
    }

    /// Grades the current card. On a failed save the session stays on the card.
    pub fn grade_current_card(
        &mut self,
        outcome: Outcome,
        cache: &mut VocabularyCache,
        now: DateTime<Utc>,
        conn: &Connection,
    ) -> Result<()> {
        let Some(card) = self.current_card() else {
            return Ok(());
        };
        let updated = cache.apply_review(card.id, outcome, now, conn)?;

        self.cards[self.current_index] = updated;
        self.reviewed_count += 1;
        self.current_index += 1;
        self.show_answer = false;
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.cards.len()
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count().saturating_sub(self.current_index)
    }

    /// Starts over with whatever is due now.
    pub fn restart(&mut self, cache: &VocabularyCache, now: DateTime<Utc>) {
        *self = Self::from_cache(cache, now);
    }

    pub fn progress_message(&self) -> String {
        if self.is_completed() {
            let plural = if self.reviewed_count == 1 { "" } else { "s" };
            format!("You've reviewed {} card{} today.", self.reviewed_count, plural)
        } else {
            format!("Card {} of {}", self.current_index + 1, self.total_count())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use crate::database::users::create_user;
    use crate::models::VocabularyDraft;
    use chrono::Duration;

    fn setup(words: &[&str]) -> (Connection, VocabularyCache) {
        let conn = test_connection();
        let user = create_user("Hugo", "hugo@example.com", "hash", Utc::now(), &conn).unwrap();
        let mut cache = VocabularyCache::new(user.id);
        for word in words {
            let draft = VocabularyDraft {
                french: word.to_string(),
                english: format!("{} (en)", word),
                ..Default::default()
            };
            cache.add(&draft, Utc::now(), &conn).unwrap();
        }
        (conn, cache)
    }

    #[test]
    fn test_empty_session_is_complete() {
        let (_conn, cache) = setup(&[]);
        let session = ReviewSession::from_cache(&cache, Utc::now());
        assert!(!session.has_cards());
        assert!(session.is_completed());
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_grading_advances_and_counts() {
        let (conn, mut cache) = setup(&["rouge", "vert"]);
        let now = Utc::now();
        let mut session = ReviewSession::from_cache(&cache, now);
        assert_eq!(session.progress_message(), "Card 1 of 2");

        session.reveal();
        assert!(session.show_answer);
        session.grade_current_card(Outcome::Good, &mut cache, now, &conn).unwrap();
        assert!(!session.show_answer);
        assert_eq!(session.remaining_count(), 1);

        session.grade_current_card(Outcome::Again, &mut cache, now, &conn).unwrap();
        assert!(session.is_completed());
        assert_eq!(session.reviewed_count, 2);
        assert_eq!(session.progress_message(), "You've reviewed 2 cards today.");
        assert_eq!(session.cards[0].srs_level, 1);
        assert_eq!(session.cards[1].srs_level, 0);
    }

    #[test]
    fn test_failed_save_keeps_current_card() {
        let (conn, mut cache) = setup(&["bleu"]);
        let now = Utc::now();
        let mut session = ReviewSession::from_cache(&cache, now);
        session.reveal();

        conn.execute_batch("DROP TABLE vocabulary;").unwrap();
        assert!(session.grade_current_card(Outcome::Easy, &mut cache, now, &conn).is_err());
        assert_eq!(session.current_index, 0);
        assert_eq!(session.reviewed_count, 0);
        assert!(session.show_answer);
        assert_eq!(session.current_card().unwrap().srs_level, 0);
    }

    #[test]
    fn test_restart_uses_refreshed_due_set() {
        let (conn, mut cache) = setup(&["noir", "blanc"]);
        let now = Utc::now();
        let mut session = ReviewSession::from_cache(&cache, now);
        session.grade_current_card(Outcome::Good, &mut cache, now, &conn).unwrap();
        session.grade_current_card(Outcome::Hard, &mut cache, now, &conn).unwrap();

        // Hard keeps level 0, which is due again immediately.
        session.restart(&cache, now);
        assert_eq!(session.total_count(), 1);
        assert_eq!(session.current_previews(), Some([0, 0, 1, 3]));

        session.restart(&cache, now + Duration::days(1));
        assert_eq!(session.total_count(), 2);
    }
}
