//! In-memory copy of one user's vocabulary.
//!
//! Every mutation writes to the database first and refreshes the cached
//! entries only once the write succeeded, so the screen never shows state the
//! database does not have. A failed reload after a successful write patches
//! the written entry into the cache.

use crate::database::vocabulary as store;
use crate::error::Result;
use crate::models::srs::{self, Outcome};
use crate::models::{VocabularyDraft, VocabularyEntry};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

pub struct VocabularyCache {
    user_id: i64,
    entries: Vec<VocabularyEntry>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl VocabularyCache {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            entries: Vec::new(),
            refreshed_at: None,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn get(&self, id: i64) -> Option<&VocabularyEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }

    /// Reloads all entries from the database.
    pub fn refresh(&mut self, conn: &Connection) -> Result<()> {
        self.entries = store::list_vocabulary(self.user_id, conn)?;
        self.refreshed_at = Some(Utc::now());
        Ok(())
    }

    /// Entries due at `now`, in review order.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<VocabularyEntry> {
        srs::due_entries(&self.entries, now)
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.entries.iter().filter(|e| srs::is_due(e, now)).count()
    }

    /// Distinct categories in alphabetical order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.entries.iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Case-insensitive search over French, English and category.
    pub fn search(&self, term: &str, category: Option<&str>) -> Vec<&VocabularyEntry> {
        let term = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| category.is_none_or(|c| e.category == c))
            .filter(|e| {
                term.is_empty()
                    || e.french.to_lowercase().contains(&term)
                    || e.english.to_lowercase().contains(&term)
                    || e.category.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Reloads after a successful write. If the reload fails the write still
    /// stands, so `patch` applies it to the cached entries instead.
    fn sync_after_write(&mut self, conn: &Connection, patch: impl FnOnce(&mut Vec<VocabularyEntry>)) {
        if let Err(e) = self.refresh(conn) {
            log::warn!("Vocabulary saved but reload failed, patching cache: {}", e);
            patch(&mut self.entries);
        }
    }

    pub fn add(&mut self, draft: &VocabularyDraft, now: DateTime<Utc>, conn: &Connection) -> Result<VocabularyEntry> {
        let entry = store::add_vocabulary(self.user_id, draft, now, conn)?;
        let added = entry.clone();
        self.sync_after_write(conn, |entries| entries.insert(0, added));
        Ok(entry)
    }

    pub fn edit(
        &mut self,
        id: i64,
        draft: &VocabularyDraft,
        now: DateTime<Utc>,
        conn: &Connection,
    ) -> Result<VocabularyEntry> {
        let entry = store::update_vocabulary(self.user_id, id, draft, now, conn)?;
        let updated = entry.clone();
        self.sync_after_write(conn, |entries| replace_entry(entries, updated));
        Ok(entry)
    }

    pub fn delete(&mut self, id: i64, conn: &Connection) -> Result<()> {
        store::delete_vocabulary(self.user_id, id, conn)?;
        self.sync_after_write(conn, |entries| entries.retain(|e| e.id != id));
        Ok(())
    }

    /// Schedules the next review of an entry and persists it.
    pub fn apply_review(
        &mut self,
        id: i64,
        outcome: Outcome,
        now: DateTime<Utc>,
        conn: &Connection,
    ) -> Result<VocabularyEntry> {
        let current_level = match self.get(id) {
            Some(entry) => entry.srs_level,
            None => store::get_vocabulary(self.user_id, id, conn)?.srs_level,
        };
        let update = srs::transition(current_level, outcome, now);
        let entry = store::record_review(self.user_id, id, &update, conn)?;
        let reviewed = entry.clone();
        self.sync_after_write(conn, |entries| replace_entry(entries, reviewed));
        Ok(entry)
    }
}

fn replace_entry(entries: &mut [VocabularyEntry], updated: VocabularyEntry) {
    if let Some(slot) = entries.iter_mut().find(|e| e.id == updated.id) {
        *slot = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use crate::database::users::create_user;
    use chrono::Duration;

    fn draft(french: &str, english: &str) -> VocabularyDraft {
        VocabularyDraft {
            french: french.to_string(),
            english: english.to_string(),
            ..Default::default()
        }
    }

    fn setup() -> (Connection, VocabularyCache) {
        let conn = test_connection();
        let user = create_user("Inès", "ines@example.com", "hash", Utc::now(), &conn).unwrap();
        (conn, VocabularyCache::new(user.id))
    }

    #[test]
    fn test_refresh_loads_entries() {
        let (conn, mut cache) = setup();
        assert!(!cache.is_loaded());
        store::add_vocabulary(cache.user_id(), &draft("eau", "water"), Utc::now(), &conn).unwrap();

        cache.refresh(&conn).unwrap();
        assert!(cache.is_loaded());
        assert_eq!(cache.entries().len(), 1);
    }

    #[test]
    fn test_apply_review_moves_entry_out_of_due_set() {
        let (conn, mut cache) = setup();
        let now = Utc::now();
        let entry = cache.add(&draft("maison", "house"), now, &conn).unwrap();
        assert_eq!(cache.due_count(now), 1);

        let reviewed = cache.apply_review(entry.id, Outcome::Good, now, &conn).unwrap();
        assert_eq!(reviewed.srs_level, 1);
        assert_eq!(cache.get(entry.id).unwrap().srs_level, 1);
        assert_eq!(cache.due_count(now), 0);
        assert_eq!(cache.due_count(now + Duration::days(1)), 1);
    }

    #[test]
    fn test_failed_write_leaves_cache_untouched() {
        let (conn, mut cache) = setup();
        let now = Utc::now();
        let entry = cache.add(&draft("lune", "moon"), now, &conn).unwrap();
        let before = cache.entries().to_vec();

        conn.execute_batch("DROP TABLE vocabulary;").unwrap();

        assert!(cache.apply_review(entry.id, Outcome::Easy, now, &conn).is_err());
        assert_eq!(cache.entries(), before.as_slice());
        assert!(cache.add(&draft("soleil", "sun"), now, &conn).is_err());
        assert_eq!(cache.entries().len(), 1);
    }

    #[test]
    fn test_saved_review_survives_failed_reload() {
        let (conn, mut cache) = setup();
        let now = Utc::now();
        let reviewed = cache.add(&draft("pomme", "apple"), now, &conn).unwrap();
        let broken = cache.add(&draft("poire", "pear"), now, &conn).unwrap();

        // An undecodable row makes the full reload fail, not the single-row write.
        conn.execute(
            "UPDATE vocabulary SET created_at = 'not a date' WHERE id = ?1",
            rusqlite::params![broken.id],
        )
        .unwrap();

        let entry = cache.apply_review(reviewed.id, Outcome::Good, now, &conn).unwrap();
        assert_eq!(entry.srs_level, 1);
        assert_eq!(cache.get(reviewed.id).unwrap().srs_level, 1);
        assert_eq!(cache.entries().len(), 2);
        assert_eq!(store::get_vocabulary(cache.user_id(), reviewed.id, &conn).unwrap().srs_level, 1);
    }

    #[test]
    fn test_search_and_categories() {
        let (conn, mut cache) = setup();
        let now = Utc::now();
        let mut food = draft("fromage", "cheese");
        food.category = "Food".to_string();
        cache.add(&food, now, &conn).unwrap();
        cache.add(&draft("vélo", "bike"), now, &conn).unwrap();

        assert_eq!(cache.categories(), vec!["Food".to_string(), "Uncategorized".to_string()]);
        assert_eq!(cache.search("CHEESE", None).len(), 1);
        assert_eq!(cache.search("", Some("Food")).len(), 1);
        assert_eq!(cache.search("vélo", Some("Food")).len(), 0);
    }
}
