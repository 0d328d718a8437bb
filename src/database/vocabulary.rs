//! Vocabulary CRUD and persistence of review results.
//!
//! Every query is scoped to one user; an id belonging to somebody else is
//! reported as not found.

use crate::error::{AppError, Result};
use crate::models::srs::{ReviewUpdate, clamp_level};
use crate::models::{VocabularyDraft, VocabularyEntry};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, user_id, french, english, example, notes, category, srs_level,
                       last_reviewed, next_review, created_at, updated_at";

pub(crate) fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<VocabularyEntry> {
    Ok(VocabularyEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        french: row.get(2)?,
        english: row.get(3)?,
        example: row.get(4)?,
        notes: row.get(5)?,
        category: row.get(6)?,
        srs_level: clamp_level(row.get(7)?),
        last_reviewed: row.get(8)?,
        next_review: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// All entries of a user, newest first.
pub fn list_vocabulary(user_id: i64, conn: &Connection) -> Result<Vec<VocabularyEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM vocabulary WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let entries = stmt
        .query_map(params![user_id], entry_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    log::debug!("Loaded {} vocabulary entries for user {}", entries.len(), user_id);
    Ok(entries)
}

pub fn get_vocabulary(user_id: i64, id: i64, conn: &Connection) -> Result<VocabularyEntry> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM vocabulary WHERE id = ?1 AND user_id = ?2"),
        params![id, user_id],
        entry_from_row,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("Vocabulary entry {}", id)))
}

/// Adds a new entry at level 0, due immediately.
pub fn add_vocabulary(
    user_id: i64,
    draft: &VocabularyDraft,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<VocabularyEntry> {
    insert_vocabulary(user_id, draft, (0, None, None), now, conn)
}

/// Inserts an entry carrying existing review state (used by imports).
pub fn insert_vocabulary(
    user_id: i64,
    draft: &VocabularyDraft,
    (srs_level, last_reviewed, next_review): (u8, Option<DateTime<Utc>>, Option<DateTime<Utc>>),
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<VocabularyEntry> {
    let draft = draft.normalized()?;
    conn.execute(
        "INSERT INTO vocabulary
            (user_id, french, english, example, notes, category, srs_level,
             last_reviewed, next_review, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            user_id,
            draft.french,
            draft.english,
            draft.example,
            draft.notes,
            draft.category,
            clamp_level(srs_level as i64),
            last_reviewed,
            next_review,
            now
        ],
    )?;
    let id = conn.last_insert_rowid();
    log::info!("Added vocabulary entry {} ('{}') for user {}", id, draft.french, user_id);
    get_vocabulary(user_id, id, conn)
}

/// Edits the display fields of an entry. Review state is left alone.
pub fn update_vocabulary(
    user_id: i64,
    id: i64,
    draft: &VocabularyDraft,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<VocabularyEntry> {
    let draft = draft.normalized()?;
    let changed = conn.execute(
        "UPDATE vocabulary
         SET french = ?1, english = ?2, example = ?3, notes = ?4, category = ?5, updated_at = ?6
         WHERE id = ?7 AND user_id = ?8",
        params![
            draft.french,
            draft.english,
            draft.example,
            draft.notes,
            draft.category,
            now,
            id,
            user_id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("Vocabulary entry {}", id)));
    }
    get_vocabulary(user_id, id, conn)
}

/// Stores the outcome of a review and returns the updated entry.
pub fn record_review(
    user_id: i64,
    id: i64,
    update: &ReviewUpdate,
    conn: &Connection,
) -> Result<VocabularyEntry> {
    let changed = conn.execute(
        "UPDATE vocabulary
         SET srs_level = ?1, last_reviewed = ?2, next_review = ?3, updated_at = ?2
         WHERE id = ?4 AND user_id = ?5",
        params![
            clamp_level(update.srs_level as i64),
            update.last_reviewed,
            update.next_review,
            id,
            user_id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("Vocabulary entry {}", id)));
    }
    log::info!(
        "Reviewed vocabulary entry {}: level {} next review {}",
        id,
        update.srs_level,
        update.next_review
    );
    get_vocabulary(user_id, id, conn)
}

pub fn delete_vocabulary(user_id: i64, id: i64, conn: &Connection) -> Result<()> {
    let deleted = conn.execute(
        "DELETE FROM vocabulary WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Vocabulary entry {}", id)));
    }
    log::info!("Deleted vocabulary entry {} for user {}", id, user_id);
    Ok(())
}

/// Removes every entry of a user, returning how many were removed.
pub fn clear_vocabulary(user_id: i64, conn: &Connection) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM vocabulary WHERE user_id = ?1", params![user_id])?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use crate::database::users::create_user;
    use crate::models::srs::{Outcome, transition};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap()
    }

    fn setup() -> (Connection, i64) {
        let conn = test_connection();
        let user = create_user("Léa", "lea@example.com", "hash", now(), &conn).unwrap();
        (conn, user.id)
    }

    fn draft(french: &str, english: &str) -> VocabularyDraft {
        VocabularyDraft {
            french: french.to_string(),
            english: english.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_starts_unscheduled() {
        let (conn, user_id) = setup();
        let entry = add_vocabulary(user_id, &draft("bonjour", "hello"), now(), &conn).unwrap();

        assert_eq!(entry.srs_level, 0);
        assert_eq!(entry.next_review, None);
        assert_eq!(entry.last_reviewed, None);
        assert_eq!(entry.category, "Uncategorized");
        assert_eq!(entry.created_at, now());
    }

    #[test]
    fn test_list_is_newest_first_and_scoped() {
        let (conn, user_id) = setup();
        let other = create_user("Max", "max@example.com", "hash", now(), &conn).unwrap();

        add_vocabulary(user_id, &draft("un", "one"), now(), &conn).unwrap();
        add_vocabulary(user_id, &draft("deux", "two"), now() + Duration::minutes(1), &conn).unwrap();
        add_vocabulary(other.id, &draft("trois", "three"), now(), &conn).unwrap();

        let entries = list_vocabulary(user_id, &conn).unwrap();
        let words: Vec<&str> = entries.iter().map(|e| e.french.as_str()).collect();
        assert_eq!(words, vec!["deux", "un"]);
    }

    #[test]
    fn test_record_review_persists_transition() {
        let (conn, user_id) = setup();
        let entry = add_vocabulary(user_id, &draft("merci", "thanks"), now(), &conn).unwrap();

        let update = transition(entry.srs_level, Outcome::Good, now());
        let reviewed = record_review(user_id, entry.id, &update, &conn).unwrap();

        assert_eq!(reviewed.srs_level, 1);
        assert_eq!(reviewed.last_reviewed, Some(now()));
        assert_eq!(reviewed.next_review, Some(now() + Duration::days(1)));
        assert_eq!(reviewed.french, "merci");
    }

    #[test]
    fn test_record_review_rejects_foreign_entry() {
        let (conn, user_id) = setup();
        let other = create_user("Max", "max@example.com", "hash", now(), &conn).unwrap();
        let entry = add_vocabulary(user_id, &draft("chat", "cat"), now(), &conn).unwrap();

        let update = transition(0, Outcome::Easy, now());
        let result = record_review(other.id, entry.id, &update, &conn);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_keeps_review_state() {
        let (conn, user_id) = setup();
        let entry = add_vocabulary(user_id, &draft("chien", "dog"), now(), &conn).unwrap();
        record_review(user_id, entry.id, &transition(0, Outcome::Easy, now()), &conn).unwrap();

        let mut edit = draft("chien", "dog");
        edit.example = "Le chien aboie.".to_string();
        let updated = update_vocabulary(user_id, entry.id, &edit, now(), &conn).unwrap();

        assert_eq!(updated.example.as_deref(), Some("Le chien aboie."));
        assert_eq!(updated.srs_level, 2);
    }

    #[test]
    fn test_out_of_range_level_clamped_on_read() {
        let (conn, user_id) = setup();
        let entry = add_vocabulary(user_id, &draft("vite", "fast"), now(), &conn).unwrap();
        conn.execute("UPDATE vocabulary SET srs_level = 12 WHERE id = ?1", params![entry.id])
            .unwrap();

        assert_eq!(get_vocabulary(user_id, entry.id, &conn).unwrap().srs_level, 7);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (conn, user_id) = setup();
        let entry = add_vocabulary(user_id, &draft("pain", "bread"), now(), &conn).unwrap();

        delete_vocabulary(user_id, entry.id, &conn).unwrap();
        assert!(matches!(
            delete_vocabulary(user_id, entry.id, &conn),
            Err(AppError::NotFound(_))
        ));
    }
}
