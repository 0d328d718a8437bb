//! Grammar notes. Examples are kept as a JSON document in one column.

use super::db::json_column;
use crate::error::{AppError, Result};
use crate::models::GrammarNote;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

/// All notes ordered by category, then title.
pub fn list_grammar_notes(conn: &Connection) -> Result<Vec<GrammarNote>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, explanation, category, examples
         FROM grammar_notes
         ORDER BY category ASC, title ASC",
    )?;
    let notes = stmt
        .query_map([], |row| {
            Ok(GrammarNote {
                id: row.get(0)?,
                title: row.get(1)?,
                explanation: row.get(2)?,
                category: row.get(3)?,
                examples: json_column(row, 4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(notes)
}

pub fn add_grammar_note(note: &GrammarNote, now: DateTime<Utc>, conn: &Connection) -> Result<GrammarNote> {
    let mut note = note.validated()?;
    conn.execute(
        "INSERT INTO grammar_notes (title, explanation, category, examples, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            note.title,
            note.explanation,
            note.category,
            serde_json::to_string(&note.examples)?,
            now
        ],
    )?;
    note.id = conn.last_insert_rowid();
    log::info!("Added grammar note {} ('{}')", note.id, note.title);
    Ok(note)
}

pub fn update_grammar_note(note: &GrammarNote, now: DateTime<Utc>, conn: &Connection) -> Result<GrammarNote> {
    let note = note.validated()?;
    let changed = conn.execute(
        "UPDATE grammar_notes
         SET title = ?1, explanation = ?2, category = ?3, examples = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            note.title,
            note.explanation,
            note.category,
            serde_json::to_string(&note.examples)?,
            now,
            note.id
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("Grammar note {}", note.id)));
    }
    Ok(note)
}

pub fn delete_grammar_note(id: i64, conn: &Connection) -> Result<()> {
    let deleted = conn.execute("DELETE FROM grammar_notes WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Grammar note {}", id)));
    }
    log::info!("Deleted grammar note {}", id);
    Ok(())
}

pub fn clear_grammar_notes(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM grammar_notes", [])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use crate::models::GrammarExample;

    fn note(title: &str, category: &str) -> GrammarNote {
        GrammarNote {
            id: 0,
            title: title.to_string(),
            explanation: "Explanation".to_string(),
            category: category.to_string(),
            examples: vec![GrammarExample {
                french: "Je suis allé".to_string(),
                english: "I went".to_string(),
                hidden_parts: vec!["suis".to_string()],
            }],
        }
    }

    #[test]
    fn test_list_orders_by_category_then_title() {
        let conn = test_connection();
        let now = Utc::now();
        add_grammar_note(&note("Subjonctif", "Verbs"), now, &conn).unwrap();
        add_grammar_note(&note("Articles", "Nouns"), now, &conn).unwrap();
        add_grammar_note(&note("Imparfait", "Verbs"), now, &conn).unwrap();

        let titles: Vec<String> = list_grammar_notes(&conn)
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Articles", "Imparfait", "Subjonctif"]);
    }

    #[test]
    fn test_examples_survive_storage() {
        let conn = test_connection();
        let added = add_grammar_note(&note("Passé composé", "Verbs"), Utc::now(), &conn).unwrap();

        let notes = list_grammar_notes(&conn).unwrap();
        assert_eq!(notes[0], added);
        assert_eq!(notes[0].examples[0].hidden_parts, vec!["suis".to_string()]);
    }

    #[test]
    fn test_update_and_delete_missing() {
        let conn = test_connection();
        let mut missing = note("Ghost", "None");
        missing.id = 99;
        assert!(matches!(
            update_grammar_note(&missing, Utc::now(), &conn),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(delete_grammar_note(99, &conn), Err(AppError::NotFound(_))));
    }
}
