//! Fun phrases (idioms, slang, proverbs, flirting lines).

use crate::error::Result;
use crate::models::{FunPhrase, PhraseKind};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, params};

impl ToSql for PhraseKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PhraseKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Phrases ordered by kind then phrase, optionally restricted to one kind.
pub fn list_fun_phrases(kind: Option<PhraseKind>, conn: &Connection) -> Result<Vec<FunPhrase>> {
    let mut stmt = conn.prepare(
        "SELECT id, phrase, meaning, kind, literal_translation, example, notes
         FROM fun_phrases
         WHERE ?1 IS NULL OR kind = ?1
         ORDER BY kind ASC, phrase ASC",
    )?;
    let phrases = stmt
        .query_map(params![kind], |row| {
            Ok(FunPhrase {
                id: row.get(0)?,
                phrase: row.get(1)?,
                meaning: row.get(2)?,
                kind: row.get(3)?,
                literal_translation: row.get(4)?,
                example: row.get(5)?,
                notes: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(phrases)
}

pub fn add_fun_phrase(phrase: &FunPhrase, now: DateTime<Utc>, conn: &Connection) -> Result<FunPhrase> {
    let mut phrase = phrase.validated()?;
    conn.execute(
        "INSERT INTO fun_phrases (phrase, meaning, kind, literal_translation, example, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            phrase.phrase,
            phrase.meaning,
            phrase.kind,
            phrase.literal_translation,
            phrase.example,
            phrase.notes,
            now
        ],
    )?;
    phrase.id = conn.last_insert_rowid();
    log::info!("Added {} '{}'", phrase.kind, phrase.phrase);
    Ok(phrase)
}

pub fn clear_fun_phrases(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM fun_phrases", [])?)
}
