//! Database setup for the French study application
//!
//! Opens the SQLite file, creates the tables for users, sessions, vocabulary,
//! grammar notes, stories and fun phrases, and stores small pieces of
//! application state such as the remembered session token.

use crate::error::Result;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS vocabulary (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        french TEXT NOT NULL,
        english TEXT NOT NULL,
        example TEXT,
        notes TEXT,
        category TEXT NOT NULL DEFAULT 'Uncategorized',
        srs_level INTEGER NOT NULL DEFAULT 0,
        last_reviewed TEXT,
        next_review TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS vocabulary_user_next_review ON vocabulary(user_id, next_review);
    CREATE INDEX IF NOT EXISTS vocabulary_user_category ON vocabulary(user_id, category);

    CREATE TABLE IF NOT EXISTS grammar_notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        explanation TEXT NOT NULL,
        category TEXT NOT NULL,
        examples TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS grammar_category ON grammar_notes(category);

    CREATE TABLE IF NOT EXISTS stories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        level TEXT NOT NULL,
        content TEXT NOT NULL,
        translation TEXT,
        comprehension_questions TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS stories_level ON stories(level);

    CREATE TABLE IF NOT EXISTS story_words (
        story_id INTEGER NOT NULL,
        position INTEGER NOT NULL,
        french TEXT NOT NULL,
        english TEXT NOT NULL,
        PRIMARY KEY (story_id, position),
        FOREIGN KEY (story_id) REFERENCES stories(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS fun_phrases (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        phrase TEXT NOT NULL,
        meaning TEXT NOT NULL,
        kind TEXT NOT NULL,
        literal_translation TEXT,
        example TEXT,
        notes TEXT,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS fun_phrases_kind ON fun_phrases(kind);

    CREATE TABLE IF NOT EXISTS app_state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Opens (creating if needed) the database file and its tables.
pub fn init_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    log::info!("Opened database at {}", path.display());
    Ok(conn)
}

/// Creates all tables on an already open connection.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn get_state(key: &str, conn: &Connection) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_state(key: &str, value: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_state(key: &str, conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
    Ok(())
}

/// Reads a TEXT column holding a JSON document.
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}
