//! Reading stories and the words they highlight.

use super::db::json_column;
use crate::error::{AppError, Result};
use crate::models::srs::clamp_level;
use crate::models::{CefrLevel, HighlightedWord, Story, StoryDetail, StoryHighlight};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};

impl ToSql for CefrLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CefrLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn story_from_row(row: &Row<'_>) -> rusqlite::Result<Story> {
    Ok(Story {
        id: row.get(0)?,
        title: row.get(1)?,
        level: row.get(2)?,
        content: row.get(3)?,
        translation: row.get(4)?,
        comprehension_questions: json_column(row, 5)?,
        vocabulary_highlights: Vec::new(),
    })
}

fn story_words(story_id: i64, conn: &Connection) -> Result<Vec<StoryHighlight>> {
    let mut stmt = conn.prepare(
        "SELECT french, english FROM story_words WHERE story_id = ?1 ORDER BY position",
    )?;
    let words = stmt
        .query_map(params![story_id], |row| {
            Ok(StoryHighlight {
                french: row.get(0)?,
                english: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(words)
}

/// Stories ordered by level then title, optionally restricted to one level.
pub fn list_stories(level: Option<CefrLevel>, conn: &Connection) -> Result<Vec<Story>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, level, content, translation, comprehension_questions
         FROM stories
         WHERE ?1 IS NULL OR level = ?1
         ORDER BY level ASC, title ASC",
    )?;
    let mut stories = stmt
        .query_map(params![level], story_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for story in &mut stories {
        story.vocabulary_highlights = story_words(story.id, conn)?;
    }
    Ok(stories)
}

/// Fetches one story. Highlights carry the reader's own level for each word
/// found in their vocabulary; anonymous readers get no levels.
pub fn get_story(id: i64, viewer: Option<i64>, conn: &Connection) -> Result<StoryDetail> {
    let mut story = conn
        .query_row(
            "SELECT id, title, level, content, translation, comprehension_questions
             FROM stories WHERE id = ?1",
            params![id],
            story_from_row,
        )
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("Story {}", id)))?;
    story.vocabulary_highlights = story_words(id, conn)?;

    let mut stmt = conn.prepare(
        "SELECT MAX(srs_level) FROM vocabulary WHERE user_id = ?1 AND french = ?2",
    )?;
    let mut highlights = Vec::with_capacity(story.vocabulary_highlights.len());
    for word in &story.vocabulary_highlights {
        let srs_level = match viewer {
            Some(user_id) => stmt
                .query_row(params![user_id, word.french], |row| row.get::<_, Option<i64>>(0))?
                .map(clamp_level),
            None => None,
        };
        highlights.push(HighlightedWord {
            french: word.french.clone(),
            english: word.english.clone(),
            srs_level,
        });
    }

    Ok(StoryDetail { story, highlights })
}

pub fn insert_story(story: &Story, now: DateTime<Utc>, conn: &Connection) -> Result<Story> {
    if story.title.trim().is_empty() || story.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title, level, and content are required".to_string(),
        ));
    }
    conn.execute(
        "INSERT INTO stories (title, level, content, translation, comprehension_questions, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            story.title.trim(),
            story.level,
            story.content,
            story.translation,
            serde_json::to_string(&story.comprehension_questions)?,
            now
        ],
    )?;
    let id = conn.last_insert_rowid();
    for (position, word) in story.vocabulary_highlights.iter().enumerate() {
        conn.execute(
            "INSERT INTO story_words (story_id, position, french, english) VALUES (?1, ?2, ?3, ?4)",
            params![id, position as i64, word.french, word.english],
        )?;
    }
    log::info!("Added story {} ('{}')", id, story.title);
    Ok(Story {
        id,
        title: story.title.trim().to_string(),
        ..story.clone()
    })
}

pub fn clear_stories(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM stories", [])?)
}
