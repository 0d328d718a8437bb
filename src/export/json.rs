//! JSON import/export of vocabulary and loading of seed data.
//!
//! Export files look like `{"entries": [...]}`. A seed directory holds
//! `vocabulary.json`, `grammar.json`, `stories.json` and `funstuff.json`,
//! each an object whose single array field is named `entries`, `notes`,
//! `stories` or `phrases`.

use crate::database::{fun_phrases, grammar, stories, vocabulary};
use crate::error::Result;
use crate::models::srs::clamp_level;
use crate::models::{
    CefrLevel, ComprehensionQuestion, FunPhrase, GrammarNote, Story, StoryHighlight, VocabularyDraft, VocabularyEntry,
};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A vocabulary entry as written to and read from JSON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRecord {
    #[serde(flatten)]
    pub draft: VocabularyDraft,
    #[serde(default)]
    pub srs_level: i64,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
}

impl From<&VocabularyEntry> for VocabularyRecord {
    fn from(entry: &VocabularyEntry) -> Self {
        Self {
            draft: VocabularyDraft::from_entry(entry),
            srs_level: entry.srs_level as i64,
            last_reviewed: entry.last_reviewed,
            next_review: entry.next_review,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct VocabularyFile {
    entries: Vec<VocabularyRecord>,
}

/// Story as found in seed files. Highlights name seeded vocabulary by French
/// word and are copied onto the story.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedStory {
    pub title: String,
    pub level: CefrLevel,
    pub content: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub comprehension_questions: Vec<ComprehensionQuestion>,
    #[serde(default)]
    pub vocab_french_words: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SeedData {
    pub vocabulary: Vec<VocabularyRecord>,
    pub grammar: Vec<GrammarNote>,
    pub stories: Vec<SeedStory>,
    pub phrases: Vec<FunPhrase>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub vocabulary: usize,
    pub grammar: usize,
    pub stories: usize,
    pub phrases: usize,
    pub linked_highlights: usize,
}

/// Writes the given entries to a pretty-printed JSON file.
pub fn export_vocabulary_to_path(entries: &[VocabularyEntry], path: &Path) -> Result<()> {
    let file = VocabularyFile {
        entries: entries.iter().map(VocabularyRecord::from).collect(),
    };
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    log::info!("Exported {} vocabulary entries to {}", entries.len(), path.display());
    Ok(())
}

pub fn read_vocabulary_file(path: &Path) -> Result<Vec<VocabularyRecord>> {
    let contents = fs::read_to_string(path)?;
    let file: VocabularyFile = serde_json::from_str(&contents)?;
    Ok(file.entries)
}

/// Adds every entry from an export file to the user's vocabulary, keeping
/// its review state. Returns the number of entries imported.
pub fn import_vocabulary(user_id: i64, path: &Path, now: DateTime<Utc>, conn: &Connection) -> Result<usize> {
    let records = read_vocabulary_file(path)?;
    let tx = conn.unchecked_transaction()?;
    insert_records(user_id, &records, now, &tx)?;
    tx.commit()?;
    log::info!("Imported {} vocabulary entries from {}", records.len(), path.display());
    Ok(records.len())
}

fn insert_records(
    user_id: i64,
    records: &[VocabularyRecord],
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<Vec<VocabularyEntry>> {
    records
        .iter()
        .map(|record| {
            vocabulary::insert_vocabulary(
                user_id,
                &record.draft,
                (clamp_level(record.srs_level), record.last_reviewed, record.next_review),
                now,
                conn,
            )
        })
        .collect()
}

/// Reads the array stored under `key`. A missing or malformed file is
/// logged and treated as empty.
pub fn load_seed_list<T: DeserializeOwned>(path: &Path, key: &str) -> Vec<T> {
    let parsed = fs::read_to_string(path)
        .map_err(crate::error::AppError::from)
        .and_then(|raw| Ok(serde_json::from_str::<serde_json::Value>(&raw)?))
        .and_then(|mut value| {
            let list = value.get_mut(key).map(serde_json::Value::take);
            match list {
                Some(list) => Ok(serde_json::from_value::<Vec<T>>(list)?),
                None => Ok(Vec::new()),
            }
        });

    match parsed {
        Ok(items) => {
            log::info!("Loaded {} items from {}", items.len(), path.display());
            items
        }
        Err(e) => {
            log::warn!("Proceeding without data from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

pub fn load_seed_dir(dir: &Path) -> SeedData {
    SeedData {
        vocabulary: load_seed_list(&dir.join("vocabulary.json"), "entries"),
        grammar: load_seed_list(&dir.join("grammar.json"), "notes"),
        stories: load_seed_list(&dir.join("stories.json"), "stories"),
        phrases: load_seed_list(&dir.join("funstuff.json"), "phrases"),
    }
}

/// Replaces the shared content and the user's vocabulary with the seed data.
pub fn seed_database(data: &SeedData, user_id: i64, now: DateTime<Utc>, conn: &Connection) -> Result<SeedReport> {
    let tx = conn.unchecked_transaction()?;
    let mut report = SeedReport::default();

    let cleared = vocabulary::clear_vocabulary(user_id, &tx)?;
    log::info!("Cleared {} existing vocabulary entries", cleared);
    let inserted = insert_records(user_id, &data.vocabulary, now, &tx)?;
    report.vocabulary = inserted.len();
    let vocab_words: HashMap<&str, &str> = inserted
        .iter()
        .map(|entry| (entry.french.as_str(), entry.english.as_str()))
        .collect();

    grammar::clear_grammar_notes(&tx)?;
    for note in &data.grammar {
        grammar::add_grammar_note(note, now, &tx)?;
        report.grammar += 1;
    }

    stories::clear_stories(&tx)?;
    for seed in &data.stories {
        let highlights: Vec<StoryHighlight> = seed
            .vocab_french_words
            .iter()
            .filter_map(|word| {
                let french = word.trim();
                vocab_words.get(french).map(|english| StoryHighlight {
                    french: french.to_string(),
                    english: english.to_string(),
                })
            })
            .collect();
        if !seed.vocab_french_words.is_empty() {
            log::info!(
                "Linking story '{}' to {}/{} vocabulary items",
                seed.title,
                highlights.len(),
                seed.vocab_french_words.len()
            );
        }
        report.linked_highlights += highlights.len();
        let story = Story {
            id: 0,
            title: seed.title.clone(),
            level: seed.level,
            content: seed.content.clone(),
            translation: seed.translation.clone(),
            vocabulary_highlights: highlights,
            comprehension_questions: seed.comprehension_questions.clone(),
        };
        stories::insert_story(&story, now, &tx)?;
        report.stories += 1;
    }

    fun_phrases::clear_fun_phrases(&tx)?;
    for phrase in &data.phrases {
        fun_phrases::add_fun_phrase(phrase, now, &tx)?;
        report.phrases += 1;
    }

    tx.commit()?;
    log::info!("Seeding completed: {:?}", report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::test_connection;
    use crate::database::users::create_user;
    use crate::models::srs::{Outcome, transition};

    fn user(conn: &Connection) -> i64 {
        create_user("Chloé", "chloe@example.com", "hash", Utc::now(), conn)
            .unwrap()
            .id
    }

    #[test]
    fn test_export_then_import_keeps_review_state() {
        let conn = test_connection();
        let user_id = user(&conn);
        let now = Utc::now();
        let entry = vocabulary::add_vocabulary(
            user_id,
            &VocabularyDraft {
                french: "étoile".to_string(),
                english: "star".to_string(),
                example: "Une étoile filante".to_string(),
                ..Default::default()
            },
            now,
            &conn,
        )
        .unwrap();
        let reviewed = vocabulary::record_review(user_id, entry.id, &transition(0, Outcome::Easy, now), &conn).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.json");
        export_vocabulary_to_path(&[reviewed.clone()], &path).unwrap();

        let other = test_connection();
        let other_user = user(&other);
        assert_eq!(import_vocabulary(other_user, &path, now, &other).unwrap(), 1);

        let imported = &vocabulary::list_vocabulary(other_user, &other).unwrap()[0];
        assert_eq!(imported.french, "étoile");
        assert_eq!(imported.example.as_deref(), Some("Une étoile filante"));
        assert_eq!(imported.srs_level, 2);
        assert_eq!(imported.next_review, reviewed.next_review);
    }

    #[test]
    fn test_import_invalid_json_fails() {
        let conn = test_connection();
        let user_id = user(&conn);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(import_vocabulary(user_id, &path, Utc::now(), &conn).is_err());
        assert!(import_vocabulary(user_id, &dir.path().join("missing.json"), Utc::now(), &conn).is_err());
    }

    #[test]
    fn test_missing_seed_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("grammar.json"), "not json").unwrap();

        let data = load_seed_dir(dir.path());
        assert!(data.vocabulary.is_empty());
        assert!(data.grammar.is_empty());
        assert!(data.stories.is_empty());
        assert!(data.phrases.is_empty());
    }

    #[test]
    fn test_seed_links_story_highlights() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("vocabulary.json"),
            r#"{"entries": [
                {"french": "pain", "english": "bread", "category": "Food"},
                {"french": "lait", "english": "milk", "srsLevel": 3}
            ]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("grammar.json"),
            r#"{"notes": [{"title": "Articles", "explanation": "le, la", "category": "Nouns",
                           "examples": [{"french": "le pain", "english": "the bread", "hiddenParts": ["le"]}]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("stories.json"),
            r#"{"stories": [{"title": "Au marché", "level": "A1", "content": "Marie achète du pain.",
                             "vocabFrenchWords": ["pain", "fromage"],
                             "comprehensionQuestions": [{"question": "Quoi ?", "options": ["pain", "lait"], "correctAnswerIndex": 0}]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("funstuff.json"),
            r#"{"phrases": [{"phrase": "Avoir la pêche", "meaning": "To feel great", "type": "idiom"}]}"#,
        )
        .unwrap();

        let conn = test_connection();
        let user_id = user(&conn);
        let data = load_seed_dir(dir.path());
        let report = seed_database(&data, user_id, Utc::now(), &conn).unwrap();

        assert_eq!(
            report,
            SeedReport {
                vocabulary: 2,
                grammar: 1,
                stories: 1,
                phrases: 1,
                linked_highlights: 1,
            }
        );

        let story_list = stories::list_stories(None, &conn).unwrap();
        let detail = stories::get_story(story_list[0].id, None, &conn).unwrap();
        assert_eq!(detail.highlights.len(), 1);
        assert_eq!(detail.highlights[0].french, "pain");
        assert_eq!(detail.highlights[0].english, "bread");
        assert_eq!(detail.highlights[0].srs_level, None);

        let reader_view = stories::get_story(story_list[0].id, Some(user_id), &conn).unwrap();
        assert_eq!(reader_view.highlights[0].srs_level, Some(0));

        let vocab = vocabulary::list_vocabulary(user_id, &conn).unwrap();
        assert!(vocab.iter().any(|e| e.french == "lait" && e.srs_level == 3));

        // Seeding again replaces instead of duplicating.
        seed_database(&data, user_id, Utc::now(), &conn).unwrap();
        assert_eq!(vocabulary::list_vocabulary(user_id, &conn).unwrap().len(), 2);
        assert_eq!(grammar::list_grammar_notes(&conn).unwrap().len(), 1);
    }
}
