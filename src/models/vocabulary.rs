//! A vocabulary entry is a French word or expression with its English meaning
//! and the spaced repetition state used by flashcard reviews.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: i64,
    pub user_id: i64,
    pub french: String,
    pub english: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub category: String,
    pub srs_level: u8,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user can enter or edit. Also the shape of exported and seeded entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyDraft {
    pub french: String,
    pub english: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub category: String,
}

impl VocabularyDraft {
    pub fn from_entry(entry: &VocabularyEntry) -> Self {
        Self {
            french: entry.french.clone(),
            english: entry.english.clone(),
            example: entry.example.clone().unwrap_or_default(),
            notes: entry.notes.clone().unwrap_or_default(),
            category: entry.category.clone(),
        }
    }

    /// Trims every field and fills in the default category.
    pub fn normalized(&self) -> Result<NormalizedDraft> {
        let french = self.french.trim();
        let english = self.english.trim();
        if french.is_empty() || english.is_empty() {
            return Err(AppError::Validation(
                "French and English fields are required".to_string(),
            ));
        }
        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            c => c.to_string(),
        };
        Ok(NormalizedDraft {
            french: french.to_string(),
            english: english.to_string(),
            example: non_empty(&self.example),
            notes: non_empty(&self.notes),
            category,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDraft {
    pub french: String,
    pub english: String,
    pub example: Option<String>,
    pub notes: Option<String>,
    pub category: String,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_and_defaults() {
        let draft = VocabularyDraft {
            french: "  bonjour ".to_string(),
            english: "hello".to_string(),
            example: "   ".to_string(),
            notes: " formal ".to_string(),
            category: String::new(),
        };

        let normalized = draft.normalized().unwrap();
        assert_eq!(normalized.french, "bonjour");
        assert_eq!(normalized.example, None);
        assert_eq!(normalized.notes.as_deref(), Some("formal"));
        assert_eq!(normalized.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_normalized_requires_both_languages() {
        let draft = VocabularyDraft {
            french: "chat".to_string(),
            english: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(draft.normalized(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_draft_deserializes_with_missing_optional_fields() {
        let draft: VocabularyDraft =
            serde_json::from_str(r#"{"french": "pomme", "english": "apple"}"#).unwrap();
        assert_eq!(draft.french, "pomme");
        assert!(draft.category.is_empty());
    }
}
