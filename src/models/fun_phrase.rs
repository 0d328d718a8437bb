//! Idioms, slang, proverbs and flirting lines.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseKind {
    Idiom,
    Slang,
    Proverb,
    Flirt,
}

impl PhraseKind {
    pub const ALL: [PhraseKind; 4] = [
        PhraseKind::Idiom,
        PhraseKind::Slang,
        PhraseKind::Proverb,
        PhraseKind::Flirt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PhraseKind::Idiom => "idiom",
            PhraseKind::Slang => "slang",
            PhraseKind::Proverb => "proverb",
            PhraseKind::Flirt => "flirt",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PhraseKind::Idiom => "Idioms",
            PhraseKind::Slang => "Slang",
            PhraseKind::Proverb => "Proverbs",
            PhraseKind::Flirt => "Flirting",
        }
    }
}

impl fmt::Display for PhraseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhraseKind {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PhraseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown phrase type '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunPhrase {
    #[serde(default)]
    pub id: i64,
    pub phrase: String,
    pub meaning: String,
    #[serde(rename = "type")]
    pub kind: PhraseKind,
    #[serde(default)]
    pub literal_translation: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FunPhrase {
    pub fn validated(&self) -> Result<FunPhrase> {
        let phrase = self.phrase.trim();
        let meaning = self.meaning.trim();
        if phrase.is_empty() || meaning.is_empty() {
            return Err(AppError::Validation(
                "Phrase, meaning, and type are required".to_string(),
            ));
        }
        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Ok(FunPhrase {
            id: self.id,
            phrase: phrase.to_string(),
            meaning: meaning.to_string(),
            kind: self.kind,
            literal_translation: optional(&self.literal_translation),
            example: optional(&self.example),
            notes: optional(&self.notes),
        })
    }

    fn matches(&self, term: &str) -> bool {
        self.phrase.to_lowercase().contains(term)
            || self.meaning.to_lowercase().contains(term)
            || self
                .example
                .as_deref()
                .is_some_and(|ex| ex.to_lowercase().contains(term))
    }
}

/// Case-insensitive search over phrase, meaning and example.
pub fn search_phrases<'a>(phrases: &'a [FunPhrase], term: &str) -> Vec<&'a FunPhrase> {
    let term = term.trim().to_lowercase();
    phrases
        .iter()
        .filter(|p| term.is_empty() || p.matches(&term))
        .collect()
}

pub fn group_by_kind<'a>(phrases: &[&'a FunPhrase]) -> Vec<(PhraseKind, Vec<&'a FunPhrase>)> {
    PhraseKind::ALL
        .into_iter()
        .map(|kind| {
            let group: Vec<&FunPhrase> = phrases.iter().copied().filter(|p| p.kind == kind).collect();
            (kind, group)
        })
        .filter(|(_, group)| !group.is_empty())
        .collect()
}
