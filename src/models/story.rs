//! Graded reading stories with comprehension questions.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// CEFR reading level, ordered from beginner to mastery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        CefrLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown story level '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensionQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl ComprehensionQuestion {
    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_answer_index
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub level: CefrLevel,
    pub content: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub vocabulary_highlights: Vec<StoryHighlight>,
    #[serde(default)]
    pub comprehension_questions: Vec<ComprehensionQuestion>,
}

impl Story {
    pub fn paragraphs(&self) -> Vec<&str> {
        split_paragraphs(&self.content)
    }

    pub fn translation_paragraphs(&self) -> Vec<&str> {
        self.translation
            .as_deref()
            .map(split_paragraphs)
            .unwrap_or_default()
    }
}

/// A word the story teaches, stored with the story itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryHighlight {
    pub french: String,
    pub english: String,
}

/// A highlight as seen by one reader. `srs_level` is the reader's own level
/// for the word, `None` when the word is not in their vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedWord {
    pub french: String,
    pub english: String,
    pub srs_level: Option<u8>,
}

/// A story with its highlights resolved for the current reader.
#[derive(Debug, Clone)]
pub struct StoryDetail {
    pub story: Story,
    pub highlights: Vec<HighlightedWord>,
}

fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split('\n').filter(|p| !p.trim().is_empty()).collect()
}

/// Case-insensitive title search.
pub fn search_stories<'a>(stories: &'a [Story], term: &str) -> Vec<&'a Story> {
    let term = term.trim().to_lowercase();
    stories
        .iter()
        .filter(|story| term.is_empty() || story.title.to_lowercase().contains(&term))
        .collect()
}

/// Groups stories by level, levels in CEFR order, stories in input order.
pub fn group_by_level<'a>(stories: &[&'a Story]) -> Vec<(CefrLevel, Vec<&'a Story>)> {
    CefrLevel::ALL
        .into_iter()
        .map(|level| {
            let group: Vec<&Story> = stories.iter().copied().filter(|s| s.level == level).collect();
            (level, group)
        })
        .filter(|(_, group)| !group.is_empty())
        .collect()
}
