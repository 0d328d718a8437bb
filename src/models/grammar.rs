//! Grammar notes shared by every user.
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const HIDDEN_MASK: &str = "____";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarExample {
    pub french: String,
    pub english: String,
    #[serde(default)]
    pub hidden_parts: Vec<String>,
}

impl GrammarExample {
    /// French sentence with every hidden part replaced by a blank. Only whole
    /// words are masked, so "le" leaves "lentement" alone.
    pub fn masked_french(&self) -> String {
        self.hidden_parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .fold(self.french.clone(), |text, part| mask_whole_words(&text, part))
    }
}

fn mask_whole_words(text: &str, part: &str) -> String {
    let is_word_char = |c: char| c.is_alphanumeric();
    let mut masked = String::with_capacity(text.len());
    let mut last = 0;
    for (start, found) in text.match_indices(part) {
        let end = start + found.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            continue;
        }
        masked.push_str(&text[last..start]);
        masked.push_str(HIDDEN_MASK);
        last = end;
    }
    masked.push_str(&text[last..]);
    masked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarNote {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub explanation: String,
    pub category: String,
    #[serde(default)]
    pub examples: Vec<GrammarExample>,
}

impl GrammarNote {
    /// Trims text fields, drops blank examples and checks required fields.
    pub fn validated(&self) -> Result<GrammarNote> {
        let title = self.title.trim();
        let explanation = self.explanation.trim();
        let category = self.category.trim();
        if title.is_empty() || explanation.is_empty() || category.is_empty() {
            return Err(AppError::Validation(
                "Title, explanation, and category are required".to_string(),
            ));
        }

        let examples = self
            .examples
            .iter()
            .filter(|ex| !ex.french.trim().is_empty() && !ex.english.trim().is_empty())
            .map(|ex| GrammarExample {
                french: ex.french.trim().to_string(),
                english: ex.english.trim().to_string(),
                hidden_parts: ex
                    .hidden_parts
                    .iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
            })
            .collect();

        Ok(GrammarNote {
            id: self.id,
            title: title.to_string(),
            explanation: explanation.to_string(),
            category: category.to_string(),
            examples,
        })
    }
}
