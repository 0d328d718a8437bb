pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use cache::VocabularyCache;
pub use error::{AppError, Result};
pub use models::{FunPhrase, GrammarNote, Outcome, ReviewSession, Story, VocabularyEntry};
