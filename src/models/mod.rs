pub mod fun_phrase;
pub mod grammar;
pub mod review_session;
pub mod srs;
pub mod story;
pub mod user;
pub mod vocabulary;

pub use fun_phrase::{FunPhrase, PhraseKind};
pub use grammar::{GrammarExample, GrammarNote};
pub use review_session::ReviewSession;
pub use srs::{Outcome, ReviewUpdate};
pub use story::{CefrLevel, ComprehensionQuestion, HighlightedWord, Story, StoryDetail, StoryHighlight};
pub use user::{Session, User};
pub use vocabulary::{VocabularyDraft, VocabularyEntry};
