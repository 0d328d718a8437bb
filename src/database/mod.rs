pub mod db;
pub mod fun_phrases;
pub mod grammar;
pub mod stories;
pub mod users;
pub mod vocabulary;
