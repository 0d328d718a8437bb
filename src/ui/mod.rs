//! Screens of the application. Each screen owns its form state and is drawn
//! with a [`ScreenEnv`] giving it the connection, the session and the
//! status line.

pub mod flashcards;
pub mod fun_phrases;
pub mod grammar;
pub mod stories;
pub mod vocabulary;

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use french_study_app::models::Session;
use french_study_app::{AppError, VocabularyCache};
use rusqlite::Connection;

pub struct ScreenEnv<'a> {
    pub conn: &'a Connection,
    pub session: Option<&'a Session>,
    pub cache: Option<&'a mut VocabularyCache>,
    pub status: &'a mut StatusLine,
    pub now: DateTime<Utc>,
}

impl ScreenEnv<'_> {
    /// True while the session exists and has not expired at `now`.
    pub fn logged_in(&self) -> bool {
        self.session.is_some_and(|session| !session.is_expired(self.now))
    }
}

enum StatusMessage {
    Info(String),
    Error(String),
}

/// One-line banner under the navigation bar.
#[derive(Default)]
pub struct StatusLine {
    message: Option<StatusMessage>,
}

impl StatusLine {
    pub fn info(&mut self, message: impl Into<String>) {
        self.message = Some(StatusMessage::Info(message.into()));
    }

    pub fn error(&mut self, context: &str, error: &AppError) {
        log::warn!("{}: {}", context, error);
        self.message = Some(StatusMessage::Error(format!("{}: {}", context, error)));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let mut dismiss = false;
        if let Some(message) = &self.message {
            ui.horizontal(|ui| {
                match message {
                    StatusMessage::Info(text) => {
                        ui.colored_label(egui::Color32::from_rgb(40, 120, 60), text);
                    }
                    StatusMessage::Error(text) => {
                        ui.colored_label(egui::Color32::from_rgb(190, 40, 40), text);
                    }
                }
                if ui.small_button("x").clicked() {
                    dismiss = true;
                }
            });
            ui.separator();
        }
        if dismiss {
            self.clear();
        }
    }
}

/// Formats a timestamp as a local YYYY-MM-DD string
pub fn format_date(time: DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d").to_string()
}

pub fn login_required(ui: &mut egui::Ui, what: &str) {
    ui.add_space(20.0);
    ui.vertical_centered(|ui| {
        ui.heading("Please log in");
        ui.label(format!("You need an account to {}.", what));
    });
}
