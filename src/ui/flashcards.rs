//! Flashcard review screen.

use super::{ScreenEnv, login_required};
use eframe::egui;
use french_study_app::models::srs::format_interval;
use french_study_app::{Outcome, ReviewSession};

#[derive(Default)]
pub struct FlashcardsScreen {
    session: Option<ReviewSession>,
}

impl FlashcardsScreen {
    /// Drops the current pass, e.g. after logging out.
    pub fn reset(&mut self) {
        self.session = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        if !env.logged_in() {
            login_required(ui, "review flashcards");
            return;
        }
        let Some(cache) = env.cache.as_deref_mut() else {
            return;
        };
        let session = self
            .session
            .get_or_insert_with(|| ReviewSession::from_cache(cache, env.now));

        ui.heading("Flashcard Review");
        ui.add_space(10.0);

        if !session.has_cards() || session.is_completed() {
            ui.vertical_centered(|ui| {
                if session.has_cards() {
                    ui.heading("Review complete!");
                    ui.label(format!("Congratulations! {}", session.progress_message()));
                } else {
                    ui.heading("No cards due for review!");
                    ui.label("Add some vocabulary or wait for cards to become due for review.");
                }
                ui.add_space(20.0);
                if ui.button("Start Another Review").clicked() {
                    session.restart(cache, env.now);
                }
            });
            return;
        }

        let Some(card) = session.current_card() else {
            return;
        };
        // Clone values to avoid borrowing issues
        let french = card.french.clone();
        let english = card.english.clone();
        let example = card.example.clone();
        let level = card.srs_level;
        let show_answer = session.show_answer;
        let previews = session.current_previews().unwrap_or_default();

        ui.horizontal(|ui| {
            ui.label(session.progress_message());
            ui.label(format!("Level: {}", level));
        });

        ui.group(|ui| {
            ui.set_min_height(200.0);
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label(egui::RichText::new(&french).size(28.0).strong());
                ui.add_space(20.0);

                if show_answer {
                    ui.label(egui::RichText::new(&english).size(20.0));
                    if let Some(example) = &example {
                        ui.label(egui::RichText::new(example).italics());
                    }
                } else {
                    ui.label("(Click 'Show Answer' to reveal)");
                }
                ui.add_space(20.0);
            });
        });

        ui.add_space(20.0);

        // Store actions to execute after UI rendering
        let mut action_reveal = false;
        let mut action_grade: Option<Outcome> = None;

        if !show_answer {
            if ui.button("Show Answer").clicked() {
                action_reveal = true;
            }
        } else {
            ui.label("How well did you know it?");
            ui.horizontal(|ui| {
                for (outcome, days) in Outcome::ALL.into_iter().zip(previews) {
                    let label = format!("{} ({})", outcome.label(), format_interval(days));
                    if ui.button(label).clicked() {
                        action_grade = Some(outcome);
                    }
                }
            });
        }

        // Execute deferred actions
        if action_reveal {
            session.reveal();
        }
        if let Some(outcome) = action_grade {
            if let Err(e) = session.grade_current_card(outcome, cache, env.now, env.conn) {
                env.status.error("Could not save review", &e);
            }
        }
    }
}
