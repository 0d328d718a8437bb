//! Grammar notes grouped by category, with a form for logged-in users.

use super::ScreenEnv;
use eframe::egui;
use french_study_app::database::grammar as store;
use french_study_app::models::{GrammarExample, GrammarNote};
use std::collections::HashSet;

/// Editable copy of a note; hidden parts are typed comma separated.
#[derive(Default)]
struct NoteForm {
    id: Option<i64>,
    title: String,
    explanation: String,
    category: String,
    examples: Vec<(String, String, String)>,
}

impl NoteForm {
    fn from_note(note: &GrammarNote) -> Self {
        Self {
            id: Some(note.id),
            title: note.title.clone(),
            explanation: note.explanation.clone(),
            category: note.category.clone(),
            examples: note
                .examples
                .iter()
                .map(|ex| (ex.french.clone(), ex.english.clone(), ex.hidden_parts.join(", ")))
                .collect(),
        }
    }

    fn to_note(&self) -> GrammarNote {
        GrammarNote {
            id: self.id.unwrap_or_default(),
            title: self.title.clone(),
            explanation: self.explanation.clone(),
            category: self.category.clone(),
            examples: self
                .examples
                .iter()
                .map(|(french, english, hidden)| GrammarExample {
                    french: french.clone(),
                    english: english.clone(),
                    hidden_parts: hidden.split(',').map(|p| p.trim().to_string()).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Default)]
pub struct GrammarScreen {
    notes: Option<Vec<GrammarNote>>,
    revealed: HashSet<i64>,
    form: Option<NoteForm>,
}

impl GrammarScreen {
    fn reload(&mut self, env: &mut ScreenEnv<'_>) {
        match store::list_grammar_notes(env.conn) {
            Ok(notes) => self.notes = Some(notes),
            Err(e) => {
                self.notes = Some(Vec::new());
                env.status.error("Failed to load grammar notes", &e);
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        if self.notes.is_none() {
            self.reload(env);
        }

        ui.horizontal(|ui| {
            ui.heading("Grammar Notes");
            if env.logged_in() && self.form.is_none() && ui.button("New Note").clicked() {
                self.form = Some(NoteForm::default());
            }
        });
        ui.separator();

        if self.form.is_some() {
            self.render_form(ui, env);
            ui.separator();
        }

        let mut action_edit: Option<GrammarNote> = None;
        let mut action_delete: Option<i64> = None;
        let mut action_toggle: Option<i64> = None;

        let notes = self.notes.as_deref().unwrap_or_default();
        if notes.is_empty() {
            ui.label("No grammar notes yet.");
        }

        egui::ScrollArea::vertical()
            .id_salt("grammar_list")
            .show(ui, |ui| {
                let mut current_category: Option<&str> = None;
                for note in notes {
                    if current_category != Some(note.category.as_str()) {
                        ui.add_space(8.0);
                        ui.heading(&note.category);
                        current_category = Some(note.category.as_str());
                    }
                    egui::CollapsingHeader::new(&note.title)
                        .id_salt(("grammar_note", note.id))
                        .show(ui, |ui| {
                            ui.label(&note.explanation);
                            let revealed = self.revealed.contains(&note.id);
                            for example in &note.examples {
                                ui.group(|ui| {
                                    if revealed {
                                        ui.strong(&example.french);
                                    } else {
                                        ui.strong(example.masked_french());
                                    }
                                    ui.label(&example.english);
                                });
                            }
                            ui.horizontal(|ui| {
                                if note.examples.iter().any(|ex| !ex.hidden_parts.is_empty()) {
                                    let label = if revealed { "Hide answers" } else { "Reveal answers" };
                                    if ui.small_button(label).clicked() {
                                        action_toggle = Some(note.id);
                                    }
                                }
                                if env.logged_in() {
                                    if ui.small_button("Edit").clicked() {
                                        action_edit = Some(note.clone());
                                    }
                                    if ui.small_button("Delete").clicked() {
                                        action_delete = Some(note.id);
                                    }
                                }
                            });
                        });
                }
            });

        if let Some(id) = action_toggle {
            if !self.revealed.remove(&id) {
                self.revealed.insert(id);
            }
        }
        if let Some(note) = action_edit {
            self.form = Some(NoteForm::from_note(&note));
        }
        if let Some(id) = action_delete {
            match store::delete_grammar_note(id, env.conn) {
                Ok(()) => {
                    env.status.info("Grammar note deleted");
                    self.reload(env);
                }
                Err(e) => env.status.error("Could not delete grammar note", &e),
            }
        }
    }

    fn render_form(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        ui.heading(if form.id.is_some() { "Edit Grammar Note" } else { "New Grammar Note" });

        egui::Grid::new("grammar_form").num_columns(2).show(ui, |ui| {
            ui.label("Title:");
            ui.text_edit_singleline(&mut form.title);
            ui.end_row();
            ui.label("Category:");
            ui.text_edit_singleline(&mut form.category);
            ui.end_row();
            ui.label("Explanation:");
            ui.text_edit_multiline(&mut form.explanation);
            ui.end_row();
        });

        ui.label("Examples:");
        let mut remove: Option<usize> = None;
        for (i, (french, english, hidden)) in form.examples.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.label("FR");
                ui.text_edit_singleline(french);
                ui.label("EN");
                ui.text_edit_singleline(english);
                ui.label("Hidden");
                ui.text_edit_singleline(hidden);
                if ui.small_button("Remove").clicked() {
                    remove = Some(i);
                }
            });
        }
        if let Some(i) = remove {
            form.examples.remove(i);
        }

        let mut action_save = false;
        let mut action_cancel = false;
        ui.horizontal(|ui| {
            if ui.button("Add Example").clicked() {
                form.examples.push(Default::default());
            }
            if ui.button("Save Note").clicked() {
                action_save = true;
            }
            if ui.button("Cancel").clicked() {
                action_cancel = true;
            }
        });

        if action_save {
            let note = form.to_note();
            let result = match form.id {
                Some(_) => store::update_grammar_note(&note, env.now, env.conn),
                None => store::add_grammar_note(&note, env.now, env.conn),
            };
            match result {
                Ok(saved) => {
                    env.status.info(format!("Saved '{}'", saved.title));
                    self.form = None;
                    self.reload(env);
                }
                Err(e) => env.status.error("Could not save grammar note", &e),
            }
        } else if action_cancel {
            self.form = None;
        }
    }
}
