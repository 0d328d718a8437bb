//! Idioms, slang, proverbs and flirting lines.

use super::ScreenEnv;
use eframe::egui;
use french_study_app::database::fun_phrases::{add_fun_phrase, list_fun_phrases};
use french_study_app::models::fun_phrase::{group_by_kind, search_phrases};
use french_study_app::models::{FunPhrase, PhraseKind};

struct PhraseForm {
    phrase: String,
    meaning: String,
    kind: PhraseKind,
    literal_translation: String,
    example: String,
    notes: String,
}

impl Default for PhraseForm {
    fn default() -> Self {
        Self {
            phrase: String::new(),
            meaning: String::new(),
            kind: PhraseKind::Idiom,
            literal_translation: String::new(),
            example: String::new(),
            notes: String::new(),
        }
    }
}

impl PhraseForm {
    fn to_phrase(&self) -> FunPhrase {
        FunPhrase {
            id: 0,
            phrase: self.phrase.clone(),
            meaning: self.meaning.clone(),
            kind: self.kind,
            literal_translation: Some(self.literal_translation.clone()),
            example: Some(self.example.clone()),
            notes: Some(self.notes.clone()),
        }
    }
}

#[derive(Default)]
pub struct FunPhrasesScreen {
    phrases: Option<Vec<FunPhrase>>,
    kind_filter: Option<PhraseKind>,
    loaded_filter: Option<PhraseKind>,
    search: String,
    form: Option<PhraseForm>,
}

impl FunPhrasesScreen {
    fn reload(&mut self, env: &mut ScreenEnv<'_>) {
        self.loaded_filter = self.kind_filter;
        match list_fun_phrases(self.kind_filter, env.conn) {
            Ok(phrases) => self.phrases = Some(phrases),
            Err(e) => {
                self.phrases = Some(Vec::new());
                env.status.error("Failed to load phrases", &e);
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        if self.phrases.is_none() || self.loaded_filter != self.kind_filter {
            self.reload(env);
        }

        ui.horizontal(|ui| {
            ui.heading("Fun French");
            if env.logged_in() && self.form.is_none() && ui.button("New Phrase").clicked() {
                self.form = Some(PhraseForm::default());
            }
        });

        if self.form.is_some() {
            ui.separator();
            self.render_form(ui, env);
        }
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
            egui::ComboBox::from_id_salt("phrase_kind")
                .selected_text(self.kind_filter.map_or("All types", PhraseKind::title))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.kind_filter, None, "All types");
                    for kind in PhraseKind::ALL {
                        ui.selectable_value(&mut self.kind_filter, Some(kind), kind.title());
                    }
                });
        });

        let phrases = self.phrases.as_deref().unwrap_or_default();
        let matching = search_phrases(phrases, &self.search);
        if matching.is_empty() {
            ui.label("No phrases found.");
        }

        egui::ScrollArea::vertical()
            .id_salt("phrase_list")
            .show(ui, |ui| {
                for (kind, group) in group_by_kind(&matching) {
                    ui.add_space(6.0);
                    ui.heading(kind.title());
                    for phrase in group {
                        egui::CollapsingHeader::new(egui::RichText::new(&phrase.phrase).strong())
                            .id_salt(("fun_phrase", phrase.id))
                            .show(ui, |ui| {
                                ui.label(&phrase.meaning);
                                if let Some(literal) = &phrase.literal_translation {
                                    ui.label(format!("Literally: {}", literal));
                                }
                                if let Some(example) = &phrase.example {
                                    ui.label(egui::RichText::new(example).italics());
                                }
                                if let Some(notes) = &phrase.notes {
                                    ui.weak(notes);
                                }
                            });
                    }
                }
            });
    }

    fn render_form(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        egui::Grid::new("phrase_form").num_columns(2).show(ui, |ui| {
            ui.label("Phrase:");
            ui.text_edit_singleline(&mut form.phrase);
            ui.end_row();
            ui.label("Meaning:");
            ui.text_edit_singleline(&mut form.meaning);
            ui.end_row();
            ui.label("Type:");
            egui::ComboBox::from_id_salt("phrase_form_kind")
                .selected_text(form.kind.title())
                .show_ui(ui, |ui| {
                    for kind in PhraseKind::ALL {
                        ui.selectable_value(&mut form.kind, kind, kind.title());
                    }
                });
            ui.end_row();
            ui.label("Literal translation:");
            ui.text_edit_singleline(&mut form.literal_translation);
            ui.end_row();
            ui.label("Example:");
            ui.text_edit_singleline(&mut form.example);
            ui.end_row();
            ui.label("Notes:");
            ui.text_edit_singleline(&mut form.notes);
            ui.end_row();
        });

        let mut action_save = false;
        let mut action_cancel = false;
        ui.horizontal(|ui| {
            if ui.button("Save Phrase").clicked() {
                action_save = true;
            }
            if ui.button("Cancel").clicked() {
                action_cancel = true;
            }
        });

        if action_save {
            match add_fun_phrase(&form.to_phrase(), env.now, env.conn) {
                Ok(saved) => {
                    env.status.info(format!("Added '{}'", saved.phrase));
                    self.form = None;
                    self.reload(env);
                }
                Err(e) => env.status.error("Could not save phrase", &e),
            }
        } else if action_cancel {
            self.form = None;
        }
    }
}
