//! Vocabulary list with add/edit form, search and JSON import/export.

use super::{ScreenEnv, format_date, login_required};
use eframe::egui;
use french_study_app::export::json::{export_vocabulary_to_path, import_vocabulary};
use french_study_app::models::VocabularyDraft;

#[derive(Default)]
pub struct VocabularyScreen {
    form: VocabularyDraft,
    editing_id: Option<i64>,
    search: String,
    category_filter: Option<String>,
}

impl VocabularyScreen {
    pub fn show(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        if !env.logged_in() {
            login_required(ui, "manage your vocabulary");
            return;
        }

        self.render_form(ui, env);
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Export Vocabulary").clicked() {
                self.handle_export(env);
            }
            if ui.button("Import Vocabulary").clicked() {
                self.handle_import(env);
            }
        });
        ui.separator();

        self.render_list(ui, env);
    }

    fn render_form(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        ui.heading(if self.editing_id.is_some() {
            "Edit Vocabulary Entry"
        } else {
            "Add New Vocabulary"
        });

        egui::Grid::new("vocabulary_form")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("French:");
                ui.text_edit_singleline(&mut self.form.french);
                ui.end_row();
                ui.label("English:");
                ui.text_edit_singleline(&mut self.form.english);
                ui.end_row();
                ui.label("Example:");
                ui.text_edit_singleline(&mut self.form.example);
                ui.end_row();
                ui.label("Notes:");
                ui.text_edit_singleline(&mut self.form.notes);
                ui.end_row();
                ui.label("Category:");
                ui.text_edit_singleline(&mut self.form.category);
                ui.end_row();
            });

        let mut action_save = false;
        let mut action_cancel = false;
        ui.horizontal(|ui| {
            let label = if self.editing_id.is_some() { "Save Changes" } else { "Add Entry" };
            if ui.button(label).clicked() {
                action_save = true;
            }
            if self.editing_id.is_some() && ui.button("Cancel Editing").clicked() {
                action_cancel = true;
            }
        });

        if action_save {
            self.save(env);
        }
        if action_cancel {
            self.reset_form();
        }
    }

    fn save(&mut self, env: &mut ScreenEnv<'_>) {
        let Some(cache) = env.cache.as_deref_mut() else {
            return;
        };
        let result = match self.editing_id {
            Some(id) => cache.edit(id, &self.form, env.now, env.conn),
            None => cache.add(&self.form, env.now, env.conn),
        };
        match result {
            Ok(entry) => {
                env.status.info(format!("Saved '{}'", entry.french));
                self.reset_form();
            }
            Err(e) => env.status.error("Could not save entry", &e),
        }
    }

    fn reset_form(&mut self) {
        self.form = VocabularyDraft::default();
        self.editing_id = None;
    }

    fn render_list(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        let Some(cache) = env.cache.as_deref_mut() else {
            return;
        };

        ui.heading(format!(
            "Vocabulary List ({} entries, {} due)",
            cache.entries().len(),
            cache.due_count(env.now)
        ));

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
            egui::ComboBox::from_id_salt("vocabulary_category")
                .selected_text(self.category_filter.as_deref().unwrap_or("All categories"))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.category_filter, None, "All categories");
                    for category in cache.categories() {
                        let label = category.clone();
                        ui.selectable_value(&mut self.category_filter, Some(category), label);
                    }
                });
        });

        // We store actions to execute after UI rendering to avoid borrowing conflicts
        let mut action_edit: Option<i64> = None;
        let mut action_delete: Option<i64> = None;

        let entries = cache.search(&self.search, self.category_filter.as_deref());
        if entries.is_empty() {
            ui.label("No vocabulary entries yet.");
        }

        egui::ScrollArea::vertical()
            .id_salt("vocabulary_list")
            .show(ui, |ui| {
                egui::Grid::new("vocabulary_grid")
                    .num_columns(6)
                    .striped(true)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong("French");
                        ui.strong("English");
                        ui.strong("Example");
                        ui.strong("Level");
                        ui.strong("Next Review");
                        ui.label("");
                        ui.end_row();

                        for entry in &entries {
                            ui.label(&entry.french);
                            ui.label(&entry.english);
                            ui.label(entry.example.as_deref().unwrap_or(""));
                            ui.label(entry.srs_level.to_string());
                            ui.label(
                                entry
                                    .next_review
                                    .map(format_date)
                                    .unwrap_or_else(|| "Not scheduled".to_string()),
                            );
                            ui.horizontal(|ui| {
                                if ui.small_button("Edit").clicked() {
                                    action_edit = Some(entry.id);
                                }
                                if ui.small_button("Delete").clicked() {
                                    action_delete = Some(entry.id);
                                }
                            });
                            ui.end_row();
                        }
                    });
            });

        // Execute deferred actions
        if let Some(id) = action_edit {
            if let Some(entry) = cache.get(id) {
                self.form = VocabularyDraft::from_entry(entry);
                self.editing_id = Some(id);
            }
        }
        if let Some(id) = action_delete {
            match cache.delete(id, env.conn) {
                Ok(()) => {
                    if self.editing_id == Some(id) {
                        self.reset_form();
                    }
                    env.status.info("Entry deleted");
                }
                Err(e) => env.status.error("Could not delete entry", &e),
            }
        }
    }

    fn handle_export(&mut self, env: &mut ScreenEnv<'_>) {
        let Some(cache) = env.cache.as_deref() else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("vocabulary.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            match export_vocabulary_to_path(cache.entries(), &path) {
                Ok(()) => env
                    .status
                    .info(format!("Exported {} entries", cache.entries().len())),
                Err(e) => env.status.error("Export failed", &e),
            }
        }
    }

    fn handle_import(&mut self, env: &mut ScreenEnv<'_>) {
        let Some(cache) = env.cache.as_deref_mut() else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            let result = import_vocabulary(cache.user_id(), &path, env.now, env.conn)
                .and_then(|count| cache.refresh(env.conn).map(|()| count));
            match result {
                Ok(count) => env.status.info(format!("Imported {} entries", count)),
                Err(e) => env.status.error(
                    "Import failed (expected a file like {\"entries\": [...]})",
                    &e,
                ),
            }
        }
    }
}
