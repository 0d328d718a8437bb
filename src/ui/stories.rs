//! Graded reading: story list by level and a story reader with questions.

use super::ScreenEnv;
use eframe::egui;
use french_study_app::database::stories::{get_story, list_stories};
use french_study_app::models::story::{group_by_level, search_stories};
use french_study_app::models::{CefrLevel, Story, StoryDetail};

struct StoryReader {
    detail: StoryDetail,
    show_translation: bool,
    answers: Vec<Option<usize>>,
    checked: Vec<bool>,
}

impl StoryReader {
    fn new(detail: StoryDetail) -> Self {
        let count = detail.story.comprehension_questions.len();
        Self {
            detail,
            show_translation: false,
            answers: vec![None; count],
            checked: vec![false; count],
        }
    }
}

#[derive(Default)]
pub struct StoriesScreen {
    stories: Option<Vec<Story>>,
    level_filter: Option<CefrLevel>,
    loaded_filter: Option<CefrLevel>,
    search: String,
    reader: Option<StoryReader>,
}

impl StoriesScreen {
    fn reload(&mut self, env: &mut ScreenEnv<'_>) {
        self.loaded_filter = self.level_filter;
        match list_stories(self.level_filter, env.conn) {
            Ok(stories) => self.stories = Some(stories),
            Err(e) => {
                self.stories = Some(Vec::new());
                env.status.error("Failed to load stories", &e);
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, env: &mut ScreenEnv<'_>) {
        if let Some(reader) = self.reader.as_mut() {
            if render_reader(ui, reader) {
                self.reader = None;
            }
            return;
        }

        if self.stories.is_none() || self.loaded_filter != self.level_filter {
            self.reload(env);
        }

        ui.heading("Stories");
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
            egui::ComboBox::from_id_salt("story_level")
                .selected_text(self.level_filter.map_or("All levels", CefrLevel::as_str))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.level_filter, None, "All levels");
                    for level in CefrLevel::ALL {
                        ui.selectable_value(&mut self.level_filter, Some(level), level.as_str());
                    }
                });
        });
        ui.separator();

        let mut action_open: Option<i64> = None;
        let stories = self.stories.as_deref().unwrap_or_default();
        let matching = search_stories(stories, &self.search);
        if matching.is_empty() {
            ui.label("No stories found.");
        }

        egui::ScrollArea::vertical()
            .id_salt("story_list")
            .show(ui, |ui| {
                for (level, group) in group_by_level(&matching) {
                    ui.add_space(6.0);
                    ui.heading(format!("Level {}", level));
                    for story in group {
                        ui.horizontal(|ui| {
                            if ui.link(&story.title).clicked() {
                                action_open = Some(story.id);
                            }
                            ui.weak(format!("{} questions", story.comprehension_questions.len()));
                        });
                    }
                }
            });

        if let Some(id) = action_open {
            let viewer = env.session.map(|session| session.user.id);
            match get_story(id, viewer, env.conn) {
                Ok(detail) => self.reader = Some(StoryReader::new(detail)),
                Err(e) => env.status.error("Could not open story", &e),
            }
        }
    }
}

/// Draws one story. Returns true when the user asked to go back.
fn render_reader(ui: &mut egui::Ui, reader: &mut StoryReader) -> bool {
    let mut back = false;
    ui.horizontal(|ui| {
        if ui.button("Back to Stories").clicked() {
            back = true;
        }
        ui.heading(&reader.detail.story.title);
        ui.label(format!("({})", reader.detail.story.level));
    });
    ui.separator();

    let story = &reader.detail.story;
    egui::ScrollArea::vertical()
        .id_salt("story_reader")
        .show(ui, |ui| {
            for paragraph in story.paragraphs() {
                ui.label(paragraph);
                ui.add_space(4.0);
            }

            if story.translation.is_some() {
                let label = if reader.show_translation { "Hide Translation" } else { "Show Translation" };
                if ui.button(label).clicked() {
                    reader.show_translation = !reader.show_translation;
                }
                if reader.show_translation {
                    for paragraph in story.translation_paragraphs() {
                        ui.label(egui::RichText::new(paragraph).italics());
                        ui.add_space(4.0);
                    }
                }
            }

            if !reader.detail.highlights.is_empty() {
                ui.separator();
                ui.strong("Vocabulary");
                egui::Grid::new("story_vocabulary").striped(true).show(ui, |ui| {
                    for word in &reader.detail.highlights {
                        ui.label(&word.french);
                        ui.label(&word.english);
                        match word.srs_level {
                            Some(level) => ui.weak(format!("in your list, level {}", level)),
                            None => ui.weak(""),
                        };
                        ui.end_row();
                    }
                });
            }

            if !story.comprehension_questions.is_empty() {
                ui.separator();
                ui.strong("Comprehension");
            }
            for (i, question) in story.comprehension_questions.iter().enumerate() {
                ui.group(|ui| {
                    ui.label(format!("{}. {}", i + 1, question.question));
                    for (option_index, option) in question.options.iter().enumerate() {
                        if ui
                            .radio_value(&mut reader.answers[i], Some(option_index), option)
                            .changed()
                        {
                            reader.checked[i] = false;
                        }
                    }
                    ui.horizontal(|ui| {
                        if ui.small_button("Check Answer").clicked() && reader.answers[i].is_some() {
                            reader.checked[i] = true;
                        }
                        if reader.checked[i] {
                            match reader.answers[i] {
                                Some(answer) if question.is_correct(answer) => {
                                    ui.colored_label(egui::Color32::from_rgb(40, 120, 60), "Correct!");
                                }
                                _ => {
                                    let right = question
                                        .options
                                        .get(question.correct_answer_index)
                                        .map(String::as_str)
                                        .unwrap_or("?");
                                    ui.colored_label(
                                        egui::Color32::from_rgb(190, 40, 40),
                                        format!("Not quite. The answer is: {}", right),
                                    );
                                }
                            }
                        }
                    });
                });
            }
        });
    back
}
