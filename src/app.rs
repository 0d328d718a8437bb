//! Main application UI and state management.
//! Handles navigation, the account panel and the close confirmation dialog.

use crate::ui::flashcards::FlashcardsScreen;
use crate::ui::fun_phrases::FunPhrasesScreen;
use crate::ui::grammar::GrammarScreen;
use crate::ui::stories::StoriesScreen;
use crate::ui::vocabulary::VocabularyScreen;
use crate::ui::{ScreenEnv, StatusLine};
use chrono::Utc;
use eframe::egui;
use french_study_app::config::AppConfig;
use french_study_app::database::db;
use french_study_app::models::Session;
use french_study_app::{AppError, VocabularyCache, auth};
use rusqlite::Connection;

/// Key under which the last session token is remembered.
const SESSION_TOKEN_KEY: &str = "session_token";

/// Application screen states
#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum AppScreen {
    #[default]
    Vocabulary,
    Flashcards,
    Grammar,
    Stories,
    FunPhrases,
    Account,
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Default)]
struct AuthForm {
    mode: AuthMode,
    name: String,
    email: String,
    password: String,
}

/// Main application state
pub struct FrenchStudyApp {
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    conn: Connection,
    config: AppConfig,

    session: Option<Session>,
    cache: Option<VocabularyCache>,

    current_screen: AppScreen,
    auth_form: AuthForm,
    status: StatusLine,

    vocabulary: VocabularyScreen,
    flashcards: FlashcardsScreen,
    grammar: GrammarScreen,
    stories: StoriesScreen,
    fun_phrases: FunPhrasesScreen,
}

impl eframe::App for FrenchStudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.end_expired_session();
        self.render_nav_bar(ctx);
        self.render_current_screen(ctx);

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }
    }
}

impl FrenchStudyApp {
    /// Creates the application, restoring the remembered session if it is
    /// still valid.
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        let mut app = Self {
            show_confirmation_dialog: false,
            allowed_to_close: false,
            conn,
            config,
            session: None,
            cache: None,
            current_screen: AppScreen::default(),
            auth_form: AuthForm::default(),
            status: StatusLine::default(),
            vocabulary: VocabularyScreen::default(),
            flashcards: FlashcardsScreen::default(),
            grammar: GrammarScreen::default(),
            stories: StoriesScreen::default(),
            fun_phrases: FunPhrasesScreen::default(),
        };
        app.restore_session();
        if app.session.is_none() {
            app.current_screen = AppScreen::Account;
        }
        app
    }

    fn restore_session(&mut self) {
        let token = match db::get_state(SESSION_TOKEN_KEY, &self.conn) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Could not read remembered session: {}", e);
                return;
            }
        };
        let Some(token) = token else {
            return;
        };
        match auth::require_session(Some(&token), Utc::now(), &self.conn) {
            Ok(session) => {
                log::info!("Restored session for {}", session.user.email);
                self.start_session(session);
            }
            Err(AppError::Unauthorized) => {
                log::info!("Remembered session is no longer valid");
                if let Err(e) = db::delete_state(SESSION_TOKEN_KEY, &self.conn) {
                    log::warn!("Could not forget session token: {}", e);
                }
            }
            Err(e) => log::warn!("Could not restore session: {}", e),
        }
    }

    fn start_session(&mut self, session: Session) {
        let mut cache = VocabularyCache::new(session.user.id);
        if let Err(e) = cache.refresh(&self.conn) {
            self.status.error("Failed to load vocabulary", &e);
        }
        self.cache = Some(cache);
        self.session = Some(session);
        self.flashcards.reset();
    }

    /// Logs out once the open session passes its expiry time.
    fn end_expired_session(&mut self) {
        if !self.session.as_ref().is_some_and(|s| s.is_expired(Utc::now())) {
            return;
        }
        self.handle_logout();
        self.status.info("Your session has expired. Please log in again.");
    }

    fn render_nav_bar(&mut self, ctx: &egui::Context) {
        let mut action_logout = false;
        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("French Study");
                ui.separator();
                let before = self.current_screen;
                ui.selectable_value(&mut self.current_screen, AppScreen::Vocabulary, "Vocabulary");
                ui.selectable_value(&mut self.current_screen, AppScreen::Flashcards, "Flashcards");
                ui.selectable_value(&mut self.current_screen, AppScreen::Grammar, "Grammar");
                ui.selectable_value(&mut self.current_screen, AppScreen::Stories, "Stories");
                ui.selectable_value(&mut self.current_screen, AppScreen::FunPhrases, "Fun French");
                if before != self.current_screen && self.current_screen == AppScreen::Flashcards {
                    // new pass over whatever is due now
                    self.flashcards.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &self.session {
                        Some(session) => {
                            if ui.button("Logout").clicked() {
                                action_logout = true;
                            }
                            ui.label(&session.user.name);
                        }
                        None => {
                            if ui.button("Login").clicked() {
                                self.current_screen = AppScreen::Account;
                            }
                        }
                    }
                });
            });
        });

        if action_logout {
            self.handle_logout();
        }
    }

    fn render_current_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.status.show(ui);

            if self.current_screen == AppScreen::Account {
                self.render_account(ui);
                return;
            }

            let mut env = ScreenEnv {
                conn: &self.conn,
                session: self.session.as_ref(),
                cache: self.cache.as_mut(),
                status: &mut self.status,
                now: Utc::now(),
            };
            match self.current_screen {
                AppScreen::Vocabulary => self.vocabulary.show(ui, &mut env),
                AppScreen::Flashcards => self.flashcards.show(ui, &mut env),
                AppScreen::Grammar => self.grammar.show(ui, &mut env),
                AppScreen::Stories => self.stories.show(ui, &mut env),
                AppScreen::FunPhrases => self.fun_phrases.show(ui, &mut env),
                AppScreen::Account => {}
            }
        });
    }

    fn render_account(&mut self, ui: &mut egui::Ui) {
        if let Some(session) = &self.session {
            ui.heading("Account");
            ui.label(format!("Logged in as {} ({})", session.user.name, session.user.email));
            ui.add_space(10.0);
            if ui.button("Log out").clicked() {
                self.handle_logout();
            }
            return;
        }

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.auth_form.mode, AuthMode::Login, "Login");
            ui.selectable_value(&mut self.auth_form.mode, AuthMode::Register, "Register");
        });
        ui.separator();

        let mut action_submit = false;
        egui::Grid::new("auth_form").num_columns(2).show(ui, |ui| {
            if self.auth_form.mode == AuthMode::Register {
                ui.label("Name:");
                ui.text_edit_singleline(&mut self.auth_form.name);
                ui.end_row();
            }
            ui.label("Email:");
            ui.text_edit_singleline(&mut self.auth_form.email);
            ui.end_row();
            ui.label("Password:");
            let response = ui.add(egui::TextEdit::singleline(&mut self.auth_form.password).password(true));
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                action_submit = true;
            }
            ui.end_row();
        });

        ui.add_space(10.0);
        let label = match self.auth_form.mode {
            AuthMode::Login => "Login",
            AuthMode::Register => "Create Account",
        };
        if ui.button(label).clicked() {
            action_submit = true;
        }
        ui.add_space(10.0);
        ui.label("Grammar, stories and fun phrases can be browsed without an account.");

        if action_submit {
            self.handle_auth_submit();
        }
    }

    fn handle_auth_submit(&mut self) {
        let now = Utc::now();
        let form = &self.auth_form;
        let result = match form.mode {
            AuthMode::Login => auth::login(&form.email, &form.password, self.config.session_days, now, &self.conn),
            AuthMode::Register => auth::register(&form.name, &form.email, &form.password, now, &self.conn)
                .and_then(|_| auth::login(&form.email, &form.password, self.config.session_days, now, &self.conn)),
        };

        match result {
            Ok(session) => {
                if let Err(e) = db::set_state(SESSION_TOKEN_KEY, &session.token, &self.conn) {
                    log::warn!("Could not remember session token: {}", e);
                }
                self.status.info(format!("Welcome, {}!", session.user.name));
                self.auth_form = AuthForm::default();
                self.start_session(session);
                self.current_screen = AppScreen::Vocabulary;
            }
            Err(e) => {
                self.auth_form.password.clear();
                let context = match self.auth_form.mode {
                    AuthMode::Login => "Login failed",
                    AuthMode::Register => "Registration failed",
                };
                self.status.error(context, &e);
            }
        }
    }

    fn handle_logout(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = auth::logout(&session, &self.conn) {
                log::warn!("Could not delete session: {}", e);
            }
        }
        if let Err(e) = db::delete_state(SESSION_TOKEN_KEY, &self.conn) {
            log::warn!("Could not forget session token: {}", e);
        }
        self.cache = None;
        self.flashcards.reset();
        self.vocabulary = VocabularyScreen::default();
        self.current_screen = AppScreen::Account;
        self.status.info("Logged out");
    }
}
