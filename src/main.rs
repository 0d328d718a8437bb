mod app;
mod ui;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use french_study_app::config::AppConfig;
use french_study_app::database::{db, users};
use french_study_app::export::json::{load_seed_dir, seed_database};
use std::path::PathBuf;

use app::FrenchStudyApp;

#[derive(Parser)]
#[command(name = "french-study", version, about = "Personal French study app")]
struct Cli {
    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the database path from the config
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load vocabulary.json, grammar.json, stories.json and funstuff.json
    Seed {
        dir: PathBuf,
        /// Account that receives the seeded vocabulary
        #[arg(long)]
        email: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    let conn = db::init_database(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;
    log::info!("Using database {}", config.database_path.display());

    if let Some(Command::Seed { dir, email }) = cli.command {
        let Some(record) = users::find_user_by_email(&email, &conn)? else {
            bail!("no account registered for {}", email);
        };
        let data = load_seed_dir(&dir);
        let report = seed_database(&data, record.user.id, chrono::Utc::now(), &conn)?;
        println!(
            "Seeded {} vocabulary entries, {} grammar notes, {} stories ({} highlights), {} phrases",
            report.vocabulary, report.grammar, report.stories, report.linked_highlights, report.phrases
        );
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };
    eframe::run_native(
        "French Study",
        options,
        Box::new(|_cc| Ok(Box::new(FrenchStudyApp::new(conn, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
