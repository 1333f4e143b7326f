//! # rimay
//!
//! Command-line client for the Spanish–Kichwa translator backend. Wires
//! settings, telemetry, the HTTP client and the translation resolver.

#![deny(unsafe_code)]

mod commands;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use rimay_client::{ApiClient, ClientConfig};
use rimay_core::lang::Language;
use rimay_core::models::ExportFormat;
use rimay_engine::{DictionaryRepository, TranslationResolver};
use rimay_settings::RimaySettings;
use rimay_telemetry::TelemetryConfig;

/// Spanish–Kichwa translator.
#[derive(Parser, Debug)]
#[command(name = "rimay", about = "Spanish–Kichwa translator client")]
struct Cli {
    /// Backend URL (overrides settings and RIMAY_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Settings file (defaults to ~/.rimay/settings.json).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate text, dictionary first, backend service on a full miss.
    Translate {
        text: Vec<String>,
        /// Source language (`es` or `qu`).
        #[arg(long)]
        from: Option<Language>,
        /// Target language; must differ from the source.
        #[arg(long)]
        to: Option<Language>,
        /// Also print which phase produced the result.
        #[arg(long)]
        show_origin: bool,
    },
    /// Manage the shared dictionary.
    Dict {
        #[command(subcommand)]
        command: DictCommand,
    },
    /// Practice with flashcards and quizzes.
    Study {
        #[command(subcommand)]
        command: StudyCommand,
    },
    /// Translate text and save the spoken translation as audio.
    Speak {
        text: Vec<String>,
        #[arg(long)]
        from: Option<Language>,
        /// Speak the text as given instead of translating it first.
        #[arg(long)]
        no_translate: bool,
        #[arg(long, short, default_value = "translation.mp3")]
        output: PathBuf,
    },
    /// Transcribe an audio file and translate the recognized text.
    Transcribe {
        file: PathBuf,
        /// Language spoken in the recording.
        #[arg(long)]
        lang: Option<Language>,
        /// Send as a short recorded clip (`/transcribe`) instead of an
        /// uploaded file (`/speech-to-text`).
        #[arg(long)]
        clip: bool,
    },
    /// Uploaded audio files.
    Uploads {
        #[command(subcommand)]
        command: UploadsCommand,
    },
    /// Upload totals.
    Stats,
}

#[derive(Subcommand, Debug)]
enum DictCommand {
    /// List entries, optionally filtered by Spanish term.
    List {
        #[arg(long, default_value = "")]
        filter: String,
    },
    Add {
        spanish: String,
        kichwa: String,
    },
    Update {
        spanish: String,
        kichwa: String,
        /// Rename the Spanish term.
        #[arg(long)]
        rename: Option<String>,
    },
    Delete {
        spanish: String,
    },
    /// Bulk import a `spanish,kichwa` CSV file.
    Import {
        file: PathBuf,
    },
    Export {
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Write to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Version, entry count and latest backups.
    Meta,
    History {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    Backups,
    /// Restore the dictionary from a backup file.
    Restore {
        file: String,
    },
}

#[derive(Subcommand, Debug)]
enum StudyCommand {
    Flashcards {
        #[arg(long)]
        from: Option<Language>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    Quiz {
        #[arg(long)]
        from: Option<Language>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 4)]
        options: usize,
    },
}

#[derive(Subcommand, Debug)]
enum UploadsCommand {
    List,
    Delete { filename: String },
}

/// Shared handles for command execution.
pub(crate) struct App {
    pub settings: &'static RimaySettings,
    pub client: Arc<ApiClient>,
    pub resolver: TranslationResolver,
}

fn load_settings(cli: &Cli) -> Result<RimaySettings> {
    let path = cli
        .settings
        .clone()
        .unwrap_or_else(rimay_settings::settings_path);
    let mut settings = rimay_settings::load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    if let Some(url) = &cli.api_url {
        settings.api.base_url = url.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn telemetry_config(settings: &RimaySettings) -> TelemetryConfig {
    TelemetryConfig {
        log_level: rimay_telemetry::parse_level(&settings.logging.level).unwrap_or(Level::WARN),
        module_levels: settings
            .logging
            .module_levels
            .iter()
            .filter_map(|(module, level)| {
                rimay_telemetry::parse_level(level).map(|level| (module.clone(), level))
            })
            .collect(),
        json: settings.logging.json,
    }
}

fn build_app(settings: &'static RimaySettings) -> Result<App> {
    let config = ClientConfig {
        base_url: settings.api.base_url.clone(),
        connect_timeout: Duration::from_millis(settings.api.connect_timeout_ms),
        request_timeout: settings.api.request_timeout_ms.map(Duration::from_millis),
    };
    let client = Arc::new(ApiClient::new(config).context("Failed to create API client")?);
    let repository = Arc::new(DictionaryRepository::new(client.clone()));
    let resolver = TranslationResolver::new(repository, client.clone());
    Ok(App {
        settings,
        client,
        resolver,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    rimay_settings::init_settings(load_settings(&cli)?)
        .map_err(|_| anyhow!("settings were already initialized"))?;
    let settings = rimay_settings::get_settings();
    rimay_telemetry::init_telemetry(&telemetry_config(settings))?;
    tracing::debug!(base_url = %settings.api.base_url, "starting");

    let app = build_app(settings)?;
    commands::run(&app, cli.command).await
}
