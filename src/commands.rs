use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use rimay_core::format::{format_bytes, format_timestamp};
use rimay_core::lang::{Direction, Language};
use rimay_core::models::{DictionaryExport, StudyDirection, UploadStats};

use crate::{App, Command, DictCommand, StudyCommand, UploadsCommand};

pub(crate) async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Translate {
            text,
            from,
            to,
            show_origin,
        } => translate(app, &text.join(" "), from, to, show_origin).await,
        Command::Dict { command } => dict(app, command).await,
        Command::Study { command } => study(app, command).await,
        Command::Speak {
            text,
            from,
            no_translate,
            output,
        } => speak(app, &text.join(" "), from, no_translate, &output).await,
        Command::Transcribe { file, lang, clip } => transcribe(app, &file, lang, clip).await,
        Command::Uploads { command } => uploads(app, command).await,
        Command::Stats => stats(app).await,
    }
}

fn source_or_default(app: &App, from: Option<Language>) -> Language {
    from.unwrap_or(app.settings.translation.default_source)
}

fn direction(app: &App, from: Option<Language>, to: Option<Language>) -> Result<Direction> {
    let source = source_or_default(app, from);
    let target = to.unwrap_or(source.complement());
    Ok(Direction::from_codes(source.code(), target.code())?)
}

async fn translate(
    app: &App,
    text: &str,
    from: Option<Language>,
    to: Option<Language>,
    show_origin: bool,
) -> Result<()> {
    let direction = direction(app, from, to)?;
    let result = app
        .resolver
        .resolve(text, direction)
        .await
        .context("Translation failed")?;
    if show_origin {
        println!("[{} {}] {}", result.direction, result.origin, result.text);
    } else {
        println!("{}", result.text);
    }
    Ok(())
}

async fn dict(app: &App, command: DictCommand) -> Result<()> {
    let client = &app.client;
    match command {
        DictCommand::List { filter } => {
            let dictionary = client
                .fetch_dictionary()
                .await
                .context("Failed to load the dictionary")?;
            let matches = dictionary.search(&filter);
            for (spanish, kichwa) in &matches {
                println!("{spanish}\t{kichwa}");
            }
            println!("{} of {} entries", matches.len(), dictionary.len());
        }
        DictCommand::Add { spanish, kichwa } => {
            let entry = client.add_entry(&spanish, &kichwa).await?;
            println!("added {} -> {}", entry.spanish, entry.kichwa);
            report_size(app).await?;
        }
        DictCommand::Update {
            spanish,
            kichwa,
            rename,
        } => {
            let entry = client
                .update_entry(&spanish, &kichwa, rename.as_deref())
                .await?;
            println!("updated {} -> {}", entry.spanish, entry.kichwa);
            report_size(app).await?;
        }
        DictCommand::Delete { spanish } => {
            client.delete_entry(&spanish).await?;
            println!("deleted {}", spanish.trim());
            report_size(app).await?;
        }
        DictCommand::Import { file } => {
            let contents = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let stats = client.import_csv(&file_name(&file), contents).await?;
            println!(
                "rows: {}, added: {}, updated: {}, invalid: {}, duplicates: {}",
                stats.total_rows,
                stats.added,
                stats.updated,
                stats.skipped_invalid,
                stats.skipped_duplicates
            );
            report_size(app).await?;
        }
        DictCommand::Export { format, output } => {
            let body = match client.export_dictionary(format).await? {
                DictionaryExport::Json(dictionary) => serde_json::to_string_pretty(&dictionary)?,
                DictionaryExport::Csv(csv) => csv,
            };
            match output {
                Some(path) => {
                    tokio::fs::write(&path, body)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), %format, "dictionary exported");
                }
                None => println!("{body}"),
            }
        }
        DictCommand::Meta => {
            let report = client.dictionary_meta().await?;
            let meta = &report.meta;
            println!("version: {}", meta.current_version);
            println!(
                "last updated: {}",
                format_timestamp(meta.last_updated.as_deref().unwrap_or_default())
            );
            println!("entries: {}", meta.entry_count);
            for backup in &report.backups {
                let size = backup.bytes.map(format_bytes).unwrap_or_default();
                println!("  {}  {}", backup.file, size);
            }
        }
        DictCommand::History { limit } => {
            for entry in client.history(limit).await? {
                let when = format_timestamp(entry.timestamp.as_deref().unwrap_or_default());
                println!("{when}  {}", entry.summary());
            }
        }
        DictCommand::Backups => {
            for backup in client.backups().await? {
                let meta = &backup.metadata;
                println!(
                    "{}  {}  {}  {}",
                    backup.file,
                    format_timestamp(meta.created_at.as_deref().unwrap_or_default()),
                    meta.reason.as_deref().unwrap_or("-"),
                    meta.entries.map(|n| n.to_string()).unwrap_or_default()
                );
            }
        }
        DictCommand::Restore { file } => {
            let outcome = client.restore(&file).await?;
            println!(
                "restored {} ({} entries)",
                outcome.restored_from, outcome.entries
            );
            app.resolver.repository().invalidate();
        }
    }
    Ok(())
}

/// Refetch the dictionary after a change and print its size. The cached
/// translation dictionary is dropped as well.
async fn report_size(app: &App) -> Result<()> {
    app.resolver.repository().invalidate();
    let dictionary = app
        .client
        .fetch_dictionary()
        .await
        .context("Failed to reload the dictionary")?;
    println!("dictionary now has {} entries", dictionary.len());
    Ok(())
}

async fn study(app: &App, command: StudyCommand) -> Result<()> {
    match command {
        StudyCommand::Flashcards { from, limit } => {
            let dir = StudyDirection::from(source_or_default(app, from).direction_from());
            let cards = app.client.flashcards(dir, limit).await?;
            if cards.is_empty() {
                println!("no flashcards available");
            }
            for card in cards {
                println!("{}\t{}", card.front, card.back);
            }
        }
        StudyCommand::Quiz {
            from,
            limit,
            options,
        } => {
            let dir = StudyDirection::from(source_or_default(app, from).direction_from());
            let questions = app.client.quiz(dir, limit, options).await?;
            for (n, question) in questions.iter().enumerate() {
                println!("{}. {}", n + 1, question.prompt);
                for (letter, option) in ('a'..='z').zip(&question.options) {
                    println!("   {letter}) {option}");
                }
            }
            if !questions.is_empty() {
                let answers: Vec<&str> = questions.iter().map(|q| q.answer.as_str()).collect();
                println!("answers: {}", answers.join(", "));
            }
        }
    }
    Ok(())
}

async fn speak(
    app: &App,
    text: &str,
    from: Option<Language>,
    no_translate: bool,
    output: &Path,
) -> Result<()> {
    let source = source_or_default(app, from);
    let (spoken, lang) = if no_translate {
        (text.trim().to_string(), source)
    } else {
        let direction = source.direction_from();
        let translated = app.resolver.translate(text, direction).await?;
        (translated, direction.target())
    };
    if spoken.is_empty() {
        bail!("nothing to speak");
    }

    let audio = app.client.text_to_speech(&spoken, lang.code()).await?;
    if !audio.is_available() {
        bail!(
            "speech unavailable: {}",
            audio.error.as_deref().unwrap_or("no audio returned")
        );
    }
    let bytes = app.client.download_audio(&audio.audio_url).await?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{spoken}");
    println!(
        "saved {} ({}, voice: {})",
        output.display(),
        format_bytes(bytes.len() as u64),
        audio.used_lang.as_deref().unwrap_or(lang.code())
    );
    Ok(())
}

async fn transcribe(app: &App, file: &Path, lang: Option<Language>, clip: bool) -> Result<()> {
    let lang = source_or_default(app, lang);
    let audio = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let transcription = if clip {
        app.client.transcribe(audio, lang).await
    } else {
        app.client.speech_to_text(&file_name(file), audio, lang).await
    }
    .context("Transcription failed")?;
    if let Some(error) = &transcription.error {
        bail!("transcription failed: {error}");
    }
    println!("{lang}: {}", transcription.text);

    let direction = lang.direction_from();
    let translated = app.resolver.translate(&transcription.text, direction).await?;
    println!("{}: {translated}", direction.target());
    Ok(())
}

async fn uploads(app: &App, command: UploadsCommand) -> Result<()> {
    match command {
        UploadsCommand::List => {
            let uploads = app.client.uploads().await?;
            if uploads.is_empty() {
                println!("no uploads");
            }
            for upload in &uploads {
                println!(
                    "{}  {}  {}  {}",
                    upload.filename,
                    upload.display_name(),
                    format_bytes(upload.size),
                    format_timestamp(upload.uploaded_at.as_deref().unwrap_or_default())
                );
                if let Some(text) = upload.text.as_deref().filter(|t| !t.is_empty()) {
                    println!("    {text}");
                }
            }
        }
        UploadsCommand::Delete { filename } => {
            app.client.delete_upload(&filename).await?;
            println!("deleted {}", filename.trim());
        }
    }
    Ok(())
}

async fn stats(app: &App) -> Result<()> {
    let stats = match app.client.stats().await? {
        Some(stats) => stats,
        None => {
            let uploads = app.client.uploads().await?;
            UploadStats::from_uploads(&UploadStats::default(), &uploads)
        }
    };
    println!("files: {}", stats.total_files);
    println!("words: {}", stats.total_words);
    println!("space: {}", format_bytes(stats.total_space));
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
