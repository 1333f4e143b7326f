//! Dictionary management endpoints.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use rimay_core::dictionary::{normalize_kichwa, normalize_spanish, Dictionary};
use rimay_core::errors::ApiError;
use rimay_core::models::{
    BackupFile, DictionaryEntry, DictionaryEnvelope, DictionaryExport, ExportFormat,
    HistoryEntry, ImportStats, MetaReport, RestoreOutcome,
};
use rimay_core::source::DictionarySource;

use crate::client::ApiClient;

#[derive(Serialize)]
struct UpdateBody<'a> {
    spanish: &'a str,
    kichwa: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    spanish_new: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    spanish: &'a str,
}

#[derive(Serialize)]
struct RestoreBody<'a> {
    file: &'a str,
}

#[derive(Deserialize)]
struct HistoryEnvelope {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

#[derive(Deserialize)]
struct BackupsEnvelope {
    #[serde(default)]
    files: Vec<BackupFile>,
}

/// Keep the string-valued entries of a dictionary payload.
fn decode_dictionary(envelope: DictionaryEnvelope) -> Dictionary {
    let (dictionary, skipped) = envelope.into_dictionary();
    if !skipped.is_empty() {
        warn!(?skipped, "ignoring dictionary entries with non-string values");
    }
    dictionary
}

fn validated_entry(spanish: &str, kichwa: &str) -> Result<DictionaryEntry, ApiError> {
    let entry = DictionaryEntry {
        spanish: normalize_spanish(spanish),
        kichwa: normalize_kichwa(kichwa),
    };
    if entry.spanish.is_empty() || entry.kichwa.is_empty() {
        return Err(ApiError::InvalidRequest(
            "both spanish and kichwa terms are required".into(),
        ));
    }
    Ok(entry)
}

impl ApiClient {
    /// `GET /api/dictionary`. A response without a `dictionary` field is an
    /// empty dictionary.
    #[instrument(skip(self))]
    pub async fn fetch_dictionary(&self) -> Result<Dictionary, ApiError> {
        let envelope: DictionaryEnvelope = self.send_json(self.get("/api/dictionary")?).await?;
        Ok(decode_dictionary(envelope))
    }

    /// Add (or overwrite) a pair. Returns the normalized entry that was sent.
    #[instrument(skip(self))]
    pub async fn add_entry(&self, spanish: &str, kichwa: &str) -> Result<DictionaryEntry, ApiError> {
        let entry = validated_entry(spanish, kichwa)?;
        let req = self.post("/api/dictionary/add")?.json(&entry);
        self.send(req).await?;
        info!(spanish = %entry.spanish, "dictionary entry added");
        Ok(entry)
    }

    /// Change the Kichwa term of an existing entry, optionally renaming its
    /// Spanish key. Returns the entry as stored by the backend.
    #[instrument(skip(self))]
    pub async fn update_entry(
        &self,
        spanish: &str,
        kichwa: &str,
        spanish_new: Option<&str>,
    ) -> Result<DictionaryEntry, ApiError> {
        let entry = validated_entry(spanish, kichwa)?;
        let renamed = spanish_new
            .map(normalize_spanish)
            .filter(|s| !s.is_empty());
        let body = UpdateBody {
            spanish: &entry.spanish,
            kichwa: &entry.kichwa,
            spanish_new: renamed.as_deref(),
        };
        let req = self.post("/api/dictionary/update")?.json(&body);
        let stored: DictionaryEntry = self.send_json(req).await?;
        info!(spanish = %stored.spanish, "dictionary entry updated");
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, spanish: &str) -> Result<(), ApiError> {
        let spanish = normalize_spanish(spanish);
        if spanish.is_empty() {
            return Err(ApiError::InvalidRequest("spanish term is required".into()));
        }
        let req = self
            .post("/api/dictionary/delete")?
            .json(&DeleteBody { spanish: &spanish });
        self.send(req).await?;
        info!(spanish = %spanish, "dictionary entry deleted");
        Ok(())
    }

    /// Upload a `spanish,kichwa` CSV file for bulk import.
    #[instrument(skip(self, contents), fields(bytes = contents.len()))]
    pub async fn import_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<ImportStats, ApiError> {
        if contents.is_empty() {
            return Err(ApiError::InvalidRequest("CSV file is empty".into()));
        }
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let form = Form::new().part("file", part);
        let req = self.post("/api/dictionary/import")?.multipart(form);
        let stats: ImportStats = self.send_json(req).await?;
        info!(added = stats.added, updated = stats.updated, "dictionary import finished");
        Ok(stats)
    }

    #[instrument(skip(self))]
    pub async fn export_dictionary(&self, format: ExportFormat) -> Result<DictionaryExport, ApiError> {
        let req = self
            .get("/api/dictionary/export")?
            .query(&[("format", format.as_str())]);
        match format {
            ExportFormat::Json => {
                let envelope: DictionaryEnvelope = self.send_json(req).await?;
                Ok(DictionaryExport::Json(decode_dictionary(envelope)))
            }
            ExportFormat::Csv => Ok(DictionaryExport::Csv(self.send_text(req).await?)),
        }
    }

    pub async fn dictionary_meta(&self) -> Result<MetaReport, ApiError> {
        self.send_json(self.get("/api/dictionary/meta")?).await
    }

    /// Most recent `limit` history entries, oldest first.
    pub async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, ApiError> {
        let req = self
            .get("/api/dictionary/history")?
            .query(&[("limit", limit)]);
        let envelope: HistoryEnvelope = self.send_json(req).await?;
        Ok(envelope.history)
    }

    pub async fn backups(&self) -> Result<Vec<BackupFile>, ApiError> {
        let envelope: BackupsEnvelope = self.send_json(self.get("/api/dictionary/backups")?).await?;
        Ok(envelope.files)
    }

    #[instrument(skip(self))]
    pub async fn restore(&self, file: &str) -> Result<RestoreOutcome, ApiError> {
        let file = file.trim();
        if file.is_empty() {
            return Err(ApiError::InvalidRequest("backup file name is required".into()));
        }
        let req = self
            .post("/api/dictionary/restore")?
            .json(&RestoreBody { file });
        let outcome: RestoreOutcome = self.send_json(req).await?;
        info!(file = %outcome.restored_from, entries = outcome.entries, "dictionary restored");
        Ok(outcome)
    }
}

#[async_trait]
impl DictionarySource for ApiClient {
    async fn fetch_dictionary(&self) -> Result<Dictionary, ApiError> {
        ApiClient::fetch_dictionary(self).await
    }
}
