//! Wire payloads of the translation backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dictionary::Dictionary;
use crate::lang::Direction;

/// `{"dictionary": {...}}` envelope used by the dictionary endpoints.
///
/// Values are kept raw so that one malformed entry does not invalidate the
/// rest; see [`DictionaryEnvelope::into_dictionary`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DictionaryEnvelope {
    #[serde(default)]
    pub dictionary: Option<Map<String, Value>>,
}

impl DictionaryEnvelope {
    /// String-valued entries as a [`Dictionary`], plus the keys whose value
    /// was not a string.
    pub fn into_dictionary(self) -> (Dictionary, Vec<String>) {
        let mut dictionary = Dictionary::new();
        let mut skipped = Vec::new();
        for (spanish, value) in self.dictionary.unwrap_or_default() {
            match value {
                Value::String(kichwa) => {
                    dictionary.insert(spanish, kichwa);
                }
                _ => skipped.push(spanish),
            }
        }
        (dictionary, skipped)
    }
}

/// A single Spanish/Kichwa pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub spanish: String,
    pub kichwa: String,
}

/// One recorded change to the dictionary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub action: String,
    #[serde(default)]
    pub spanish_before: Option<String>,
    #[serde(default)]
    pub spanish_after: Option<String>,
    #[serde(default)]
    pub kichwa_before: Option<String>,
    #[serde(default)]
    pub kichwa_after: Option<String>,
    #[serde(default)]
    pub info: Value,
}

impl HistoryEntry {
    /// One-line description, e.g. `update casa: wasi -> wasikuna`.
    pub fn summary(&self) -> String {
        let term = self
            .spanish_after
            .as_deref()
            .or(self.spanish_before.as_deref())
            .unwrap_or("-");
        match (&self.kichwa_before, &self.kichwa_after) {
            (Some(before), Some(after)) => format!("{} {term}: {before} -> {after}", self.action),
            (None, Some(after)) => format!("{} {term}: {after}", self.action),
            (Some(before), None) => format!("{} {term}: {before}", self.action),
            (None, None) => format!("{} {term}", self.action),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionaryMeta {
    #[serde(default)]
    pub current_version: u64,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub entry_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackupSummary {
    pub file: String,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Response of `GET /api/dictionary/meta`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaReport {
    #[serde(default)]
    pub meta: DictionaryMeta,
    #[serde(default)]
    pub backups: Vec<BackupSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupMetadata {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub entries: Option<usize>,
    #[serde(default)]
    pub info: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    pub file: String,
    #[serde(default)]
    pub metadata: BackupMetadata,
}

/// Counters reported by a CSV import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    #[serde(default)]
    pub added: usize,
    #[serde(default)]
    pub updated: usize,
    #[serde(default)]
    pub skipped_invalid: usize,
    #[serde(default)]
    pub skipped_duplicates: usize,
    #[serde(default)]
    pub total_rows: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreOutcome {
    pub restored_from: String,
    #[serde(default)]
    pub entries: usize,
}

/// An audio file uploaded for transcription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub filename: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub text: Option<String>,
}

impl UploadRecord {
    pub fn display_name(&self) -> &str {
        self.original_name.as_deref().unwrap_or(&self.filename)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStats {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_words: u64,
    #[serde(default)]
    pub total_space: u64,
}

impl UploadStats {
    /// Totals computed from an upload listing. Word count is not derivable
    /// from the listing and is carried over from `base`.
    pub fn from_uploads(base: &UploadStats, uploads: &[UploadRecord]) -> Self {
        Self {
            total_files: uploads.len() as u64,
            total_words: base.total_words,
            total_space: uploads.iter().map(|u| u.size).sum(),
        }
    }
}

/// Direction labels used by the study endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyDirection {
    #[default]
    #[serde(rename = "es2qu")]
    EsToQu,
    #[serde(rename = "qu2es")]
    QuToEs,
}

impl StudyDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EsToQu => "es2qu",
            Self::QuToEs => "qu2es",
        }
    }
}

impl From<Direction> for StudyDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::EsToQu => Self::EsToQu,
            Direction::QuToEs => Self::QuToEs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    pub dir: StudyDirection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub dir: StudyDirection,
}

/// Audio produced by the backend's text-to-speech endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechAudio {
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub used_lang: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SpeechAudio {
    pub fn is_available(&self) -> bool {
        !self.audio_url.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Result of an export: parsed JSON or raw CSV text.
#[derive(Clone, Debug, PartialEq)]
pub enum DictionaryExport {
    Json(Dictionary),
    Csv(String),
}
