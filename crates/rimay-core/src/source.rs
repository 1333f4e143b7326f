use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dictionary::Dictionary;
use crate::errors::ApiError;
use crate::lang::Direction;

/// Where the local dictionary comes from.
#[async_trait]
pub trait DictionarySource: Send + Sync {
    async fn fetch_dictionary(&self) -> Result<Dictionary, ApiError>;
}

/// Response of the remote translation service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteTranslation {
    /// Empty when the service had nothing to offer (absent or `null`).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl RemoteTranslation {
    pub fn text(translation: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
            ..Default::default()
        }
    }
}

/// Remote fallback used when the dictionary produces no change.
#[async_trait]
pub trait RemoteTranslator: Send + Sync {
    /// Translate `text` as given by the user (not normalized).
    async fn translate_remote(
        &self,
        text: &str,
        direction: Direction,
    ) -> Result<RemoteTranslation, ApiError>;
}
