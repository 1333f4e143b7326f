//! Deterministic stand-ins for the backend, used by resolver tests and by
//! callers that want to exercise translation offline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use rimay_core::dictionary::Dictionary;
use rimay_core::errors::ApiError;
use rimay_core::lang::Direction;
use rimay_core::source::{DictionarySource, RemoteTranslation, RemoteTranslator};

/// Dictionary source that serves a fixed dictionary.
pub struct MockDictionarySource {
    dictionary: Dictionary,
    delay: Option<Duration>,
    failures: AtomicUsize,
    call_count: AtomicUsize,
}

impl MockDictionarySource {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            delay: None,
            failures: AtomicUsize::new(0),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Source whose every fetch fails.
    pub fn unavailable() -> Self {
        Self::new(Dictionary::new()).failing_first(usize::MAX)
    }

    /// Wait before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the first `n` fetches with a network error.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures.store(n, Ordering::Relaxed);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DictionarySource for MockDictionarySource {
    async fn fetch_dictionary(&self) -> Result<Dictionary, ApiError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self
            .failures
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ApiError::Network("mock dictionary unavailable".into()));
        }
        Ok(self.dictionary.clone())
    }
}

/// Pre-programmed remote fallback answers.
#[derive(Clone, Debug)]
pub enum MockReply {
    Translation(String),
    Error(ApiError),
}

impl MockReply {
    pub fn text(translation: &str) -> Self {
        Self::Translation(translation.to_string())
    }
}

/// Remote translator that replays a fixed reply and records its requests.
pub struct MockTranslator {
    reply: MockReply,
    requests: Mutex<Vec<(String, Direction)>>,
}

impl MockTranslator {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Texts and directions received, in call order.
    pub fn requests(&self) -> Vec<(String, Direction)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl RemoteTranslator for MockTranslator {
    async fn translate_remote(
        &self,
        text: &str,
        direction: Direction,
    ) -> Result<RemoteTranslation, ApiError> {
        self.requests.lock().push((text.to_string(), direction));
        match &self.reply {
            MockReply::Translation(t) => Ok(RemoteTranslation::text(t.clone())),
            MockReply::Error(e) => Err(e.clone()),
        }
    }
}
