use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use rimay_core::errors::TranslateError;
use rimay_core::lang::Direction;
use rimay_core::source::RemoteTranslator;
use rimay_core::substitute;

use crate::repository::DictionaryRepository;

/// Which phase produced a translation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    /// Input was empty or whitespace.
    Empty,
    /// At least one dictionary key matched.
    Dictionary,
    /// The remote service supplied the text.
    Remote,
    /// Nothing matched and the remote answer was unusable; the text is the
    /// normalized input.
    Unchanged,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Dictionary => "dictionary",
            Self::Remote => "remote",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Translation {
    pub text: String,
    pub direction: Direction,
    pub origin: Origin,
}

/// Dictionary-first translation with a remote fallback on a full miss.
pub struct TranslationResolver {
    repository: Arc<DictionaryRepository>,
    remote: Arc<dyn RemoteTranslator>,
}

impl TranslationResolver {
    pub fn new(repository: Arc<DictionaryRepository>, remote: Arc<dyn RemoteTranslator>) -> Self {
        Self { repository, remote }
    }

    pub fn repository(&self) -> &Arc<DictionaryRepository> {
        &self.repository
    }

    /// Translate `text`, reporting where the result came from.
    ///
    /// The remote fallback receives `text` as given, not normalized. An
    /// error status from it leaves the local result in place; transport and
    /// decode failures are returned.
    #[instrument(skip(self, text), fields(direction = %direction))]
    pub async fn resolve(
        &self,
        text: &str,
        direction: Direction,
    ) -> Result<Translation, TranslateError> {
        let done = |text: String, origin: Origin| -> Result<Translation, TranslateError> {
            debug!(origin = origin.as_str(), "translation resolved");
            Ok(Translation {
                text,
                direction,
                origin,
            })
        };

        if text.trim().is_empty() {
            return done(String::new(), Origin::Empty);
        }

        let dictionary = self.repository.get().await;
        let (baseline, local) = substitute::apply_table(text, &dictionary.table(direction));
        if local != baseline {
            return done(local, Origin::Dictionary);
        }

        match self.remote.translate_remote(text, direction).await {
            Ok(reply) => {
                if let Some(reason) = reply.translate_error.as_deref().or(reply.error.as_deref()) {
                    debug!(reason, "remote reported a translation problem");
                }
                if reply.translation.is_empty() {
                    done(local, Origin::Unchanged)
                } else {
                    done(reply.translation, Origin::Remote)
                }
            }
            Err(e) if e.is_status() => {
                warn!(error = %e, kind = e.error_kind(), "remote translation rejected, keeping input");
                done(local, Origin::Unchanged)
            }
            Err(e) => {
                warn!(error = %e, kind = e.error_kind(), "remote translation failed");
                Err(TranslateError::Remote(e))
            }
        }
    }

    /// Translate `text` and return only the resulting string.
    pub async fn translate(&self, text: &str, direction: Direction) -> Result<String, TranslateError> {
        Ok(self.resolve(text, direction).await?.text)
    }

    /// Translate between raw language codes. Only `es`→`qu` and `qu`→`es`
    /// are accepted; the pair is checked before anything else.
    pub async fn translate_codes(
        &self,
        text: &str,
        src: &str,
        dest: &str,
    ) -> Result<String, TranslateError> {
        let direction = Direction::from_codes(src, dest)?;
        self.translate(text, direction).await
    }
}
