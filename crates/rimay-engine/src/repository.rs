use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use rimay_core::dictionary::Dictionary;
use rimay_core::source::DictionarySource;

/// Lazily loaded, shared dictionary.
///
/// The first [`get`](Self::get) fetches from the source; callers arriving
/// while that fetch is in flight wait for it instead of issuing their own.
/// A failed fetch is not cached, so the following call tries again.
pub struct DictionaryRepository {
    source: Arc<dyn DictionarySource>,
    cell: RwLock<Arc<OnceCell<Arc<Dictionary>>>>,
}

impl DictionaryRepository {
    pub fn new(source: Arc<dyn DictionarySource>) -> Self {
        Self {
            source,
            cell: RwLock::new(Arc::new(OnceCell::new())),
        }
    }

    /// Current dictionary, fetching it on first use. Fetch failures are
    /// logged and yield an empty dictionary for this call only.
    pub async fn get(&self) -> Arc<Dictionary> {
        let cell = self.cell.read().clone();
        let loaded = cell
            .get_or_try_init(|| async {
                let dictionary = self.source.fetch_dictionary().await?;
                debug!(entries = dictionary.len(), "dictionary loaded");
                Ok::<_, rimay_core::ApiError>(Arc::new(dictionary))
            })
            .await;

        match loaded {
            Ok(dictionary) => Arc::clone(dictionary),
            Err(e) => {
                warn!(error = %e, kind = e.error_kind(), "dictionary fetch failed, using empty dictionary");
                Arc::new(Dictionary::new())
            }
        }
    }

    /// Whether a dictionary is cached.
    pub fn is_loaded(&self) -> bool {
        self.cell.read().initialized()
    }

    /// Drop the cached dictionary; the next [`get`](Self::get) refetches.
    /// A fetch already in flight completes into the discarded cell.
    pub fn invalidate(&self) {
        *self.cell.write() = Arc::new(OnceCell::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDictionarySource;
    use std::time::Duration;

    fn sample() -> Dictionary {
        [("hola", "rimaykullayki"), ("agua", "yaku")]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn loads_once() {
        let source = Arc::new(MockDictionarySource::new(sample()));
        let repo = DictionaryRepository::new(source.clone());
        assert!(!repo.is_loaded());

        assert_eq!(repo.get().await.len(), 2);
        assert_eq!(repo.get().await.len(), 2);
        assert!(repo.is_loaded());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_calls_share_one_fetch() {
        let source = Arc::new(
            MockDictionarySource::new(sample()).with_delay(Duration::from_millis(50)),
        );
        let repo = DictionaryRepository::new(source.clone());

        let (a, b, c, d) = tokio::join!(repo.get(), repo.get(), repo.get(), repo.get());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&c, &d));
        assert_eq!(a.get("agua"), Some("yaku"));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_retried() {
        let source = Arc::new(MockDictionarySource::new(sample()).failing_first(1));
        let repo = DictionaryRepository::new(source.clone());

        assert!(repo.get().await.is_empty());
        assert!(!repo.is_loaded());
        assert_eq!(repo.get().await.len(), 2);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let source = Arc::new(MockDictionarySource::new(sample()));
        let repo = DictionaryRepository::new(source.clone());

        repo.get().await;
        repo.invalidate();
        assert!(!repo.is_loaded());
        repo.get().await;
        assert_eq!(source.call_count(), 2);
    }
}
