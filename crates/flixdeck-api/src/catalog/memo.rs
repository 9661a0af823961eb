//! Keyed single-flight memoization.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Mutex, OnceCell};

/// Memoizes an async computation per key.
///
/// Concurrent callers with the same key await the same initialization, so
/// at most one computation per key is in flight. Only successful values are
/// stored; after a failure the next caller runs the computation again.
#[derive(Debug)]
pub struct Memo<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for `key`, running `init` when none exists.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `init`. Nothing is stored in that case.
    pub async fn get_or_try_init<F, Fut>(&self, key: K, init: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let cell = {
            let mut cells = self.cells.lock().await;
            Arc::clone(cells.entry(key).or_default())
        };
        let value = cell.get_or_try_init(init).await?;
        Ok(value.clone())
    }

    /// Number of keys holding a value.
    pub async fn len(&self) -> usize {
        let cells = self.cells.lock().await;
        cells.values().filter(|cell| cell.initialized()).count()
    }

    /// Whether no key holds a value.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
