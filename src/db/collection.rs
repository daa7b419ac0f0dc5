//! Collection Module
//!
//! One named collection of documents with declared unique indexes. Every
//! method is a single request: it takes the collection lock once and
//! releases it before returning, so multi-step operations built on top are
//! not atomic.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::Document;
use crate::error::StorageError;

type StorageResult<T> = std::result::Result<T, StorageError>;

// == Unique Index ==
/// A uniqueness constraint over a key derived from each document.
pub struct UniqueIndex<T> {
    pub name: &'static str,
    key: fn(&T) -> String,
}

impl<T> UniqueIndex<T> {
    pub fn new(name: &'static str, key: fn(&T) -> String) -> Self {
        Self { name, key }
    }

    pub fn key_of(&self, doc: &T) -> String {
        (self.key)(doc)
    }
}

// == Write Outcomes ==
/// Result of `update_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// A document of an unordered batch that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkWriteFailure {
    /// Position in the submitted batch
    pub index: usize,
    pub error: StorageError,
}

/// Result of `insert_many`: the batch is unordered, so some documents may
/// be written while others fail.
#[derive(Debug, Clone, Default)]
pub struct InsertManyOutcome {
    pub inserted_ids: Vec<Uuid>,
    pub failures: Vec<BulkWriteFailure>,
}

// == Collection ==
/// In-process document collection, cheap to clone.
pub struct Collection<T: Document> {
    docs: Arc<RwLock<Vec<T>>>,
    indexes: Arc<Vec<UniqueIndex<T>>>,
    connected: Arc<AtomicBool>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
            indexes: Arc::clone(&self.indexes),
            connected: Arc::clone(&self.connected),
        }
    }
}

impl<T: Document> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &T::COLLECTION)
            .field(
                "indexes",
                &self.indexes.iter().map(|i| i.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T: Document> Collection<T> {
    // == Constructor ==
    /// Creates an empty collection guarded by the shared `connected` flag.
    pub fn new(indexes: Vec<UniqueIndex<T>>, connected: Arc<AtomicBool>) -> Self {
        Self {
            docs: Arc::new(RwLock::new(Vec::new())),
            indexes: Arc::new(indexes),
            connected,
        }
    }

    fn ensure_connected(&self) -> StorageResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable(format!(
                "collection '{}' is not connected",
                T::COLLECTION
            )))
        }
    }

    /// Finds the first unique index that `candidate` would violate.
    fn conflict(&self, docs: &[T], candidate: &T) -> Option<StorageError> {
        self.indexes.iter().find_map(|index| {
            let key = index.key_of(candidate);
            docs.iter()
                .any(|d| d.id() != candidate.id() && index.key_of(d) == key)
                .then(|| StorageError::DuplicateKey {
                    collection: T::COLLECTION,
                    index: index.name,
                    key,
                })
        })
    }

    // == Insert ==
    /// Inserts one document, enforcing unique indexes.
    pub async fn insert_one(&self, doc: T) -> StorageResult<Uuid> {
        self.ensure_connected()?;
        let mut docs = self.docs.write().await;
        if let Some(err) = self.conflict(&docs, &doc) {
            return Err(err);
        }
        let id = doc.id();
        docs.push(doc);
        Ok(id)
    }

    /// Inserts a batch without stopping at the first failure.
    pub async fn insert_many(&self, batch: Vec<T>) -> StorageResult<InsertManyOutcome> {
        self.ensure_connected()?;
        let mut docs = self.docs.write().await;
        let mut outcome = InsertManyOutcome::default();

        for (index, doc) in batch.into_iter().enumerate() {
            match self.conflict(&docs, &doc) {
                Some(error) => outcome.failures.push(BulkWriteFailure { index, error }),
                None => {
                    outcome.inserted_ids.push(doc.id());
                    docs.push(doc);
                }
            }
        }

        Ok(outcome)
    }

    // == Read ==
    /// Returns every document matching `filter`, in insertion order.
    pub async fn find<F>(&self, filter: F) -> StorageResult<Vec<T>>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.ensure_connected()?;
        let docs = self.docs.read().await;
        Ok(docs.iter().filter(|d| filter(d)).cloned().collect())
    }

    /// Returns the first document matching `filter`.
    pub async fn find_one<F>(&self, filter: F) -> StorageResult<Option<T>>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.ensure_connected()?;
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| filter(d)).cloned())
    }

    pub async fn all(&self) -> StorageResult<Vec<T>> {
        self.find(|_| true).await
    }

    pub async fn count(&self) -> StorageResult<usize> {
        self.ensure_connected()?;
        Ok(self.docs.read().await.len())
    }

    // == Update ==
    /// Applies `update` to the first document matching `filter`.
    ///
    /// `modified` is 0 when the update leaves the document unchanged. The
    /// document's `updated_at` is bumped only when it changed.
    pub async fn update_one<F, U>(&self, filter: F, update: U) -> StorageResult<UpdateOutcome>
    where
        F: Fn(&T) -> bool + Send,
        U: FnOnce(&mut T) + Send,
    {
        self.ensure_connected()?;
        let mut docs = self.docs.write().await;
        let Some(pos) = docs.iter().position(|d| filter(d)) else {
            return Ok(UpdateOutcome::default());
        };

        let mut changed = docs[pos].clone();
        update(&mut changed);
        if changed == docs[pos] {
            return Ok(UpdateOutcome {
                matched: 1,
                modified: 0,
            });
        }
        if let Some(err) = self.conflict(&docs, &changed) {
            return Err(err);
        }

        changed.touch(Utc::now());
        docs[pos] = changed;
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    // == Delete ==
    /// Removes the first document matching `filter`; returns 0 or 1.
    pub async fn delete_one<F>(&self, filter: F) -> StorageResult<u64>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.ensure_connected()?;
        let mut docs = self.docs.write().await;
        match docs.iter().position(|d| filter(d)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    /// Removes every document matching `filter`; returns how many.
    pub async fn delete_many<F>(&self, filter: F) -> StorageResult<u64>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.ensure_connected()?;
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| !filter(d));
        Ok((before - docs.len()) as u64)
    }
}
