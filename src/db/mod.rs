//! Document Store Module
//!
//! In-process document database holding the `countries`, `states` and
//! `cities` collections and their unique indexes.

mod collection;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

pub use collection::{BulkWriteFailure, Collection, InsertManyOutcome, UniqueIndex, UpdateOutcome};

use crate::models::{City, Country, State};

// == Document ==
/// A record that can live in a collection.
pub trait Document: Clone + PartialEq + Send + Sync + 'static {
    /// Collection name
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    /// Records the time of the last modification.
    fn touch(&mut self, at: DateTime<Utc>);
}

// == Database ==
/// Handle to the three geographic collections, cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pub countries: Collection<Country>,
    pub states: Collection<State>,
    pub cities: Collection<City>,
    connected: Arc<AtomicBool>,
}

impl Database {
    /// Creates an empty, connected database with its unique indexes declared.
    pub fn new() -> Self {
        let connected = Arc::new(AtomicBool::new(true));

        let countries = Collection::new(
            vec![
                UniqueIndex::new("code", |c: &Country| c.code.clone()),
                UniqueIndex::new("name", |c: &Country| c.name.to_lowercase()),
            ],
            Arc::clone(&connected),
        );
        let states = Collection::new(
            vec![UniqueIndex::new("code", |s: &State| s.code.clone())],
            Arc::clone(&connected),
        );
        let cities = Collection::new(
            vec![UniqueIndex::new("name_country", |c: &City| {
                let (name, country) = c.identity();
                format!("{}|{}", name, country)
            })],
            Arc::clone(&connected),
        );

        Self {
            countries,
            states,
            cities,
            connected,
        }
    }

    /// Stops serving requests; every collection call fails with
    /// `StorageError::Unavailable` until `reconnect`.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        info!("Document store disconnected");
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        info!("Document store connected");
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
