//! Injectable document store over a key/value backend.
//!
//! # Responsibility
//! - Own the authoritative `Dataset` for one session.
//! - Persist every committed document under one namespaced key.
//! - Fan out commit notifications to subscribed listeners.
//!
//! # Invariants
//! - `commit` swaps the whole document in one assignment; readers never see
//!   a partial update.
//! - Corrupt or unreadable persisted state loads the default document.
//! - A failed write is reported and logged; the committed document stays.

use super::codec::{decode_dataset, encode_dataset, CodecError};
use crate::model::dataset::Dataset;
use crate::model::ValidationError;
use crate::storage::{KeyValueStorage, StorageError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Save-slot key shared with the browser build of the planner.
pub const DEFAULT_STORAGE_KEY: &str = "logistics-dataset";

/// Store construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key under which the document is persisted.
    pub storage_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Persisted state that could not be used at load time.
#[derive(Debug)]
pub enum CorruptPersistedState {
    /// Stored value is not a valid document.
    Decode(CodecError),
    /// Backend read failed.
    Unreadable(StorageError),
}

impl Display for CorruptPersistedState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "persisted dataset rejected: {err}"),
            Self::Unreadable(err) => write!(f, "persisted dataset unreadable: {err}"),
        }
    }
}

impl Error for CorruptPersistedState {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Unreadable(err) => Some(err),
        }
    }
}

/// Where the document held after `load` came from.
#[derive(Debug)]
pub enum LoadSource {
    /// Decoded from storage.
    Persisted,
    /// Nothing stored under the key; built-in default.
    DefaultMissing,
    /// Stored state was rejected; built-in default.
    DefaultRecovered(CorruptPersistedState),
}

impl LoadSource {
    pub fn is_default(&self) -> bool {
        !matches!(self, Self::Persisted)
    }
}

/// Write-side failure after a successful in-memory commit.
#[derive(Debug)]
pub enum PersistenceFailure {
    Encode(CodecError),
    Storage(StorageError),
}

impl Display for PersistenceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode dataset: {err}"),
            Self::Storage(err) => write!(f, "failed to write dataset: {err}"),
        }
    }
}

impl Error for PersistenceFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

/// Result of a commit that passed validation.
#[derive(Debug)]
pub enum CommitStatus {
    Persisted,
    /// Document is committed in memory only.
    NotPersisted(PersistenceFailure),
}

impl CommitStatus {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted)
    }
}

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Dataset)>;

/// Sole owner and mutator of the planner document.
pub struct DocumentStore<S: KeyValueStorage> {
    storage: S,
    storage_key: String,
    current: Dataset,
    load_source: LoadSource,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> DocumentStore<S> {
    /// Loads the document stored under [`DEFAULT_STORAGE_KEY`].
    pub fn load(storage: S) -> Self {
        Self::load_with_options(storage, StoreOptions::default())
    }

    /// Loads the persisted document, falling back to `Dataset::default()`.
    ///
    /// Never fails; the reason for a fallback is kept in
    /// [`DocumentStore::load_source`] and logged at `warn`.
    pub fn load_with_options(storage: S, options: StoreOptions) -> Self {
        let (current, load_source) = read_persisted(&storage, &options.storage_key);
        match &load_source {
            LoadSource::Persisted => info!(
                "event=store_load module=store status=ok source=persisted key={} customers={} placements={}",
                options.storage_key,
                current.customers.len(),
                current.planner.schedule.len()
            ),
            LoadSource::DefaultMissing => info!(
                "event=store_load module=store status=ok source=default key={}",
                options.storage_key
            ),
            LoadSource::DefaultRecovered(reason) => warn!(
                "event=store_load module=store status=recovered source=default key={} error_code=corrupt_persisted_state error={}",
                options.storage_key, reason
            ),
        }

        Self {
            storage,
            storage_key: options.storage_key,
            current,
            load_source,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Read-only view of the committed document.
    pub fn current(&self) -> &Dataset {
        &self.current
    }

    pub fn load_source(&self) -> &LoadSource {
        &self.load_source
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Replaces the document, persists it and notifies listeners.
    ///
    /// # Errors
    /// - Returns `ValidationError` for a structurally invalid document; the
    ///   current document is left untouched and nobody is notified.
    ///
    /// A persistence failure is not an error here: the commit happened and
    /// the failure is returned as [`CommitStatus::NotPersisted`].
    pub fn commit(&mut self, next: Dataset) -> Result<CommitStatus, ValidationError> {
        next.validate()?;
        self.current = next;

        let status = self.persist();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.current);
        }
        Ok(status)
    }

    /// Registers a listener invoked after every successful commit.
    pub fn subscribe(&mut self, listener: impl FnMut(&Dataset) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener; returns `false` when the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn persist(&mut self) -> CommitStatus {
        let result = encode_dataset(&self.current)
            .map_err(PersistenceFailure::Encode)
            .and_then(|raw| {
                self.storage
                    .set_item(&self.storage_key, &raw)
                    .map_err(PersistenceFailure::Storage)
            });

        match result {
            Ok(()) => CommitStatus::Persisted,
            Err(err) => {
                error!(
                    "event=store_persist module=store status=error key={} error_code=persistence_failure error={}",
                    self.storage_key, err
                );
                CommitStatus::NotPersisted(err)
            }
        }
    }
}

fn read_persisted<S: KeyValueStorage>(storage: &S, key: &str) -> (Dataset, LoadSource) {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Dataset::default(), LoadSource::DefaultMissing),
        Err(err) => {
            return (
                Dataset::default(),
                LoadSource::DefaultRecovered(CorruptPersistedState::Unreadable(err)),
            )
        }
    };

    match decode_dataset(&raw) {
        Ok(dataset) => (dataset, LoadSource::Persisted),
        Err(err) => (
            Dataset::default(),
            LoadSource::DefaultRecovered(CorruptPersistedState::Decode(err)),
        ),
    }
}
