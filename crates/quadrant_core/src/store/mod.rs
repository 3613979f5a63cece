//! External task store contract.
//!
//! # Responsibility
//! - Define the CRUD surface the sync layer needs from a task backend.
//! - Provide the bundled SQLite implementation.
//!
//! # Invariants
//! - `update` only succeeds when the caller's `revision` matches the stored
//!   one; a mismatch is reported as `Conflict`, never silently merged.
//! - A failed call leaves the store unchanged.

use crate::db::DbError;
use crate::model::record::{RawRecord, RecordId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite_store;

pub use sqlite_store::SqliteTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store I/O failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(RecordId),
    /// The record changed in the store since the caller read it.
    Conflict {
        id: RecordId,
        expected_revision: i64,
        actual_revision: i64,
    },
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Conflict {
                id,
                expected_revision,
                actual_revision,
            } => write!(
                f,
                "record {id} was modified elsewhere (expected revision {expected_revision}, found {actual_revision})"
            ),
            Self::InvalidData(message) => write!(f, "invalid stored record: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Which containers a `list` call should read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContainerFilter {
    #[default]
    All,
    /// Case-insensitive container name match.
    Only(Vec<String>),
}

impl ContainerFilter {
    pub fn only(name: impl Into<String>) -> Self {
        Self::Only(vec![name.into()])
    }
}

/// One record that could not be written inside a batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub id: RecordId,
    pub error: StoreError,
}

/// Per-record results of a committed batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records as stored after the write, with bumped revisions.
    pub written: Vec<RawRecord>,
    pub failures: Vec<BatchFailure>,
}

/// CRUD contract of the task backend.
pub trait TaskStore {
    fn list(&self, filter: &ContainerFilter) -> StoreResult<Vec<RawRecord>>;
    fn get(&self, id: RecordId) -> StoreResult<Option<RawRecord>>;
    /// Inserts `record` into `container` and returns the stored row.
    fn create(&mut self, record: &RawRecord, container: &str) -> StoreResult<RawRecord>;
    /// Replaces title, notes, container and completion of an existing row.
    fn update(&mut self, record: &RawRecord) -> StoreResult<RawRecord>;
    fn delete(&mut self, id: RecordId) -> StoreResult<()>;

    /// Writes several records; per-record failures do not abort the batch.
    ///
    /// An `Err` means the batch as a whole could not be committed.
    fn update_batch(&mut self, records: &[RawRecord]) -> StoreResult<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        for record in records {
            match self.update(record) {
                Ok(written) => outcome.written.push(written),
                Err(error) => outcome.failures.push(BatchFailure {
                    id: record.id,
                    error,
                }),
            }
        }
        Ok(outcome)
    }
}
