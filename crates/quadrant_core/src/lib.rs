//! Core domain logic for hashtag-driven Eisenhower task triage.
//! This crate is the single source of truth for classification and
//! notes normalization rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod tags;

pub use config::{ConfigError, SyncConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{
    default_log_level, flush_logs, init_logging, logging_status, LogSettings, LoggingError,
};
pub use model::delegate::Delegate;
pub use model::quadrant::{Quadrant, TimePeriod};
pub use model::record::{RawRecord, Record, RecordId};
pub use service::delegate_directory::{DelegateDirectory, DelegateError, DelegateResult};
pub use service::sync_coordinator::{
    classify_and_normalize_all, NewTask, RefreshReport, SyncCoordinator, SyncError, SyncResult,
};
pub use store::{
    BatchFailure, BatchOutcome, ContainerFilter, SqliteTaskStore, StoreError, StoreResult,
    TaskStore,
};
pub use tags::classify::{classify, classify_record, time_period_of};
pub use tags::extract::{canonicalize_markers, extract_markers};
pub use tags::normalize::normalize;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
