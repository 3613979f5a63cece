//! Store synchronization use-case service.
//!
//! # Responsibility
//! - Fetch raw records, classify and normalize them, and write back only the
//!   records whose canonical notes differ from the stored notes.
//! - Own the in-memory working set of classified records.
//! - Apply quadrant, delegate, time-period and text edits, then reload.
//!
//! # Invariants
//! - Unassigned records and delegate-directory items never enter the
//!   working set.
//! - Every successful mutation is followed by a full `refresh()`.
//! - A failed store call leaves the working set untouched.
//! - Mutations take `&mut self`; one coordinator serializes its writers, and
//!   stale record copies are rejected by the store's revision check.

use crate::config::SyncConfig;
use crate::model::delegate::Delegate;
use crate::model::quadrant::{Quadrant, TimePeriod};
use crate::model::record::{RawRecord, Record, RecordId};
use crate::service::delegate_directory::{list_delegates, DelegateDirectory};
use crate::store::{BatchFailure, BatchOutcome, ContainerFilter, StoreError, TaskStore};
use crate::tags::classify::classify_record;
use crate::tags::normalize::{
    assign_delegate, move_to_quadrant, normalize, remove_time_period, set_time_period,
    toggle_time_period,
};
use log::{error, info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failure of a store-facing coordinator operation.
#[derive(Debug)]
pub enum SyncError {
    /// Caller input rejected before touching the store.
    InvalidInput(String),
    Store(StoreError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Store(err) => write!(f, "task store error: {err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Counters and per-record failures of one `refresh()`.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub fetched: usize,
    /// Records that entered the working set.
    pub classified: usize,
    pub unassigned: usize,
    pub written: usize,
    pub unchanged: usize,
    /// Write-back failures; the affected records keep their previous
    /// revision and are retried on the next refresh.
    pub failures: Vec<BatchFailure>,
}

/// Request for `SyncCoordinator::create_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub notes: String,
    pub quadrant: Quadrant,
    /// Extra markers, `#` optional.
    pub tags: Vec<String>,
    /// Overrides `SyncConfig::default_container`.
    pub container: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, quadrant: Quadrant) -> Self {
        Self {
            title: title.into(),
            notes: String::new(),
            quadrant,
            tags: Vec::new(),
            container: None,
        }
    }
}

/// Classifies and normalizes raw rows; unassigned rows are dropped.
pub fn classify_and_normalize_all<'a, I>(records: I) -> Vec<Record>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    records
        .into_iter()
        .filter_map(|raw| {
            classify_record(raw).map(|quadrant| normalize(&Record::from_raw(raw, Some(quadrant))))
        })
        .collect()
}

/// Orchestrates the external store and the classified working set.
pub struct SyncCoordinator<S: TaskStore> {
    store: S,
    config: SyncConfig,
    records: Vec<Record>,
}

impl<S: TaskStore> SyncCoordinator<S> {
    /// Creates a coordinator with an empty working set; call `refresh()`.
    pub fn new(store: S, config: SyncConfig) -> Self {
        Self {
            store,
            config,
            records: Vec::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classified records from the last successful refresh.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Reloads the working set from the store and writes back canonical
    /// notes where they changed.
    pub fn refresh(&mut self) -> SyncResult<RefreshReport> {
        let started_at = Instant::now();
        let raw = self.store.list(&ContainerFilter::All).map_err(|err| {
            error!(
                "event=sync_refresh module=sync status=error stage=list error={}",
                err
            );
            err
        })?;

        let delegates_container = self.config.delegates_container.trim();
        let candidates: Vec<&RawRecord> = raw
            .iter()
            .filter(|record| !record.container.trim().eq_ignore_ascii_case(delegates_container))
            .collect();
        let stored_notes: HashMap<RecordId, &str> = candidates
            .iter()
            .map(|record| (record.id, record.notes.as_str()))
            .collect();

        let mut normalized = classify_and_normalize_all(candidates.iter().copied());
        let pending: Vec<RawRecord> = normalized
            .iter()
            .filter(|record| stored_notes.get(&record.id) != Some(&record.notes.as_str()))
            .map(Record::to_raw)
            .collect();

        let outcome = if pending.is_empty() {
            BatchOutcome::default()
        } else {
            self.store.update_batch(&pending).map_err(|err| {
                error!(
                    "event=sync_refresh module=sync status=error stage=write_back pending={} error={}",
                    pending.len(),
                    err
                );
                err
            })?
        };

        for written in &outcome.written {
            if let Some(record) = normalized.iter_mut().find(|record| record.id == written.id) {
                record.revision = written.revision;
                record.last_modified_ms = written.last_modified_ms;
            }
        }
        for failure in &outcome.failures {
            warn!(
                "event=sync_write_back module=sync status=error record_id={} error={}",
                failure.id, failure.error
            );
        }

        let report = RefreshReport {
            fetched: raw.len(),
            classified: normalized.len(),
            unassigned: candidates.len() - normalized.len(),
            written: outcome.written.len(),
            unchanged: normalized.len() - pending.len(),
            failures: outcome.failures,
        };
        self.records = normalized;

        info!(
            "event=sync_refresh module=sync status=ok duration_ms={} fetched={} classified={} unassigned={} written={} failed={}",
            started_at.elapsed().as_millis(),
            report.fetched,
            report.classified,
            report.unassigned,
            report.written,
            report.failures.len()
        );
        Ok(report)
    }

    /// Normalizes and stores `record` as given.
    pub fn write(&mut self, record: &Record) -> SyncResult<Option<Record>> {
        self.persist("write", normalize(record))
    }

    /// Reassigns the quadrant; old quadrant markers are dropped from notes.
    pub fn move_record(&mut self, record: &Record, quadrant: Quadrant) -> SyncResult<Option<Record>> {
        self.persist("move", move_to_quadrant(record, quadrant))
    }

    /// Replaces any directory delegate marker with `delegate`'s, or clears it.
    pub fn set_delegate(
        &mut self,
        record: &Record,
        delegate: Option<&Delegate>,
    ) -> SyncResult<Option<Record>> {
        let directory = list_delegates(&self.store, &self.config.delegates_container)?;
        self.persist("set_delegate", assign_delegate(record, &directory, delegate))
    }

    pub fn set_time_period(
        &mut self,
        record: &Record,
        period: TimePeriod,
    ) -> SyncResult<Option<Record>> {
        self.persist("set_time_period", set_time_period(record, period))
    }

    pub fn remove_time_period(&mut self, record: &Record) -> SyncResult<Option<Record>> {
        self.persist("remove_time_period", remove_time_period(record))
    }

    pub fn toggle_time_period(
        &mut self,
        record: &Record,
        period: TimePeriod,
    ) -> SyncResult<Option<Record>> {
        self.persist("toggle_time_period", toggle_time_period(record, period))
    }

    /// Replaces title and/or notes; the record keeps its quadrant and tags.
    pub fn update_text(
        &mut self,
        record: &Record,
        title: Option<&str>,
        notes: Option<&str>,
    ) -> SyncResult<Option<Record>> {
        let mut next = record.clone();
        if let Some(title) = title {
            if title.trim().is_empty() {
                return Err(SyncError::InvalidInput("title must not be blank".to_string()));
            }
            next.title = title.trim().to_string();
        }
        if let Some(notes) = notes {
            next.notes = notes.to_string();
        }
        self.persist("update_text", normalize(&next))
    }

    pub fn toggle_completed(&mut self, record: &Record) -> SyncResult<Option<Record>> {
        let mut next = record.clone();
        next.completed = !next.completed;
        self.persist("toggle_completed", normalize(&next))
    }

    /// Creates a classified task in its container and reloads.
    pub fn create_task(&mut self, task: NewTask) -> SyncResult<Option<Record>> {
        let title = task.title.trim();
        if title.is_empty() {
            return Err(SyncError::InvalidInput(
                "task title must not be blank".to_string(),
            ));
        }
        let container = task
            .container
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.config.default_container.as_str())
            .to_string();

        let raw = RawRecord::new(title, task.notes.as_str(), container.as_str());
        let mut record = Record::from_raw(&raw, Some(task.quadrant));
        record.structured_tags.extend(task.tags);
        let record = normalize(&record);

        let stored = self
            .store
            .create(&record.to_raw(), &container)
            .map_err(|err| {
                error!(
                    "event=record_create module=sync status=error record_id={} error={}",
                    record.id, err
                );
                err
            })?;
        info!(
            "event=record_create module=sync status=ok record_id={} quadrant={:?}",
            stored.id, task.quadrant
        );
        self.refresh()?;
        Ok(self.record(stored.id).cloned())
    }

    pub fn delete(&mut self, record: &Record) -> SyncResult<()> {
        self.store.delete(record.id).map_err(|err| {
            error!(
                "event=record_delete module=sync status=error record_id={} error={}",
                record.id, err
            );
            err
        })?;
        info!(
            "event=record_delete module=sync status=ok record_id={}",
            record.id
        );
        self.refresh()?;
        Ok(())
    }

    pub fn records_in_quadrant(&self, quadrant: Quadrant) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| record.quadrant == Some(quadrant))
            .collect()
    }

    /// Incomplete records planned for `period`.
    pub fn records_for_period(&self, period: TimePeriod) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| !record.completed)
            .filter(|record| {
                record
                    .time_periods()
                    .into_iter()
                    .any(|tagged| period.covers(tagged))
            })
            .collect()
    }

    /// Incomplete records untouched for longer than the configured age.
    pub fn stale_records(&self, now_ms: i64) -> Vec<&Record> {
        let cutoff = now_ms - self.config.stale_after_ms();
        self.records
            .iter()
            .filter(|record| !record.completed && record.last_modified_ms < cutoff)
            .collect()
    }

    pub fn delegates(&self) -> SyncResult<Vec<Delegate>> {
        Ok(list_delegates(&self.store, &self.config.delegates_container)?)
    }

    /// Editable delegate directory backed by this coordinator's store.
    pub fn delegate_directory(&mut self) -> DelegateDirectory<'_, S> {
        DelegateDirectory::new(&mut self.store, &self.config.delegates_container)
    }

    fn persist(&mut self, operation: &'static str, next: Record) -> SyncResult<Option<Record>> {
        let started_at = Instant::now();
        self.store.update(&next.to_raw()).map_err(|err| {
            error!(
                "event=record_write module=sync status=error op={} record_id={} error={}",
                operation, next.id, err
            );
            err
        })?;
        self.refresh()?;
        info!(
            "event=record_write module=sync status=ok op={} record_id={} duration_ms={}",
            operation,
            next.id,
            started_at.elapsed().as_millis()
        );
        Ok(self.record(next.id).cloned())
    }
}
