//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist raw task rows grouped by container name.
//! - Enforce optimistic revisions on every update.
//!
//! # Invariants
//! - `revision` starts at 1 and grows by exactly 1 per successful update.
//! - Batch updates run in one immediate transaction with a savepoint per
//!   record, so a bad record never rolls back its neighbours.
//! - List order is `updated_at DESC, uuid ASC`.

use crate::model::record::{RawRecord, RecordId};
use crate::store::{
    BatchFailure, BatchOutcome, ContainerFilter, StoreError, StoreResult, TaskStore,
};
use log::{info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    notes,
    container,
    completed,
    updated_at,
    revision
FROM records";

const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

/// Task store over a migrated SQLite connection.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// Fails when the `records` table or one of its columns is missing.
    pub fn try_new(conn: &'conn mut Connection) -> StoreResult<Self> {
        ensure_records_table(conn)?;
        Ok(Self { conn })
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn list(&self, filter: &ContainerFilter) -> StoreResult<Vec<RawRecord>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let ContainerFilter::Only(names) = filter {
            if names.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["container = ? COLLATE NOCASE"; names.len()].join(" OR ");
            sql.push_str(&format!(" AND ({placeholders})"));
            bind_values.extend(names.iter().map(|name| Value::Text(name.trim().to_string())));
        }

        sql.push_str(" ORDER BY updated_at DESC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<RawRecord>> {
        read_record(self.conn, id)
    }

    fn create(&mut self, record: &RawRecord, container: &str) -> StoreResult<RawRecord> {
        let container = container.trim();
        if container.is_empty() {
            return Err(StoreError::InvalidData(
                "container name must not be blank".to_string(),
            ));
        }

        self.conn.execute(
            &format!(
                "INSERT INTO records (uuid, title, notes, container, completed, revision, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, {NOW_MS_SQL}, {NOW_MS_SQL});"
            ),
            params![
                record.id.to_string(),
                record.title.as_str(),
                record.notes.as_str(),
                container,
                bool_to_int(record.completed),
            ],
        )?;

        read_record(self.conn, record.id)?.ok_or_else(|| {
            StoreError::InvalidData(format!(
                "created record {} missing on read-back",
                record.id
            ))
        })
    }

    fn update(&mut self, record: &RawRecord) -> StoreResult<RawRecord> {
        update_record(self.conn, record)?;
        read_record(self.conn, record.id)?.ok_or(StoreError::NotFound(record.id))
    }

    fn delete(&mut self, id: RecordId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn update_batch(&mut self, records: &[RawRecord]) -> StoreResult<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        if records.is_empty() {
            return Ok(outcome);
        }

        let mut tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for record in records {
            let updated = {
                let savepoint = tx.savepoint()?;
                let result = update_record(&savepoint, record);
                if result.is_ok() {
                    savepoint.commit()?;
                }
                result
            };
            if let Err(error) = updated {
                warn!(
                    "event=store_batch_item module=store status=error record_id={} error={}",
                    record.id, error
                );
                outcome.failures.push(BatchFailure {
                    id: record.id,
                    error,
                });
                continue;
            }
            match read_record(&tx, record.id)? {
                Some(written) => outcome.written.push(written),
                None => outcome.failures.push(BatchFailure {
                    id: record.id,
                    error: StoreError::NotFound(record.id),
                }),
            }
        }
        tx.commit()?;

        info!(
            "event=store_batch module=store status=ok written={} failed={}",
            outcome.written.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }
}

fn update_record(conn: &Connection, record: &RawRecord) -> StoreResult<()> {
    let changed = conn.execute(
        &format!(
            "UPDATE records
             SET
                title = ?2,
                notes = ?3,
                container = ?4,
                completed = ?5,
                revision = revision + 1,
                updated_at = {NOW_MS_SQL}
             WHERE uuid = ?1
               AND revision = ?6;"
        ),
        params![
            record.id.to_string(),
            record.title.as_str(),
            record.notes.as_str(),
            record.container.as_str(),
            bool_to_int(record.completed),
            record.revision,
        ],
    )?;

    if changed == 1 {
        return Ok(());
    }

    match current_revision(conn, record.id)? {
        Some(actual_revision) => Err(StoreError::Conflict {
            id: record.id,
            expected_revision: record.revision,
            actual_revision,
        }),
        None => Err(StoreError::NotFound(record.id)),
    }
}

fn read_record(conn: &Connection, id: RecordId) -> StoreResult<Option<RawRecord>> {
    let mut stmt = conn.prepare(&format!("{RECORD_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_record_row(row)?));
    }
    Ok(None)
}

fn current_revision(conn: &Connection, id: RecordId) -> StoreResult<Option<i64>> {
    let mut stmt = conn.prepare("SELECT revision FROM records WHERE uuid = ?1;")?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}

fn parse_record_row(row: &Row<'_>) -> StoreResult<RawRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in records.uuid"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in records.completed"
            )));
        }
    };

    Ok(RawRecord {
        id,
        title: row.get("title")?,
        notes: row.get("notes")?,
        container: row.get("container")?,
        completed,
        last_modified_ms: row.get("updated_at")?,
        revision: row.get("revision")?,
    })
}

fn ensure_records_table(conn: &Connection) -> StoreResult<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(records);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }

    if columns.is_empty() {
        return Err(StoreError::InvalidData(
            "missing required table `records`; open the database with open_db first".to_string(),
        ));
    }
    for required in [
        "uuid",
        "title",
        "notes",
        "container",
        "completed",
        "updated_at",
        "revision",
    ] {
        if !columns.iter().any(|column| column == required) {
            return Err(StoreError::InvalidData(format!(
                "missing required column `records.{required}`"
            )));
        }
    }
    Ok(())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
