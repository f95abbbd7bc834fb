//! SQLite backend
//!
//! One table per record type with explicit columns; nested values
//! (lists, maps, edits) live in JSON text columns. The connection sits
//! behind a mutex so a backend can be shared between threads.

#![allow(clippy::result_large_err)]

use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_core::errors::{ExError, ExErrorKind};
use strata_core::model::{DataNodeModel, Scope};

use super::Backend;
use crate::db;
use crate::errors::{from_rusqlite, serialization_error, Result};
use crate::migrations::apply_migrations;
use crate::model::StoredModel;

/// Mapping between a record type and its table
pub trait SqlRecord: StoredModel {
    const TABLE: &'static str;

    /// Column names in `to_row` order; the first one is the primary key
    const COLUMNS: &'static [&'static str];

    fn to_row(&self) -> Result<Vec<SqlValue>>;

    fn from_row(row: &Row<'_>) -> Result<Self>;
}

fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<SqlValue> {
    serde_json::to_string(value)
        .map(SqlValue::Text)
        .map_err(|e| serialization_error("encode_column", e))
}

fn from_json_text<T: DeserializeOwned>(row: &Row<'_>, column: &str) -> Result<T> {
    let text: String = row.get(column).map_err(from_rusqlite)?;
    serde_json::from_str(&text).map_err(|e| serialization_error("decode_column", e))
}

fn optional_text(value: &Option<String>) -> SqlValue {
    value.clone().map(SqlValue::Text).unwrap_or(SqlValue::Null)
}

fn optional_integer(value: Option<i64>) -> SqlValue {
    value.map(SqlValue::Integer).unwrap_or(SqlValue::Null)
}

impl SqlRecord for DataNodeModel {
    const TABLE: &'static str = "data_nodes";

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "config_id",
        "scope",
        "storage_type",
        "name",
        "owner_id",
        "parent_ids",
        "last_edit_date",
        "edits",
        "version",
        "validity_days",
        "validity_seconds",
        "edit_in_progress",
        "properties",
        "job_ids",
    ];

    fn to_row(&self) -> Result<Vec<SqlValue>> {
        Ok(vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.config_id.clone()),
            SqlValue::Text(self.scope.as_str().to_string()),
            SqlValue::Text(self.storage_type.clone()),
            optional_text(&self.name),
            optional_text(&self.owner_id),
            to_json_text(&self.parent_ids)?,
            optional_text(&self.last_edit_date),
            to_json_text(&self.edits)?,
            SqlValue::Text(self.version.clone()),
            optional_integer(self.validity_days),
            optional_integer(self.validity_seconds),
            SqlValue::Integer(i64::from(self.edit_in_progress)),
            to_json_text(&self.properties)?,
            match &self.job_ids {
                Some(ids) => to_json_text(ids)?,
                None => SqlValue::Null,
            },
        ])
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        let scope_text: String = row.get("scope").map_err(from_rusqlite)?;
        let scope = Scope::parse(&scope_text).ok_or_else(|| {
            ExError::new(ExErrorKind::Format)
                .with_op("decode_column")
                .with_message(format!("unknown scope '{}'", scope_text))
        })?;
        let job_ids: Option<String> = row.get("job_ids").map_err(from_rusqlite)?;
        let edit_in_progress: i64 = row.get("edit_in_progress").map_err(from_rusqlite)?;

        Ok(DataNodeModel {
            id: row.get("id").map_err(from_rusqlite)?,
            config_id: row.get("config_id").map_err(from_rusqlite)?,
            scope,
            storage_type: row.get("storage_type").map_err(from_rusqlite)?,
            name: row.get("name").map_err(from_rusqlite)?,
            owner_id: row.get("owner_id").map_err(from_rusqlite)?,
            parent_ids: from_json_text(row, "parent_ids")?,
            last_edit_date: row.get("last_edit_date").map_err(from_rusqlite)?,
            edits: from_json_text(row, "edits")?,
            version: row.get("version").map_err(from_rusqlite)?,
            validity_days: row.get("validity_days").map_err(from_rusqlite)?,
            validity_seconds: row.get("validity_seconds").map_err(from_rusqlite)?,
            edit_in_progress: edit_in_progress != 0,
            properties: from_json_text(row, "properties")?,
            job_ids: job_ids
                .map(|text| serde_json::from_str(&text))
                .transpose()
                .map_err(|e| serialization_error("decode_column", e))?,
        })
    }
}

/// SQLite backend over one record type
#[derive(Debug)]
pub struct SqliteBackend<M> {
    conn: Mutex<Connection>,
    upsert_sql: String,
    select_sql: String,
    _model: PhantomData<fn() -> M>,
}

impl<M: SqlRecord> SqliteBackend<M> {
    /// Open (or create) a database file and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Configure `conn` and apply pending migrations
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;

        let columns = M::COLUMNS.join(", ");
        let placeholders = (1..=M::COLUMNS.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let updates = M::COLUMNS[1..]
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect::<Vec<_>>()
            .join(",\n                ");
        let key = M::COLUMNS[0];

        let upsert_sql = format!(
            "INSERT INTO {table} ({columns})
             VALUES ({placeholders})
             ON CONFLICT({key}) DO UPDATE SET
                {updates}",
            table = M::TABLE,
        );
        let select_sql = format!("SELECT {} FROM {}", columns, M::TABLE);

        Ok(Self {
            conn: Mutex::new(conn),
            upsert_sql,
            select_sql,
            _model: PhantomData,
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock()?;
        f(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("sqlite_lock")
                .with_message("connection mutex poisoned")
        })
    }

    fn query_all(conn: &Connection, sql: &str, params: &[&str]) -> Result<Vec<M>> {
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(from_rusqlite)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            records.push(M::from_row(row)?);
        }
        Ok(records)
    }
}

impl<M: SqlRecord> Backend<M> for SqliteBackend<M> {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn put(&self, model: &M) -> Result<()> {
        let values = model.to_row()?;
        self.with_conn(|conn| {
            conn.execute(&self.upsert_sql, params_from_iter(values))
                .map_err(from_rusqlite)?;
            Ok(())
        })
    }

    fn get(&self, id: &str) -> Result<Option<M>> {
        let sql = format!("{} WHERE {} = ?1", self.select_sql, M::COLUMNS[0]);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
            let mut rows = stmt.query([id]).map_err(from_rusqlite)?;
            let row = rows.next().map_err(from_rusqlite)?;
            row.map(M::from_row).transpose()
        })
    }

    /// Checks the key without decoding the row
    fn contains(&self, id: &str) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE {} = ?1", M::TABLE, M::COLUMNS[0]);
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(&sql, [id], |row| row.get(0))
                .optional()
                .map_err(from_rusqlite)?;
            Ok(found.is_some())
        })
    }

    fn scan(&self) -> Result<Vec<M>> {
        let sql = format!("{} ORDER BY {}", self.select_sql, M::COLUMNS[0]);
        self.with_conn(|conn| Self::query_all(conn, &sql, &[]))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", M::TABLE, M::COLUMNS[0]);
        self.with_conn(|conn| {
            let removed = conn.execute(&sql, [id]).map_err(from_rusqlite)?;
            Ok(removed > 0)
        })
    }

    fn delete_all(&self) -> Result<usize> {
        let sql = format!("DELETE FROM {}", M::TABLE);
        self.with_conn(|conn| conn.execute(&sql, []).map_err(from_rusqlite))
    }
}
