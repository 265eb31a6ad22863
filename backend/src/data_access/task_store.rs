//! Task persistence on redb.
//!
//! One table keyed by the task's UUID bytes, values postcard-encoded.
//! Every mutation is a single write transaction committed before return.

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::{path::Path, sync::Arc};
use thiserror::Error;
use uuid::Uuid;

use crate::{task::Task, update_task_request::UpdateTaskRequest};

const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");

/// Cloneable handle to the store file (Arc inside).
#[derive(Clone)]
pub struct TaskStore {
    db: Arc<Database>,
}

impl TaskStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(TASKS_TABLE)?;
        }
        txn.commit()?;

        Ok(TaskStore { db: Arc::new(db) })
    }

    /// All tasks, newest first.
    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TASKS_TABLE)?;

        let mut tasks = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            tasks.push(decode(value.value())?);
        }

        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(tasks)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TASKS_TABLE)?;

        match table.get(id.as_bytes().as_slice())? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TASKS_TABLE)?;
        Ok(table.len()?)
    }

    /// Title and description must both be non-blank.
    pub fn create(&self, title: String, description: String) -> Result<Task, StoreError> {
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(StoreError::Validation(
                "Title and description are required".to_string(),
            ));
        }

        let task = Task::new(title, description);
        let bytes = encode(&task)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TASKS_TABLE)?;
            table.insert(task.id.as_bytes().as_slice(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(task)
    }

    /// Read-modify-write inside one transaction. Fields are applied as given.
    pub fn update(&self, id: Uuid, request: UpdateTaskRequest) -> Result<Task, StoreError> {
        let txn = self.db.begin_write()?;
        let task = {
            let mut table = txn.open_table(TASKS_TABLE)?;
            let key = id.as_bytes();

            let current = match table.get(key.as_slice())? {
                Some(data) => decode(data.value())?,
                None => return Err(StoreError::NotFound),
            };

            let task = current.edit(request);
            let bytes = encode(&task)?;
            table.insert(key.as_slice(), bytes.as_slice())?;
            task
        };
        txn.commit()?;
        Ok(task)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(TASKS_TABLE)?;
            let result = table.remove(id.as_bytes().as_slice())?;
            result.is_some()
        };
        txn.commit()?;

        if !removed {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn encode(task: &Task) -> Result<Vec<u8>, StoreError> {
    postcard::to_allocvec(task).map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<Task, StoreError> {
    postcard::from_bytes(bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task not found")]
    NotFound,
    #[error("validation: {0}")]
    Validation(String),
    #[error("redb: {0}")]
    Storage(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into StoreError::Storage.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Storage(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

// ── Tests ──────────────────────────────────────────────────────
