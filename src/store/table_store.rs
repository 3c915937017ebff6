//! Table Store
//!
//! Durable CRUD over named tables and their keyed documents.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{JsontabError, Result};

use super::codec::{self, Documents};
use super::Operator;

/// Selector meaning "every key in the table"
pub const ALL_KEYS: &str = "*";

/// The document store
///
/// ## Concurrency: one process-wide RwLock
///
/// - `tables` is the only lock. It guards the registry *and* every file access.
/// - Reads (`get`, `get_filtered`, `last_index`) hold it in shared mode.
/// - Mutations (`create_table`, `upsert`, `update`, `delete_key`, `delete_table`)
///   hold it exclusively, so writes to different tables are serialized too.
/// - A reader never sees a half-written file because no writer runs alongside it.
pub struct Store {
    /// Directory holding one `{Name}.json` per table
    data_dir: PathBuf,

    /// Registry: table name → backing file
    tables: RwLock<HashMap<String, PathBuf>>,
}

impl Store {
    const FILE_EXTENSION: &'static str = "json";

    /// Open a store rooted at `data_dir`, creating the directory if needed.
    ///
    /// The registry starts empty; tables come from `create_table` or bootstrap.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            data_dir,
            tables: RwLock::new(HashMap::new()),
        })
    }

    // =========================================================================
    // Table Lifecycle
    // =========================================================================

    /// Register a new table and make sure its backing file exists.
    ///
    /// An existing file is kept as-is (not truncated), so a file left over from a
    /// previous run keeps its documents.
    pub fn create_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();

        if tables.contains_key(name) {
            return Err(JsontabError::TableAlreadyExists(name.to_string()));
        }

        let path = self.file_path_for(name)?;
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                JsontabError::Storage(format!("cannot create {}: {}", path.display(), e))
            })?;

        tracing::debug!(table = name, path = %path.display(), "table created");
        tables.insert(name.to_string(), path);
        Ok(())
    }

    /// Remove a table's backing file and its registry entry
    pub fn delete_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();

        let path = tables
            .get(name)
            .cloned()
            .ok_or_else(|| JsontabError::TableNotFound(name.to_string()))?;

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(table = name, "backing file already gone");
            }
            Err(e) => {
                return Err(JsontabError::Storage(format!(
                    "cannot remove {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tables.remove(name);
        tracing::debug!(table = name, "table deleted");
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert or overwrite `key`.
    ///
    /// A string value that looks like JSON is parsed first; see [`codec::decode_value`].
    pub fn upsert(&self, table: &str, key: &str, value: Value) -> Result<()> {
        let tables = self.tables.write();
        let path = Self::lookup(&tables, table)?;

        let mut documents = codec::load_or_empty(path)?;
        let value = codec::decode_value(value)?;
        documents.insert(key.to_string(), value);

        codec::store(path, &documents)
    }

    /// Update one field of the document at `key`.
    ///
    /// With a string `value`, double quotes are stripped and the text replaces `field`
    /// only when the document is an object that already has that field. Any other
    /// `value` replaces the whole document. A missing `key` is a no-op, but the file is
    /// still rewritten.
    pub fn update(&self, table: &str, key: &str, field: &str, value: Value) -> Result<()> {
        let tables = self.tables.write();
        let path = Self::lookup(&tables, table)?;

        let mut documents =
            codec::load(path)?.ok_or_else(|| JsontabError::EmptyTable(table.to_string()))?;

        match value {
            Value::String(text) => {
                let cleaned = text.replace('"', "");
                let target = documents
                    .get_mut(key)
                    .and_then(Value::as_object_mut)
                    .and_then(|fields| fields.get_mut(field));
                match target {
                    Some(slot) => *slot = Value::String(cleaned),
                    None => tracing::debug!(table, key, field, "update target missing, no-op"),
                }
            }
            other => {
                documents.insert(key.to_string(), other);
            }
        }

        codec::store(path, &documents)
    }

    /// Remove `key` from a table. Deleting the last key leaves an empty table.
    pub fn delete_key(&self, table: &str, key: &str) -> Result<()> {
        let tables = self.tables.write();
        let path = Self::lookup(&tables, table)?;

        let mut documents =
            codec::load(path)?.ok_or_else(|| JsontabError::EmptyTable(table.to_string()))?;
        documents.remove(key);

        codec::store(path, &documents)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Point select. `"*"` returns every entry.
    ///
    /// An empty result is `KeyNotFound`, including on a table with no documents.
    pub fn get(&self, table: &str, key: &str) -> Result<Documents> {
        let tables = self.tables.read();
        let path = Self::lookup(&tables, table)?;

        let documents = codec::load_or_empty(path)?;
        let result = if key == ALL_KEYS {
            documents
        } else {
            documents
                .into_iter()
                .filter(|(k, _)| k == key)
                .collect()
        };

        if result.is_empty() {
            return Err(JsontabError::KeyNotFound(key.to_string()));
        }
        Ok(result)
    }

    /// Filtered select: candidates (all, or just `key`) whose `field` satisfies
    /// `field OP query` under string ordering.
    ///
    /// Unlike [`Store::get`], an unknown table is `KeyNotFound` (the selector is
    /// undefined) and no matches is an empty map rather than an error.
    pub fn get_filtered(
        &self,
        table: &str,
        key: &str,
        field: &str,
        op: Operator,
        query: &str,
    ) -> Result<Documents> {
        let tables = self.tables.read();
        let path = tables
            .get(table)
            .ok_or_else(|| JsontabError::KeyNotFound(key.to_string()))?;

        let documents = codec::load_or_empty(path)?;
        Ok(documents
            .into_iter()
            .filter(|(k, _)| key == ALL_KEYS || k == key)
            .filter(|(_, doc)| op.matches_document(doc, field, query))
            .collect())
    }

    /// Largest key under byte-wise string ordering, so `"9"` beats `"10"`.
    pub fn last_index(&self, table: &str) -> Result<String> {
        let tables = self.tables.read();
        let path = Self::lookup(&tables, table)?;

        let documents =
            codec::load(path)?.ok_or_else(|| JsontabError::EmptyTable(table.to_string()))?;

        documents
            .keys()
            .max()
            .cloned()
            .ok_or_else(|| JsontabError::EmptyTable(table.to_string()))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Registered table names, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether `name` is registered
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Backing file of a registered table
    pub fn table_path(&self, name: &str) -> Option<PathBuf> {
        self.tables.read().get(name).cloned()
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn lookup<'a>(tables: &'a HashMap<String, PathBuf>, name: &str) -> Result<&'a Path> {
        tables
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| JsontabError::TableNotFound(name.to_string()))
    }

    /// "Users" → "{data_dir}/Users.json"
    fn file_path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(JsontabError::Storage(format!("invalid table name: {:?}", name)));
        }
        Ok(self
            .data_dir
            .join(format!("{}.{}", name, Self::FILE_EXTENSION)))
    }
}
