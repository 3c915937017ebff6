//! Bootstrap Loader
//!
//! Seeds tables from JSON files at process start.
//!
//! ## Sequence
//! 1. List `*.json` regular files in the data directory (sorted by name)
//! 2. Append the extra seed filenames from the config (relative to the same directory)
//! 3. For each file: parse it and every top-level value, create the table named after it,
//!    upsert every top-level field
//!
//! A file that fails at any step is logged and skipped; startup always continues.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{JsontabError, Result};
use crate::store::{codec, Store};

const SEED_EXTENSION: &str = "json";

/// What a bootstrap run did
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Tables created from seed files
    pub tables_seeded: usize,

    /// Key/value pairs inserted across all tables
    pub entries_inserted: usize,

    /// Seed files that failed and were skipped
    pub files_skipped: usize,
}

/// Run the bootstrap sequence against `store`
pub fn run(store: &Store, config: &Config) -> BootstrapReport {
    tracing::info!("Initiated database setup from {}", config.data_dir.display());

    let mut report = BootstrapReport::default();
    let mut files = match discover_seed_files(&config.data_dir) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(
                "Seed directory {} unusable, skipping scan: {}",
                config.data_dir.display(),
                e
            );
            Vec::new()
        }
    };
    files.extend(config.seed_files.iter().map(|name| config.data_dir.join(name)));

    for path in &files {
        match seed_file(store, path) {
            Ok(inserted) => {
                report.tables_seeded += 1;
                report.entries_inserted += inserted;
            }
            Err(e) => {
                report.files_skipped += 1;
                tracing::warn!("Skipping seed file {}: {}", path.display(), e);
            }
        }
    }

    tracing::info!(
        tables = report.tables_seeded,
        entries = report.entries_inserted,
        skipped = report.files_skipped,
        "End of database setup"
    );
    report
}

/// Derive a table name from a seed filename: "users.json" → "Users"
pub fn table_name_from_file(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };
    let lower = stem.to_lowercase();

    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Regular `*.json` files directly inside `dir`, sorted
fn discover_seed_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            tracing::debug!("Ignoring directory {}", path.display());
            continue;
        }
        let is_seed = path.is_file()
            && path
                .extension()
                .map(|ext| ext == SEED_EXTENSION)
                .unwrap_or(false);
        if is_seed {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Load one seed file into a new table, returning the number of entries inserted
fn seed_file(store: &Store, path: &Path) -> Result<usize> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| JsontabError::Storage(format!("unusable file name: {}", path.display())))?;
    let table = table_name_from_file(file_name);

    let contents = fs::read(path)?;
    let fields = if contents.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(&contents)? {
            Value::Object(fields) => Some(fields),
            _ => {
                return Err(JsontabError::Decode(
                    "seed file is not a JSON object".to_string(),
                ))
            }
        }
    };

    // A value that fails to decode must not leave a half-loaded table behind
    for value in fields.iter().flat_map(|map| map.values()) {
        codec::decode_value(value.clone())?;
    }

    store.create_table(&table)?;

    let mut inserted = 0;
    for (key, value) in fields.into_iter().flatten() {
        store.upsert(&table, &key, value)?;
        inserted += 1;
    }

    tracing::info!("Seeded table {} with {} entries", table, inserted);
    Ok(inserted)
}
