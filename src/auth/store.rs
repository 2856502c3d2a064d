//! CSV-backed credential store.
//!
//! Columns: `email,password_hash,recovery_question,recovery_answer_hash`,
//! one row per account. The store is stateless between calls: every read
//! loads the whole file, every mutation rewrites it through a temp file
//! in the same directory followed by an atomic rename, so a crash leaves
//! either the old file or the new one, never a torn row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::auth::error::AuthError;

/// A stored account. Both hash columns hold PHC strings; the question is
/// kept in the clear so it can be shown before the caller proves anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub email: String,
    pub password_hash: String,
    pub recovery_question: String,
    pub recovery_answer_hash: String,
}

/// Credential store rooted at a single CSV file.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store handle for the given file. Nothing is touched on
    /// disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── Load / Save ─────────────────────────────────────────────────

    /// Read every account into a map keyed by email. A missing file is an
    /// empty store. Rows that fail to parse, or that carry an empty email
    /// or hash, are skipped with a warning; the rest still load.
    pub fn load(&self) -> Result<BTreeMap<String, CredentialRecord>, AuthError> {
        let mut accounts = BTreeMap::new();
        if !self.path.exists() {
            return Ok(accounts);
        }

        let file = File::open(&self.path)?;
        let mut reader = csv::Reader::from_reader(file);
        for row in reader.deserialize::<CredentialRecord>() {
            match row {
                Ok(record) if record.email.is_empty() || record.password_hash.is_empty() => {
                    tracing::warn!(
                        path = %self.path.display(),
                        "Skipping credential row with empty email or hash"
                    );
                }
                Ok(record) => {
                    accounts.insert(record.email.clone(), record);
                }
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        "Skipping malformed credential row: {err}"
                    );
                }
            }
        }
        Ok(accounts)
    }

    /// Persist the full account map, replacing the previous file. The
    /// temp file lives in the destination directory so the final rename
    /// cannot cross filesystems.
    pub fn save(&self, accounts: &BTreeMap<String, CredentialRecord>) -> Result<(), AuthError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::Writer::from_writer(&mut tmp);
            for record in accounts.values() {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        tmp.persist(&self.path)
            .map_err(|err| AuthError::Store(err.error))?;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
