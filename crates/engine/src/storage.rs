// PDFBug - Operator List Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Session-scoped key/value storage.
//!
//! Breakpoints survive reloads of the same debugging session but not across
//! sessions. Two backends are provided:
//! - [`MemoryStorage`]: process-local, shared between clones
//! - [`SessionStorage`]: one JSON file per key under a per-session directory

use std::{
    collections::HashMap,
    env,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use eyre::{Context, Result};
use parking_lot::Mutex;
use tracing::trace;

/// A string key/value store.
pub trait BreakpointStorage: Debug + Send + Sync {
    /// Reads the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BreakpointStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage scoped to a named session.
///
/// Items live in `<root>/<session>/<key>.json`. The default root is under the
/// system temp directory, so sessions do not outlive the machine's temp files.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Opens (and creates) the directory of `session` under `root`.
    pub fn new(root: Option<impl Into<PathBuf>>, session: &str) -> Result<Self> {
        let root = root.map(Into::into).unwrap_or_else(Self::default_root);
        let dir = root.join(sanitize(session));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Default storage root: `<temp>/pdfbug-sessions`.
    pub fn default_root() -> PathBuf {
        env::temp_dir().join("pdfbug-sessions")
    }

    /// The session directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(key)))
    }
}

impl BreakpointStorage for SessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.item_path(key);
        trace!("loading session item: {:?}", path);
        fs::read_to_string(path).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key);
        trace!("saving session item: {:?}", path);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write session item: {}", path.display()))
    }
}

/// Keeps only characters that are safe in a file name.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set_item("slot", "value").unwrap();
        assert_eq!(other.get_item("slot").as_deref(), Some("value"));
        assert_eq!(other.get_item("missing"), None);
    }

    #[test]
    fn test_session_storage_roundtrip() {
        let root = tempfile::tempdir().unwrap();
        let storage = SessionStorage::new(Some(root.path()), "my session").unwrap();

        assert!(storage.dir().ends_with("my_session"));
        assert_eq!(storage.get_item("pdfbugBreakPoints"), None);

        storage.set_item("pdfbugBreakPoints", r#"{"0":[1]}"#).unwrap();
        assert_eq!(storage.get_item("pdfbugBreakPoints").as_deref(), Some(r#"{"0":[1]}"#));

        // A second handle on the same session sees the item
        let reopened = SessionStorage::new(Some(root.path()), "my session").unwrap();
        assert_eq!(reopened.get_item("pdfbugBreakPoints").as_deref(), Some(r#"{"0":[1]}"#));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("../etc"), "___etc");
        assert_eq!(sanitize(""), "default");
        assert_eq!(sanitize("page-1_ok"), "page-1_ok");
    }
}
