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

//! Persistent per-page breakpoint sets.

use std::sync::Arc;

use pdfbug_common::types::BreakpointSet;
use tracing::{debug, warn};

use crate::storage::{BreakpointStorage, MemoryStorage};

/// Storage slot holding the serialized breakpoint mapping.
pub const BREAKPOINTS_STORAGE_KEY: &str = "pdfbugBreakPoints";

/// Breakpoints of every page, written through to a [`BreakpointStorage`].
///
/// Every mutation persists the whole mapping. Storage failures are logged
/// and otherwise ignored.
#[derive(Debug, Clone)]
pub struct BreakpointStore {
    breakpoints: BreakpointSet,
    storage: Arc<dyn BreakpointStorage>,
}

impl Default for BreakpointStore {
    fn default() -> Self {
        Self { breakpoints: BreakpointSet::new(), storage: Arc::new(MemoryStorage::new()) }
    }
}

impl BreakpointStore {
    /// Reconstructs the mapping from `storage`.
    ///
    /// Absent or unreadable data yields an empty mapping.
    pub fn load(storage: Arc<dyn BreakpointStorage>) -> Self {
        let breakpoints = match storage.get_item(BREAKPOINTS_STORAGE_KEY) {
            None => BreakpointSet::new(),
            Some(json) => BreakpointSet::from_json(&json).unwrap_or_else(|e| {
                warn!("Ignoring corrupt breakpoint storage: {}", e);
                BreakpointSet::new()
            }),
        };
        debug!("Loaded breakpoints for {} page(s)", breakpoints.pages().count());
        Self { breakpoints, storage }
    }

    /// The in-memory mapping.
    pub fn breakpoints(&self) -> &BreakpointSet {
        &self.breakpoints
    }

    /// Breakpoints of `page`, ascending.
    pub fn get(&self, page: usize) -> &[usize] {
        self.breakpoints.get(page)
    }

    /// Overwrites the breakpoints of `page` and persists the whole mapping.
    pub fn save(&mut self, page: usize, indices: &[usize]) {
        self.breakpoints.set(page, indices.iter().copied());
        self.persist();
    }

    /// Adds or removes a single breakpoint. Returns whether anything changed.
    ///
    /// Adding a present index or removing an absent one is a no-op and does
    /// not touch storage.
    pub fn toggle(&mut self, page: usize, index: usize, enabled: bool) -> bool {
        let changed = if enabled {
            self.breakpoints.insert(page, index)
        } else {
            self.breakpoints.remove(page, index)
        };
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        let json = match self.breakpoints.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize breakpoints: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(BREAKPOINTS_STORAGE_KEY, &json) {
            warn!("Failed to persist breakpoints: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(storage: &MemoryStorage) -> Option<String> {
        storage.get_item(BREAKPOINTS_STORAGE_KEY)
    }

    #[test]
    fn test_load_absent_is_empty() {
        let store = BreakpointStore::load(Arc::new(MemoryStorage::new()));
        assert!(store.breakpoints().is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(BREAKPOINTS_STORAGE_KEY, "{ definitely not json").unwrap();

        let store = BreakpointStore::load(Arc::new(storage));
        assert!(store.breakpoints().is_empty());
    }

    #[test]
    fn test_save_persists_entire_mapping() {
        let storage = MemoryStorage::new();
        let mut store = BreakpointStore::load(Arc::new(storage.clone()));

        store.save(0, &[4, 2]);
        store.save(3, &[1]);

        assert_eq!(stored(&storage).as_deref(), Some(r#"{"0":[2,4],"3":[1]}"#));

        let reloaded = BreakpointStore::load(Arc::new(storage));
        assert_eq!(reloaded.get(0), &[2, 4]);
        assert_eq!(reloaded.get(3), &[1]);
    }

    #[test]
    fn test_toggle_on_then_off_roundtrips() {
        let storage = MemoryStorage::new();
        let mut store = BreakpointStore::load(Arc::new(storage.clone()));
        store.save(1, &[7]);
        let before = stored(&storage);

        assert!(store.toggle(1, 3, true));
        assert_eq!(store.get(1), &[3, 7]);
        assert!(store.toggle(1, 3, false));

        assert_eq!(stored(&storage), before);
        assert_eq!(store.get(1), &[7]);
    }

    #[test]
    fn test_toggle_noop_cases() {
        let storage = MemoryStorage::new();
        let mut store = BreakpointStore::load(Arc::new(storage.clone()));

        assert!(!store.toggle(0, 5, false));
        assert_eq!(stored(&storage), None);

        assert!(store.toggle(0, 5, true));
        assert!(!store.toggle(0, 5, true));
        assert_eq!(store.get(0), &[5]);
    }
}
