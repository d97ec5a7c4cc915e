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

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use eyre::{eyre, Error, Result};
use serde::{Deserialize, Serialize};

/// Sorts `indices` ascending and removes duplicates.
pub fn normalize_indices(indices: &mut Vec<usize>) {
    indices.sort_unstable();
    indices.dedup();
}

/// Inserts `index` into an ascending, deduplicated list. Returns whether it was absent.
pub fn insert_sorted(indices: &mut Vec<usize>, index: usize) -> bool {
    match indices.binary_search(&index) {
        Ok(_) => false,
        Err(pos) => {
            indices.insert(pos, index);
            true
        }
    }
}

/// Removes `index` from an ascending, deduplicated list. Returns whether it was present.
pub fn remove_sorted(indices: &mut Vec<usize>, index: usize) -> bool {
    match indices.binary_search(&index) {
        Ok(pos) => {
            indices.remove(pos);
            true
        }
        Err(_) => false,
    }
}

/// Breakpoints of every page, keyed by page index.
///
/// Each page holds an ascending, deduplicated list of operation indices.
/// Pages without breakpoints are absent from the mapping. Serializes as
/// `{ "<page>": [indices...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakpointSet {
    pages: BTreeMap<usize, Vec<usize>>,
}

impl BreakpointSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the persisted JSON form, normalizing every page's list.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut set: Self = serde_json::from_str(json)?;
        set.pages.retain(|_, indices| {
            normalize_indices(indices);
            !indices.is_empty()
        });
        Ok(set)
    }

    /// Serializes to the persisted JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Breakpoints of `page`, ascending.
    pub fn get(&self, page: usize) -> &[usize] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or_default()
    }

    /// Replaces the breakpoints of `page`.
    pub fn set(&mut self, page: usize, indices: impl IntoIterator<Item = usize>) {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        normalize_indices(&mut indices);
        if indices.is_empty() {
            self.pages.remove(&page);
        } else {
            self.pages.insert(page, indices);
        }
    }

    /// Adds a breakpoint. Returns whether the set changed.
    pub fn insert(&mut self, page: usize, index: usize) -> bool {
        insert_sorted(self.pages.entry(page).or_default(), index)
    }

    /// Removes a breakpoint. Returns whether the set changed.
    pub fn remove(&mut self, page: usize, index: usize) -> bool {
        let Some(indices) = self.pages.get_mut(&page) else {
            return false;
        };
        let removed = remove_sorted(indices, index);
        if indices.is_empty() {
            self.pages.remove(&page);
        }
        removed
    }

    /// Whether `page` has a breakpoint at `index`.
    pub fn contains(&self, page: usize, index: usize) -> bool {
        self.get(page).binary_search(&index).is_ok()
    }

    /// Pages that have at least one breakpoint.
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.keys().copied()
    }

    /// Whether no page has breakpoints.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A breakpoint location as typed on the command line: `<page>:<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BreakpointLocation {
    /// Zero-based page index.
    pub page_index: usize,
    /// Zero-based operation index within the page's operator list.
    pub op_index: usize,
}

impl FromStr for BreakpointLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (page, op) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| eyre!("Invalid breakpoint location {s:?}. Expected <page>:<index>"))?;
        let page_index = page.parse().map_err(|e| eyre!("Invalid page index {page:?}: {e}"))?;
        let op_index = op.parse().map_err(|e| eyre!("Invalid operation index {op:?}: {e}"))?;
        Ok(Self { page_index, op_index })
    }
}

impl Display for BreakpointLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.page_index, self.op_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_roundtrip_json() {
        let mut set = BreakpointSet::new();
        set.set(0, [5, 1, 5, 3]);
        set.insert(2, 7);

        let json = set.to_json().unwrap();
        assert_eq!(json, r#"{"0":[1,3,5],"2":[7]}"#);
        assert_eq!(BreakpointSet::from_json(&json).unwrap(), set);
    }

    #[test]
    fn test_from_json_normalizes() {
        let set = BreakpointSet::from_json(r#"{"1":[9,2,2],"4":[]}"#).unwrap();

        assert_eq!(set.get(1), &[2, 9]);
        assert!(set.get(4).is_empty());
        assert_eq!(set.pages().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(BreakpointSet::from_json("not json").is_err());
        assert!(BreakpointSet::from_json(r#"{"x":[1]}"#).is_err());
        assert!(BreakpointSet::from_json(r#"{"0":[-1]}"#).is_err());
    }

    #[test]
    fn test_insert_remove_drop_empty_pages() {
        let mut set = BreakpointSet::new();
        assert!(set.insert(3, 10));
        assert!(!set.insert(3, 10));
        assert!(set.contains(3, 10));

        assert!(set.remove(3, 10));
        assert!(!set.remove(3, 10));
        assert!(set.is_empty());
    }

    #[test]
    fn test_breakpoint_location_from_str() {
        let loc: BreakpointLocation = "2:41".parse().unwrap();
        assert_eq!(loc, BreakpointLocation { page_index: 2, op_index: 41 });
        assert_eq!(loc.to_string(), "2:41");

        assert!("2".parse::<BreakpointLocation>().is_err());
        assert!("a:1".parse::<BreakpointLocation>().is_err());
        assert!("1:-3".parse::<BreakpointLocation>().is_err());
    }
}
