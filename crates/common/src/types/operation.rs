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

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single drawing operation recorded by the host renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Raw operation code, see [`crate::OpcodeTable`].
    #[serde(rename = "fn")]
    pub opcode: u32,
    /// Operation arguments as produced by the renderer.
    #[serde(default)]
    pub args: Vec<Value>,
}

impl OperationRecord {
    /// Creates a new operation record.
    pub fn new(opcode: u32, args: Vec<Value>) -> Self {
        Self { opcode, args }
    }
}

/// The ordered, append-only sequence of operations of one page.
///
/// The renderer may still be producing the list while the debugger displays
/// it, so consumers only ever look at suffixes they have not seen yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorList {
    ops: Vec<OperationRecord>,
}

impl OperatorList {
    /// Creates an empty operator list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from the renderer's parallel `fnArray`/`argsArray` form.
    ///
    /// Missing or null argument entries become empty argument lists.
    pub fn from_raw(fn_array: &[u32], args_array: &[Option<Vec<Value>>]) -> Self {
        let ops = fn_array
            .iter()
            .enumerate()
            .map(|(i, &opcode)| {
                let args = args_array.get(i).cloned().flatten().unwrap_or_default();
                OperationRecord { opcode, args }
            })
            .collect();
        Self { ops }
    }

    /// Appends an operation.
    pub fn push(&mut self, record: OperationRecord) {
        self.ops.push(record);
    }

    /// Appends all operations of `records`.
    pub fn extend_from_slice(&mut self, records: &[OperationRecord]) {
        self.ops.extend_from_slice(records);
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the list holds no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operation at `index`.
    pub fn get(&self, index: usize) -> Option<&OperationRecord> {
        self.ops.get(index)
    }

    /// All operations as a slice.
    pub fn as_slice(&self) -> &[OperationRecord] {
        &self.ops
    }

    /// Iterates over the operations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, OperationRecord> {
        self.ops.iter()
    }
}

impl FromIterator<OperationRecord> for OperatorList {
    fn from_iter<T: IntoIterator<Item = OperationRecord>>(iter: T) -> Self {
        Self { ops: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a OperatorList {
    type Item = &'a OperationRecord;
    type IntoIter = std::slice::Iter<'a, OperationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
