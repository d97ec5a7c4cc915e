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

//! Debugger context shared by the tools

use std::sync::Arc;

use pdfbug_common::OpcodeTable;

use crate::storage::{BreakpointStorage, MemoryStorage};

/// Everything the debugging tools need from their environment.
///
/// Built once at startup and handed to every tool's `init`. The opcode table
/// is immutable afterwards; the storage handle is shared by all clones.
#[derive(Debug, Clone)]
pub struct DebuggerContext {
    opcodes: Arc<OpcodeTable>,
    storage: Arc<dyn BreakpointStorage>,
}

impl DebuggerContext {
    /// Build a context from an opcode table and a breakpoint storage.
    pub fn new(opcodes: OpcodeTable, storage: Arc<dyn BreakpointStorage>) -> Self {
        Self { opcodes: Arc::new(opcodes), storage }
    }

    /// Build a context whose breakpoints live in memory only.
    pub fn in_memory(opcodes: OpcodeTable) -> Self {
        Self::new(opcodes, Arc::new(MemoryStorage::new()))
    }

    /// The opcode table.
    pub fn opcodes(&self) -> &Arc<OpcodeTable> {
        &self.opcodes
    }

    /// The breakpoint storage.
    pub fn storage(&self) -> &Arc<dyn BreakpointStorage> {
        &self.storage
    }
}

impl Default for DebuggerContext {
    fn default() -> Self {
        Self::in_memory(OpcodeTable::builtin())
    }
}
