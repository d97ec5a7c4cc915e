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

//! Engine error types

use thiserror::Error;

/// Errors surfaced by the debugging engine.
///
/// None of these are raised on the pre-execution hook path; the hook itself
/// never fails.
#[derive(Debug, Error)]
pub enum DebuggerError {
    /// A pause was released without a step or continue command.
    #[error("pause before operation {op_index} on page {page_index} was cancelled")]
    PauseCancelled {
        /// Page the renderer was paused on.
        page_index: usize,
        /// Operation the renderer was paused before.
        op_index: usize,
    },

    /// A tool identifier that names no known tool.
    #[error("unknown tool identifier: {0}")]
    UnknownTool(String),

    /// The requested font has no downloadable program.
    #[error("font {0} has no embedded data to export")]
    FontUnavailable(String),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
