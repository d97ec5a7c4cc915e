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

// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! PDFBug Common - Shared functionality for PDFBug components
//!
//! This crate provides the data types shared by the stepping engine, the
//! terminal front-end and the command-line binary: operator lists recorded
//! from the host renderer, breakpoint sets, font descriptors, and the opcode
//! table used to translate raw operation codes back into symbolic names.

/// Common types used throughout PDFBug including operator lists, breakpoints and fonts
pub mod types;

/// Logging setup and utilities for consistent logging across PDFBug components
pub mod logging;
/// Opcode table mapping raw operation codes to symbolic operator names
pub mod opcode;

pub use logging::*;
pub use opcode::*;
