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

//! PDFBug Engine - operator list stepping and debugging tools
//!
//! The engine sits between an external renderer and a user interface. The
//! renderer reports its progress to a [`PanelHost`] and calls the
//! pre-execution hook before each operation; when the hook returns a
//! [`PauseHandle`] the renderer waits until the user steps or continues.

pub mod breakpoint;
pub use breakpoint::*;

pub mod context;
pub use context::*;

pub mod error;
pub use error::*;

pub mod panel;
pub use panel::*;

pub mod pause;
pub use pause::*;

pub mod registry;
pub use registry::*;

pub mod replay;
pub use replay::*;

pub mod stepper;
pub use stepper::*;

pub mod storage;
pub use storage::*;

pub mod tools;
pub use tools::*;
