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

//! Debugging tools hosted by the panel host.
//!
//! Every tool implements [`DebugTool`]. The host keeps them as [`Tool`]
//! values, so the set of tools is closed and matching on the variant gives
//! access to the concrete tool.

mod font_inspector;
mod stats;

pub use font_inspector::*;
pub use stats::*;

use std::{fmt, str::FromStr};

use tracing::warn;

use crate::{DebuggerContext, DebuggerError, StepperRegistry};

/// Contract shared by all debugging tools.
pub trait DebugTool {
    /// Identifier used to enable the tool.
    fn id(&self) -> ToolId;

    /// Human readable name shown on the tool's panel button.
    fn name(&self) -> &'static str {
        self.id().display_name()
    }

    /// Prepares the tool. Only called for enabled tools.
    fn init(&mut self, ctx: &DebuggerContext);

    /// Releases everything the tool accumulated.
    fn cleanup(&mut self);

    /// Called when the tool's panel becomes (in)active.
    fn activate(&mut self, active: bool);
}

/// Identifier of a debugging tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolId {
    /// Font inspector.
    FontInspector,
    /// Operator list stepper.
    Stepper,
    /// Rendering statistics.
    Stats,
}

impl ToolId {
    /// All tools in their default panel order.
    pub const ALL: [Self; 3] = [Self::FontInspector, Self::Stepper, Self::Stats];

    /// Identifier as written in a tool selection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FontInspector => "FontInspector",
            Self::Stepper => "Stepper",
            Self::Stats => "Stats",
        }
    }

    /// Panel title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FontInspector => "Font Inspector",
            Self::Stepper => "Stepper",
            Self::Stats => "Stats",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = DebuggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DebuggerError::UnknownTool(s.to_string()))
    }
}

/// Which tools to enable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolSelection {
    /// Every tool, in default order.
    All,
    /// The listed tools, in this panel order.
    Listed(Vec<ToolId>),
}

impl ToolSelection {
    /// Parses `"all"` or a comma separated list of tool identifiers.
    ///
    /// Unknown identifiers are logged and skipped.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == "all" {
            return Self::All;
        }

        let mut ids = Vec::new();
        for part in value.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.parse::<ToolId>() {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(e) => warn!("Ignoring tool selection entry: {}", e),
            }
        }
        Self::Listed(ids)
    }

    /// Whether `id` is enabled by this selection.
    pub fn contains(&self, id: ToolId) -> bool {
        match self {
            Self::All => true,
            Self::Listed(ids) => ids.contains(&id),
        }
    }

    /// Position of `id` in a listed selection.
    pub fn position(&self, id: ToolId) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Listed(ids) => ids.iter().position(|&listed| listed == id),
        }
    }
}

impl Default for ToolSelection {
    fn default() -> Self {
        Self::Listed(Vec::new())
    }
}

/// A debugging tool.
#[derive(Debug)]
pub enum Tool {
    /// Font inspector.
    FontInspector(FontInspector),
    /// Operator list stepper.
    Stepper(StepperRegistry),
    /// Rendering statistics.
    Stats(StatsCollector),
}

impl Tool {
    /// Creates the tool identified by `id`.
    pub fn new(id: ToolId) -> Self {
        match id {
            ToolId::FontInspector => Self::FontInspector(FontInspector::new()),
            ToolId::Stepper => Self::Stepper(StepperRegistry::new()),
            ToolId::Stats => Self::Stats(StatsCollector::new()),
        }
    }

    fn as_dyn(&self) -> &dyn DebugTool {
        match self {
            Self::FontInspector(tool) => tool,
            Self::Stepper(tool) => tool,
            Self::Stats(tool) => tool,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn DebugTool {
        match self {
            Self::FontInspector(tool) => tool,
            Self::Stepper(tool) => tool,
            Self::Stats(tool) => tool,
        }
    }
}

impl DebugTool for Tool {
    fn id(&self) -> ToolId {
        self.as_dyn().id()
    }

    fn init(&mut self, ctx: &DebuggerContext) {
        self.as_dyn_mut().init(ctx)
    }

    fn cleanup(&mut self) {
        self.as_dyn_mut().cleanup()
    }

    fn activate(&mut self, active: bool) {
        self.as_dyn_mut().activate(active)
    }
}
