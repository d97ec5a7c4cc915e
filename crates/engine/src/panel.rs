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

//! Panel host
//!
//! The [`PanelHost`] owns every debugging tool, enables the ones the user
//! asked for, and keeps exactly one panel active. Renderers talk to the
//! debugger only through the host's progress methods, which route each event
//! to the enabled tool interested in it.

use std::sync::Arc;

use parking_lot::Mutex;
use pdfbug_common::types::{FontDescriptor, OperatorList};
use tracing::{debug, info};

use crate::{
    tools::{DebugTool, FontInspector, StatTimer, StatsCollector, Tool, ToolId, ToolSelection},
    DebuggerContext, HookDecision, ResumeCommand, StepperRegistry,
};

/// Panel host shared between the renderer and the user interface.
///
/// The lock is only ever taken for synchronous sections; never hold it
/// across an `.await`.
pub type SharedHost = Arc<Mutex<PanelHost>>;

/// A tool and its panel state.
#[derive(Debug)]
pub struct ToolSlot {
    tool: Tool,
    enabled: bool,
    active: bool,
}

impl ToolSlot {
    fn new(id: ToolId) -> Self {
        Self { tool: Tool::new(id), enabled: false, active: false }
    }

    /// The tool.
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Identifier of the tool.
    pub fn id(&self) -> ToolId {
        self.tool.id()
    }

    /// Panel title.
    pub fn name(&self) -> &'static str {
        self.tool.name()
    }

    /// Whether the tool was enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the tool's panel is the active one.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Panel text of a disabled tool.
    pub fn disabled_message(&self) -> Option<String> {
        (!self.enabled).then(|| {
            format!(
                "{} is disabled. To enable add \"{}\" to the --tools option and restart \
                 (separate multiple by commas).",
                self.name(),
                self.id()
            )
        })
    }
}

/// Container of the debugging tools.
#[derive(Debug)]
pub struct PanelHost {
    slots: Vec<ToolSlot>,
    active: Option<usize>,
}

impl Default for PanelHost {
    fn default() -> Self {
        Self { slots: ToolId::ALL.into_iter().map(ToolSlot::new).collect(), active: None }
    }
}

impl PanelHost {
    /// Creates a host with every tool disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the host for sharing between tasks.
    pub fn into_shared(self) -> SharedHost {
        Arc::new(Mutex::new(self))
    }

    /// Enables the selected tools.
    ///
    /// For a listed selection the panels are reordered to follow the list;
    /// unlisted tools keep their relative order after the listed ones.
    pub fn enable(&mut self, selection: &ToolSelection) {
        for slot in &mut self.slots {
            if selection.contains(slot.id()) {
                slot.enabled = true;
            }
        }
        if let ToolSelection::Listed(_) = selection {
            let unlisted = self.slots.len();
            self.slots.sort_by_key(|slot| selection.position(slot.id()).unwrap_or(unlisted));
        }
    }

    /// Enables the selected tools, initializes them and activates the first panel.
    pub fn init(&mut self, ctx: &DebuggerContext, selection: &ToolSelection) {
        self.enable(selection);
        for slot in &mut self.slots {
            if slot.enabled {
                debug!("Initializing tool {}", slot.id());
                slot.tool.init(ctx);
            }
        }
        self.select_panel(0);
        info!(
            "Debugging tools: {}",
            self.slots
                .iter()
                .filter(|s| s.enabled)
                .map(|s| s.id().as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    /// Activates the panel at `index`. Returns whether the active panel changed.
    pub fn select_panel(&mut self, index: usize) -> bool {
        if index >= self.slots.len() || self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let is_active = i == index;
            if slot.active != is_active {
                slot.active = is_active;
                slot.tool.activate(is_active);
            }
        }
        true
    }

    /// Activates the panel of `id`.
    pub fn select_tool(&mut self, id: ToolId) -> bool {
        match self.position(id) {
            Some(index) => self.select_panel(index),
            None => false,
        }
    }

    /// Cleans up every enabled tool.
    pub fn cleanup(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            slot.tool.cleanup();
        }
    }

    /// Panels in display order.
    pub fn slots(&self) -> &[ToolSlot] {
        &self.slots
    }

    /// Display position of `id`.
    pub fn position(&self, id: ToolId) -> Option<usize> {
        self.slots.iter().position(|s| s.id() == id)
    }

    /// Index of the active panel.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active panel.
    pub fn active_slot(&self) -> Option<&ToolSlot> {
        self.active.and_then(|i| self.slots.get(i))
    }

    /// The stepper tool, if enabled.
    pub fn stepper(&self) -> Option<&StepperRegistry> {
        self.slots.iter().filter(|s| s.enabled).find_map(|s| match &s.tool {
            Tool::Stepper(registry) => Some(registry),
            _ => None,
        })
    }

    /// The stepper tool, if enabled.
    pub fn stepper_mut(&mut self) -> Option<&mut StepperRegistry> {
        self.slots.iter_mut().filter(|s| s.enabled).find_map(|s| match &mut s.tool {
            Tool::Stepper(registry) => Some(registry),
            _ => None,
        })
    }

    /// The font inspector, if enabled.
    pub fn font_inspector(&self) -> Option<&FontInspector> {
        self.slots.iter().filter(|s| s.enabled).find_map(|s| match &s.tool {
            Tool::FontInspector(inspector) => Some(inspector),
            _ => None,
        })
    }

    /// The font inspector, if enabled.
    pub fn font_inspector_mut(&mut self) -> Option<&mut FontInspector> {
        self.slots.iter_mut().filter(|s| s.enabled).find_map(|s| match &mut s.tool {
            Tool::FontInspector(inspector) => Some(inspector),
            _ => None,
        })
    }

    /// The stats tool, if enabled.
    pub fn stats(&self) -> Option<&StatsCollector> {
        self.slots.iter().filter(|s| s.enabled).find_map(|s| match &s.tool {
            Tool::Stats(stats) => Some(stats),
            _ => None,
        })
    }

    /// The stats tool, if enabled.
    pub fn stats_mut(&mut self) -> Option<&mut StatsCollector> {
        self.slots.iter_mut().filter(|s| s.enabled).find_map(|s| match &mut s.tool {
            Tool::Stats(stats) => Some(stats),
            _ => None,
        })
    }

    /// A render pass of `page` is starting.
    pub fn page_started(&mut self, page: usize) {
        if let Some(registry) = self.stepper_mut() {
            registry.begin_render(page);
        }
    }

    /// The renderer's operator list of `page` grew.
    pub fn update_operator_list(&mut self, page: usize, list: &OperatorList) {
        if let Some(registry) = self.stepper_mut() {
            registry.update_operator_list(page, list);
        }
    }

    /// Pre-execution hook. A pause brings the stepper panel to the front.
    pub fn on_before_execute(&mut self, page: usize, index: usize) -> HookDecision {
        let Some(registry) = self.stepper_mut() else {
            return HookDecision::Proceed;
        };
        let decision = registry.on_before_execute(page, index);
        if decision.is_pause() {
            self.select_tool(ToolId::Stepper);
        }
        decision
    }

    /// Resolves the renderer's pending pause.
    pub fn resume(&mut self, command: ResumeCommand) -> bool {
        self.stepper_mut().is_some_and(|registry| registry.resume(command))
    }

    /// Resolves the renderer's pending pause from a key press.
    pub fn handle_key_code(&mut self, code: u32) -> bool {
        self.stepper_mut().is_some_and(|registry| registry.handle_key_code(code))
    }

    /// The renderer finished `page` (zero-based) with `stats`.
    pub fn page_finished(&mut self, page: usize, stats: &StatTimer) {
        if let Some(registry) = self.stepper_mut() {
            registry.complete(page);
        }
        if let Some(collector) = self.stats_mut() {
            collector.add(page + 1, stats);
        }
    }

    /// The renderer loaded a font.
    pub fn font_added(&mut self, descriptor: &FontDescriptor, css: Option<&str>) {
        if let Some(inspector) = self.font_inspector_mut() {
            inspector.font_added(descriptor.clone(), css);
        }
    }
}
