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

//! Registry of per-page steppers.
//!
//! The registry is the stepper tool: it owns one [`OperatorStepper`] per page,
//! the breakpoint store they are seeded from, and the single pause the
//! renderer may currently be waiting on.

use std::{collections::BTreeMap, sync::Arc};

use pdfbug_common::{types::OperatorList, OpcodeTable};
use tracing::{debug, info, warn};

use crate::{
    pause::{pause_channel, HookDecision, PendingPause, ResumeCommand},
    tools::{DebugTool, ToolId},
    BreakpointStore, DebuggerContext, OperatorStepper,
};

/// Creates and tracks the steppers of every page.
#[derive(Debug)]
pub struct StepperRegistry {
    opcodes: Arc<OpcodeTable>,
    store: BreakpointStore,
    steppers: BTreeMap<usize, OperatorStepper>,
    selected: Option<usize>,
    pending: Option<PendingPause>,
    active: bool,
}

impl Default for StepperRegistry {
    fn default() -> Self {
        Self {
            opcodes: Arc::new(OpcodeTable::builtin()),
            store: BreakpointStore::default(),
            steppers: BTreeMap::new(),
            selected: None,
            pending: None,
            active: false,
        }
    }
}

impl StepperRegistry {
    /// Creates an uninitialized registry using the standard opcode table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stepper of `page`, creating it from the persisted breakpoints if needed.
    ///
    /// The first stepper ever created becomes the visible one.
    pub fn create_stepper_for(&mut self, page: usize) -> &mut OperatorStepper {
        let first = self.steppers.is_empty();
        let store = &self.store;
        let stepper = self.steppers.entry(page).or_insert_with(|| {
            debug!("Creating stepper for page {}", page);
            OperatorStepper::new(page, store.get(page).to_vec())
        });
        if first {
            stepper.set_visible(true);
            self.selected = Some(page);
        }
        stepper
    }

    /// Makes the stepper of `page` the only visible one.
    ///
    /// A pause held on another page is released without resuming, which
    /// aborts that page's render pass. Returns whether `page` has a stepper.
    pub fn select_visible(&mut self, page: usize) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.page_index() != page) {
            if let Some(pending) = self.pending.take() {
                info!(
                    "Releasing pause on page {} at operation {}",
                    pending.page_index(),
                    pending.op_index()
                );
                pending.cancel();
            }
        }

        for (&index, stepper) in self.steppers.iter_mut() {
            stepper.set_visible(index == page);
        }
        self.selected = Some(page);
        self.steppers.contains_key(&page)
    }

    /// Feeds the renderer's current operator list of `page`.
    pub fn update_operator_list(&mut self, page: usize, list: &OperatorList) {
        let opcodes = Arc::clone(&self.opcodes);
        self.create_stepper_for(page).attach(list, &opcodes);
    }

    /// Starts a render pass of `page`.
    pub fn begin_render(&mut self, page: usize) {
        if self.pending.as_ref().is_some_and(|p| p.page_index() == page) {
            if let Some(pending) = self.pending.take() {
                warn!("Render of page {} restarted while paused", page);
                pending.cancel();
            }
        }
        self.create_stepper_for(page).begin_render();
    }

    /// The renderer finished `page`.
    pub fn complete(&mut self, page: usize) {
        if let Some(stepper) = self.steppers.get_mut(&page) {
            stepper.complete();
        }
    }

    /// Pre-execution hook invoked by the renderer before operation `index` of `page`.
    ///
    /// Pages without a stepper always proceed.
    pub fn on_before_execute(&mut self, page: usize, index: usize) -> HookDecision {
        let Some(stepper) = self.steppers.get_mut(&page) else {
            return HookDecision::Proceed;
        };
        if !stepper.on_before_execute(index) {
            return HookDecision::Proceed;
        }

        debug!("Pausing page {} before operation {}", page, index);
        self.select_visible(page);
        let (pending, handle) = pause_channel(page, index);
        if let Some(previous) = self.pending.replace(pending) {
            warn!(
                "Dropping stale pause on page {} at operation {}",
                previous.page_index(),
                previous.op_index()
            );
            previous.cancel();
        }
        HookDecision::Pause(handle)
    }

    /// Resolves the pending pause. Returns `false` when nothing is paused.
    pub fn resume(&mut self, command: ResumeCommand) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if let Some(stepper) = self.steppers.get_mut(&pending.page_index()) {
            stepper.resume(command);
        }
        if !pending.resolve(command) {
            debug!("Renderer stopped waiting before the pause was resolved");
        }
        true
    }

    /// Resolves the pending pause from a key press. Other keys are ignored.
    pub fn handle_key_code(&mut self, code: u32) -> bool {
        match ResumeCommand::from_key_code(code) {
            Some(command) => self.resume(command),
            None => false,
        }
    }

    /// Adds or removes a breakpoint, persisting the change.
    ///
    /// Takes effect on the very next hook invocation.
    pub fn toggle_breakpoint(&mut self, page: usize, index: usize, enabled: bool) -> bool {
        let stored = self.store.toggle(page, index, enabled);
        let local = self
            .steppers
            .get_mut(&page)
            .is_some_and(|stepper| stepper.toggle_breakpoint(index, enabled));
        stored || local
    }

    /// Whether the renderer is waiting on a pause.
    pub fn is_paused(&self) -> bool {
        self.pending.is_some()
    }

    /// Page and operation of the pending pause.
    pub fn paused_at(&self) -> Option<(usize, usize)> {
        self.pending.as_ref().map(|p| (p.page_index(), p.op_index()))
    }

    /// The stepper of `page`.
    pub fn stepper(&self, page: usize) -> Option<&OperatorStepper> {
        self.steppers.get(&page)
    }

    /// All steppers by page.
    pub fn steppers(&self) -> impl Iterator<Item = &OperatorStepper> + '_ {
        self.steppers.values()
    }

    /// Pages that have a stepper, ascending.
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.steppers.keys().copied()
    }

    /// The selected page.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The visible stepper.
    pub fn visible_stepper(&self) -> Option<&OperatorStepper> {
        self.selected.and_then(|page| self.steppers.get(&page))
    }

    /// The breakpoint store.
    pub fn store(&self) -> &BreakpointStore {
        &self.store
    }

    /// The opcode table.
    pub fn opcodes(&self) -> &OpcodeTable {
        &self.opcodes
    }

    /// Whether the stepper panel is the active one.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl DebugTool for StepperRegistry {
    fn id(&self) -> ToolId {
        ToolId::Stepper
    }

    fn init(&mut self, ctx: &DebuggerContext) {
        self.opcodes = Arc::clone(ctx.opcodes());
        self.store = BreakpointStore::load(Arc::clone(ctx.storage()));
    }

    fn cleanup(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        self.steppers.clear();
        self.selected = None;
    }

    fn activate(&mut self, active: bool) {
        self.active = active;
    }
}
