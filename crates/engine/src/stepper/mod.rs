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

//! Per-page operator stepper.
//!
//! An [`OperatorStepper`] owns the debugger's view of one page: the rows
//! materialized from the page's operator list, the execution cursor, the
//! index at which execution halts next, and the page's breakpoints.
//!
//! # State machine
//!
//! ```text
//! Idle --begin_render--> Rendering --hook pauses--> Paused
//!                            ^                        |
//!                            +--------resume----------+
//! Rendering --complete / continue past last breakpoint--> Finished
//! ```
//!
//! The cursor is the index of the last operation the pre-execution hook saw;
//! `None` means no operation has been examined in the current render pass.

mod rows;

pub use rows::*;

use pdfbug_common::{
    names,
    types::{insert_sorted, normalize_indices, remove_sorted, OperatorList},
    OpcodeTable,
};
use tracing::{debug, trace};

use crate::ResumeCommand;

/// Lifecycle of a page render as seen by its stepper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StepperStatus {
    /// No render pass has started.
    #[default]
    Idle,
    /// The renderer is executing operations.
    Rendering,
    /// The renderer waits before the cursor operation.
    Paused,
    /// No further pause will happen in this render pass.
    Finished,
}

/// Stepping state of a single page.
#[derive(Debug, Clone)]
pub struct OperatorStepper {
    page_index: usize,
    breakpoints: Vec<usize>,
    cursor: Option<usize>,
    pending_target: Option<usize>,
    rendered_up_to: usize,
    scope_depth: usize,
    status: StepperStatus,
    rows: Vec<OperatorRow>,
    highlighted: Option<usize>,
    truncated: bool,
    visible: bool,
}

impl OperatorStepper {
    /// Creates a stepper for `page_index` seeded with its persisted breakpoints.
    pub fn new(page_index: usize, mut breakpoints: Vec<usize>) -> Self {
        normalize_indices(&mut breakpoints);
        Self {
            page_index,
            breakpoints,
            cursor: None,
            pending_target: None,
            rendered_up_to: 0,
            scope_depth: 0,
            status: StepperStatus::Idle,
            rows: Vec::new(),
            highlighted: None,
            truncated: false,
            visible: false,
        }
    }

    /// Materializes rows for the operations not rendered yet.
    ///
    /// The renderer hands over its whole list every time it grows. Only the
    /// suffix `[rendered_up_to, min(len, MAX_OPERATORS_COUNT))` becomes rows;
    /// a list longer than [`MAX_OPERATORS_COUNT`] is marked truncated.
    pub fn attach(&mut self, list: &OperatorList, opcodes: &OpcodeTable) {
        if self.rendered_up_to > MAX_OPERATORS_COUNT {
            return;
        }

        let end = list.len().min(MAX_OPERATORS_COUNT);
        for index in self.rendered_up_to..end {
            let Some(record) = list.get(index) else { break };
            let name = opcodes.display_name(record.opcode);

            if name == names::RESTORE {
                if self.scope_depth == 0 {
                    debug!(page = self.page_index, index, "unmatched restore, depth clamped at zero");
                } else {
                    self.scope_depth -= 1;
                }
            }

            let args = if name == names::SHOW_TEXT {
                RowArgs::Glyphs(GlyphTable::from_arg(record.args.first()))
            } else {
                RowArgs::Summary(summarize_args(&record.args))
            };
            self.rows.push(OperatorRow {
                index,
                label: format!("{}{}", " ".repeat(self.scope_depth * 2), name),
                depth: self.scope_depth,
                args,
            });

            if name == names::SAVE {
                self.scope_depth += 1;
            }
        }

        if list.len() > MAX_OPERATORS_COUNT && !self.truncated {
            debug!(page = self.page_index, len = list.len(), "operator list truncated");
            self.truncated = true;
        }
        self.rendered_up_to = self.rendered_up_to.max(list.len());
    }

    /// Starts a render pass of the page.
    pub fn begin_render(&mut self) {
        self.cursor = None;
        self.pending_target = self.next_breakpoint();
        self.highlighted = None;
        self.status = StepperStatus::Rendering;
        trace!(page = self.page_index, target = ?self.pending_target, "render pass started");
    }

    /// Pre-execution hook. Returns whether the renderer must pause before `index`.
    pub fn on_before_execute(&mut self, index: usize) -> bool {
        self.cursor = Some(index);
        if self.breakpoints.binary_search(&index).is_ok() || self.pending_target == Some(index) {
            self.status = StepperStatus::Paused;
            self.highlight(Some(index));
            true
        } else {
            false
        }
    }

    /// Applies the user's resume command after a pause.
    pub fn resume(&mut self, command: ResumeCommand) {
        self.highlight(None);
        match command {
            ResumeCommand::Step => {
                self.pending_target = Some(self.cursor.map_or(0, |c| c + 1));
                self.status = StepperStatus::Rendering;
            }
            ResumeCommand::Continue => {
                self.pending_target = self.next_breakpoint();
                self.status = if self.pending_target.is_some() {
                    StepperStatus::Rendering
                } else {
                    StepperStatus::Finished
                };
            }
        }
        trace!(page = self.page_index, ?command, target = ?self.pending_target, "resumed");
    }

    /// Lowest breakpoint strictly after the cursor.
    pub fn next_breakpoint(&self) -> Option<usize> {
        let from = match self.cursor {
            Some(cursor) => self.breakpoints.partition_point(|&b| b <= cursor),
            None => 0,
        };
        self.breakpoints.get(from).copied()
    }

    /// Marks the row of `index` as current; `None` clears the mark.
    pub fn highlight(&mut self, index: Option<usize>) {
        self.highlighted = index;
    }

    /// Adds or removes a breakpoint. Returns whether the list changed.
    pub fn toggle_breakpoint(&mut self, index: usize, enabled: bool) -> bool {
        if enabled {
            insert_sorted(&mut self.breakpoints, index)
        } else {
            remove_sorted(&mut self.breakpoints, index)
        }
    }

    /// The renderer finished the page.
    pub fn complete(&mut self) {
        self.highlight(None);
        self.status = StepperStatus::Finished;
    }

    /// Shows or hides the stepper.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Page this stepper belongs to.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Breakpoints, ascending.
    pub fn breakpoints(&self) -> &[usize] {
        &self.breakpoints
    }

    /// Whether `index` is a breakpoint.
    pub fn is_breakpoint(&self, index: usize) -> bool {
        self.breakpoints.binary_search(&index).is_ok()
    }

    /// Last operation examined by the hook.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Index the renderer halts at next.
    pub fn pending_target(&self) -> Option<usize> {
        self.pending_target
    }

    /// Number of operations the stepper has seen.
    pub fn rendered_up_to(&self) -> usize {
        self.rendered_up_to
    }

    /// Current save/restore nesting.
    pub fn scope_depth(&self) -> usize {
        self.scope_depth
    }

    /// Current status.
    pub fn status(&self) -> StepperStatus {
        self.status
    }

    /// Materialized rows in operation order.
    pub fn rows(&self) -> &[OperatorRow] {
        &self.rows
    }

    /// The highlighted row's operation index.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Whether rows stopped at [`MAX_OPERATORS_COUNT`].
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Whether this is the visible stepper.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfbug_common::types::OperationRecord;
    use serde_json::json;

    fn list_of(opcodes: &[u32]) -> OperatorList {
        opcodes.iter().map(|&op| OperationRecord::new(op, vec![])).collect()
    }

    fn table() -> OpcodeTable {
        OpcodeTable::resolve([("save", 10u32), ("restore", 11), ("showText", 44), ("fill", 22)])
    }

    #[test]
    fn test_continue_halts_at_next_breakpoint() {
        let mut stepper = OperatorStepper::new(0, vec![8, 2, 5]);
        stepper.begin_render();
        assert_eq!(stepper.pending_target(), Some(2));

        assert!(!stepper.on_before_execute(0));
        assert!(!stepper.on_before_execute(1));
        assert!(stepper.on_before_execute(2));
        assert_eq!(stepper.status(), StepperStatus::Paused);
        assert_eq!(stepper.highlighted(), Some(2));

        stepper.resume(ResumeCommand::Continue);
        assert_eq!(stepper.pending_target(), Some(5));
        assert_eq!(stepper.highlighted(), None);
        assert!(!stepper.on_before_execute(3));
        assert!(!stepper.on_before_execute(4));
        assert!(stepper.on_before_execute(5));

        stepper.resume(ResumeCommand::Continue);
        assert_eq!(stepper.pending_target(), Some(8));
        assert!(stepper.on_before_execute(8));

        stepper.resume(ResumeCommand::Continue);
        assert_eq!(stepper.pending_target(), None);
        assert_eq!(stepper.status(), StepperStatus::Finished);
    }

    #[test]
    fn test_step_pauses_on_following_operation() {
        let mut stepper = OperatorStepper::new(0, vec![1]);
        stepper.begin_render();
        stepper.on_before_execute(0);
        assert!(stepper.on_before_execute(1));

        stepper.resume(ResumeCommand::Step);
        assert_eq!(stepper.pending_target(), Some(2));
        assert_eq!(stepper.status(), StepperStatus::Rendering);
        assert!(stepper.on_before_execute(2));
    }

    #[test]
    fn test_continue_without_breakpoints_finishes() {
        let mut stepper = OperatorStepper::new(0, vec![]);
        stepper.begin_render();
        assert_eq!(stepper.pending_target(), None);

        // Force a pause through a step target, then continue
        stepper.resume(ResumeCommand::Step);
        assert!(stepper.on_before_execute(0));
        stepper.resume(ResumeCommand::Continue);

        assert_eq!(stepper.status(), StepperStatus::Finished);
        for index in 1..50 {
            assert!(!stepper.on_before_execute(index));
        }
    }

    #[test]
    fn test_next_breakpoint() {
        let mut stepper = OperatorStepper::new(0, vec![3, 7]);
        assert_eq!(stepper.next_breakpoint(), Some(3));

        stepper.on_before_execute(3);
        assert_eq!(stepper.next_breakpoint(), Some(7));
        stepper.on_before_execute(7);
        assert_eq!(stepper.next_breakpoint(), None);
    }

    #[test]
    fn test_toggled_breakpoint_takes_effect_immediately() {
        let mut stepper = OperatorStepper::new(0, vec![]);
        stepper.begin_render();
        assert!(!stepper.on_before_execute(0));

        assert!(stepper.toggle_breakpoint(4, true));
        assert!(!stepper.toggle_breakpoint(4, true));
        assert!(stepper.on_before_execute(4));

        assert!(stepper.toggle_breakpoint(4, false));
        assert!(stepper.breakpoints().is_empty());
    }

    #[test]
    fn test_attach_is_idempotent_for_same_length() {
        let opcodes = table();
        let list = list_of(&[10, 22, 11]);
        let mut stepper = OperatorStepper::new(0, vec![]);

        stepper.attach(&list, &opcodes);
        assert_eq!(stepper.rows().len(), 3);
        stepper.attach(&list, &opcodes);
        assert_eq!(stepper.rows().len(), 3);
        assert_eq!(stepper.rendered_up_to(), 3);
    }

    #[test]
    fn test_attach_renders_only_new_suffix() {
        let opcodes = table();
        let mut list = list_of(&[10, 22]);
        let mut stepper = OperatorStepper::new(0, vec![]);
        stepper.attach(&list, &opcodes);

        list.push(OperationRecord::new(11, vec![]));
        stepper.attach(&list, &opcodes);

        let labels: Vec<_> = stepper.rows().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["save", "  fill", "restore"]);
        assert_eq!(stepper.rows()[2].index, 2);
    }

    #[test]
    fn test_save_show_text_restore_scenario() {
        let opcodes = table();
        let list: OperatorList = vec![
            OperationRecord::new(10, vec![]),
            OperationRecord::new(44, vec![json!([{"unicode": "H"}, -120, {"unicode": "i"}])]),
            OperationRecord::new(11, vec![]),
        ]
        .into_iter()
        .collect();

        let mut stepper = OperatorStepper::new(0, vec![1]);
        stepper.attach(&list, &opcodes);
        stepper.begin_render();

        assert!(!stepper.on_before_execute(0));
        assert!(stepper.on_before_execute(1));
        assert_eq!(stepper.status(), StepperStatus::Paused);
        assert_eq!(stepper.highlighted(), Some(1));

        let rows = stepper.rows();
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[2].depth, 0);
        assert_eq!(rows[0].label, "save");
        assert_eq!(rows[0].args, RowArgs::Summary("[]".to_string()));
        assert_eq!(rows[1].label, "  showText");
        assert_eq!(rows[2].label, "restore");
        assert_eq!(stepper.scope_depth(), 0);

        let RowArgs::Glyphs(table) = &rows[1].args else { panic!("Expected a glyph table") };
        let [_, _, unicode] = table.rows();
        assert_eq!(unicode, vec!["H", "", "i"]);
        assert_eq!(table.entries()[1], GlyphEntry::Advance("-120".to_string()));
    }

    #[test]
    fn test_unmatched_restore_clamps_depth() {
        let opcodes = table();
        let list = list_of(&[11, 11, 22, 10, 22]);
        let mut stepper = OperatorStepper::new(0, vec![]);
        stepper.attach(&list, &opcodes);

        let labels: Vec<_> = stepper.rows().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["restore", "restore", "fill", "save", "  fill"]);
        assert_eq!(stepper.scope_depth(), 1);
    }

    #[test]
    fn test_unknown_opcode_uses_number() {
        let opcodes = table();
        let list = list_of(&[999]);
        let mut stepper = OperatorStepper::new(0, vec![]);
        stepper.attach(&list, &opcodes);

        assert_eq!(stepper.rows()[0].label, "999");
    }

    #[test]
    fn test_attach_caps_rows() {
        let opcodes = table();
        let list = list_of(&vec![22; MAX_OPERATORS_COUNT + 5]);
        let mut stepper = OperatorStepper::new(0, vec![]);
        stepper.attach(&list, &opcodes);

        assert_eq!(stepper.rows().len(), MAX_OPERATORS_COUNT);
        assert!(stepper.is_truncated());
        assert_eq!(stepper.rendered_up_to(), MAX_OPERATORS_COUNT + 5);

        // Past the cap nothing else is ever materialized
        let longer = list_of(&vec![22; MAX_OPERATORS_COUNT + 10]);
        stepper.attach(&longer, &opcodes);
        assert_eq!(stepper.rows().len(), MAX_OPERATORS_COUNT);
    }

    #[test]
    fn test_begin_render_resets_cursor() {
        let mut stepper = OperatorStepper::new(0, vec![2]);
        stepper.begin_render();
        stepper.on_before_execute(2);
        stepper.resume(ResumeCommand::Continue);
        assert_eq!(stepper.status(), StepperStatus::Finished);

        stepper.begin_render();
        assert_eq!(stepper.cursor(), None);
        assert_eq!(stepper.pending_target(), Some(2));
        assert_eq!(stepper.status(), StepperStatus::Rendering);
    }
}
