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

//! Panel framework and implementations
//!
//! One panel per debugging tool. Panels only hold view state such as the
//! selected row; everything else is read from the [`PanelHost`] at draw time.

use std::fmt::Debug;

use crossterm::event::KeyEvent;
use eyre::Result;
use pdfbug_engine::{PanelHost, ToolId};
use ratatui::{layout::Rect, Frame};

use crate::config::Theme;

/// Response from panel event handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResponse {
    /// Event was handled, no further action needed
    Handled,
    /// Event was not handled, pass to next handler
    NotHandled,
    /// Request application exit
    Exit,
}

/// Trait for UI panels
pub trait Panel: Debug + Send {
    /// Render the panel content
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, host: &PanelHost, theme: &Theme);

    /// Handle keyboard events
    fn handle_key_event(&mut self, event: KeyEvent, host: &mut PanelHost) -> Result<EventResponse> {
        let _ = (event, host);
        Ok(EventResponse::NotHandled)
    }

    /// The tool this panel shows
    fn tool_id(&self) -> ToolId;
}

/// Moves a selection by `delta` inside `0..len`.
pub(crate) fn move_selection(selected: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.saturating_add_signed(delta).min(len - 1)
}

pub mod fonts;
pub mod stats;
pub mod stepper;

pub use fonts::FontsPanel;
pub use stats::StatsPanel;
pub use stepper::StepperPanel;
