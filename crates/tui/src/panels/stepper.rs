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

//! Stepper panel
//!
//! Shows the operator log of the visible page with breakpoint markers and the
//! operation the renderer is paused before.

use crossterm::event::{KeyCode, KeyEvent};
use eyre::Result;
use pdfbug_engine::{
    OperatorRow, OperatorStepper, PanelHost, RowArgs, StepperRegistry, StepperStatus, ToolId,
    MAX_OPERATORS_COUNT,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::debug;

use super::{move_selection, EventResponse, Panel};
use crate::config::Theme;

const PAGE_JUMP: isize = 20;

/// Operator log of the visible page
#[derive(Debug, Default)]
pub struct StepperPanel {
    selected: usize,
    list_state: ListState,
    last_highlight: Option<(usize, usize)>,
}

impl StepperPanel {
    /// Create a new stepper panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the selected row
    pub fn selected(&self) -> usize {
        self.selected
    }

    // Jump to the paused operation the first time it is reported.
    fn follow_highlight(&mut self, stepper: &OperatorStepper) {
        let current = stepper.highlighted().map(|index| (stepper.page_index(), index));
        if current != self.last_highlight {
            if let Some((_, index)) = current {
                if index < stepper.rows().len() {
                    self.selected = index;
                }
            }
            self.last_highlight = current;
        }
    }

    fn page_header(registry: &StepperRegistry) -> Line<'static> {
        let mut spans = vec![Span::raw("Pages: ")];
        for page in registry.pages() {
            let label = format!(" {} ", page + 1);
            if Some(page) == registry.selected() {
                spans.push(Span::styled(label, Style::default().add_modifier(Modifier::REVERSED)));
            } else {
                spans.push(Span::raw(label));
            }
        }
        spans.push(Span::raw("   [ / ] change page"));
        Line::from(spans)
    }

    fn row_item(row: &OperatorRow, stepper: &OperatorStepper, theme: &Theme) -> ListItem<'static> {
        let marker = if stepper.is_breakpoint(row.index) {
            Span::styled("● ", Style::default().fg(theme.breakpoint))
        } else {
            Span::raw("  ")
        };
        let head = vec![
            marker,
            Span::raw(format!("{:>5} ", row.index)),
            Span::styled(row.label.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
        ];

        let mut text = match &row.args {
            RowArgs::Summary(summary) => {
                let mut spans = head;
                spans.push(Span::raw(summary.clone()));
                Text::from(Line::from(spans))
            }
            RowArgs::Glyphs(table) => {
                let mut lines = vec![Line::from(head)];
                let rows = table.rows();
                let widths: Vec<usize> = (0..table.len())
                    .map(|col| rows.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
                    .collect();
                let indent = " ".repeat(8 + row.depth * 2);
                for cells in &rows {
                    let line = cells
                        .iter()
                        .zip(&widths)
                        .map(|(cell, &width)| format!("{cell:<width$}"))
                        .collect::<Vec<_>>()
                        .join("|");
                    lines.push(Line::from(format!("{indent}{line}")));
                }
                Text::from(lines)
            }
        };

        if stepper.highlighted() == Some(row.index) {
            text = text.patch_style(Style::default().bg(theme.highlight_bg));
        }
        ListItem::new(text)
    }

    fn status_label(status: StepperStatus) -> &'static str {
        match status {
            StepperStatus::Idle => "idle",
            StepperStatus::Rendering => "rendering",
            StepperStatus::Paused => "paused",
            StepperStatus::Finished => "finished",
        }
    }
}

impl Panel for StepperPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, host: &PanelHost, theme: &Theme) {
        let block = |title: String| {
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focused_border))
        };

        let Some(registry) = host.stepper() else {
            let message = Paragraph::new("Stepper is not available");
            frame.render_widget(message.block(block(" Stepper ".to_string())), area);
            return;
        };
        let Some(stepper) = registry.visible_stepper() else {
            let message = Paragraph::new("No page rendered yet");
            frame.render_widget(message.block(block(" Stepper ".to_string())), area);
            return;
        };

        self.follow_highlight(stepper);
        self.selected = self.selected.min(stepper.rows().len().saturating_sub(1));

        let block = block(format!(
            " Stepper - page {} [{}] ",
            stepper.page_index() + 1,
            Self::status_label(stepper.status())
        ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(Self::page_header(registry)), chunks[0]);

        let mut items: Vec<ListItem<'_>> =
            stepper.rows().iter().map(|row| Self::row_item(row, stepper, theme)).collect();
        if stepper.is_truncated() {
            items.push(ListItem::new(Line::styled(
                format!("... operator list truncated at {MAX_OPERATORS_COUNT} operations"),
                Style::default().fg(theme.disabled),
            )));
        }

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        self.list_state.select((!stepper.rows().is_empty()).then_some(self.selected));
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    fn handle_key_event(&mut self, event: KeyEvent, host: &mut PanelHost) -> Result<EventResponse> {
        let Some(registry) = host.stepper_mut() else {
            return Ok(EventResponse::NotHandled);
        };
        let Some(page) = registry.selected() else {
            return Ok(EventResponse::NotHandled);
        };
        let len = registry.stepper(page).map_or(0, |s| s.rows().len());

        match event.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = move_selection(self.selected, -1, len),
            KeyCode::Down | KeyCode::Char('j') => self.selected = move_selection(self.selected, 1, len),
            KeyCode::PageUp => self.selected = move_selection(self.selected, -PAGE_JUMP, len),
            KeyCode::PageDown => self.selected = move_selection(self.selected, PAGE_JUMP, len),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = len.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Char('b') => {
                if self.selected >= len {
                    return Ok(EventResponse::Handled);
                }
                let enabled = !registry.stepper(page).is_some_and(|s| s.is_breakpoint(self.selected));
                registry.toggle_breakpoint(page, self.selected, enabled);
                debug!("Breakpoint {} on page {} set to {}", self.selected, page, enabled);
            }
            KeyCode::Char('[') | KeyCode::Char(']') => {
                let pages: Vec<usize> = registry.pages().collect();
                let Some(pos) = pages.iter().position(|&p| p == page) else {
                    return Ok(EventResponse::Handled);
                };
                let delta = if event.code == KeyCode::Char('[') { -1 } else { 1 };
                let target = pages[move_selection(pos, delta, pages.len())];
                if target != page {
                    registry.select_visible(target);
                    self.selected = 0;
                }
            }
            _ => return Ok(EventResponse::NotHandled),
        }
        Ok(EventResponse::Handled)
    }

    fn tool_id(&self) -> ToolId {
        ToolId::Stepper
    }
}
