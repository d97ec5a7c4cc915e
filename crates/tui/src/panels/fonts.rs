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

//! Font inspector panel

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use eyre::Result;
use pdfbug_engine::{FontEntry, FontSource, PanelHost, ToolId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::warn;

use super::{move_selection, EventResponse, Panel};
use crate::config::Theme;

/// Lists loaded fonts; checking a font singles out its text
#[derive(Debug)]
pub struct FontsPanel {
    selected: usize,
    list_state: ListState,
    export_dir: PathBuf,
    message: Option<String>,
}

impl FontsPanel {
    /// Create a new fonts panel exporting font programs into `export_dir`
    pub fn new(export_dir: PathBuf) -> Self {
        Self { selected: 0, list_state: ListState::default(), export_dir, message: None }
    }

    fn source_label(source: &FontSource) -> String {
        match source {
            FontSource::Url(url) => url.clone(),
            FontSource::Embedded { mime_type, len } => {
                format!("embedded {} ({len} bytes)", mime_type.as_deref().unwrap_or("data"))
            }
            FontSource::Unavailable => "-".to_string(),
        }
    }

    fn font_item(entry: &FontEntry) -> ListItem<'static> {
        let checkbox = if entry.selected { "[x] " } else { "[ ] " };
        ListItem::new(Line::from(vec![
            Span::raw(checkbox),
            Span::styled(entry.descriptor.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                "  {}  {}  {}",
                entry.descriptor.loaded_name,
                entry.descriptor.font_type,
                Self::source_label(&entry.source)
            )),
        ]))
    }
}

impl Panel for FontsPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, host: &PanelHost, theme: &Theme) {
        let block = Block::default()
            .title(" Font Inspector ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.focused_border));

        let fonts = host.font_inspector().map(|inspector| inspector.fonts()).unwrap_or_default();
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        if fonts.is_empty() {
            frame.render_widget(Paragraph::new("No fonts loaded"), chunks[0]);
        } else {
            self.selected = self.selected.min(fonts.len() - 1);
            let list = List::new(fonts.iter().map(Self::font_item).collect::<Vec<_>>())
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            self.list_state.select(Some(self.selected));
            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let footer = self
            .message
            .clone()
            .unwrap_or_else(|| "Space: show/hide text  d: download  r: reset".to_string());
        frame.render_widget(
            Paragraph::new(footer).style(Style::default().fg(theme.disabled)),
            chunks[1],
        );
    }

    fn handle_key_event(&mut self, event: KeyEvent, host: &mut PanelHost) -> Result<EventResponse> {
        let Some(inspector) = host.font_inspector_mut() else {
            return Ok(EventResponse::NotHandled);
        };
        let len = inspector.fonts().len();

        match event.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = move_selection(self.selected, -1, len),
            KeyCode::Down | KeyCode::Char('j') => self.selected = move_selection(self.selected, 1, len),
            KeyCode::Char(' ') => {
                if let Some(entry) = inspector.fonts().get(self.selected) {
                    let loaded_name = entry.descriptor.loaded_name.clone();
                    let show = !entry.selected;
                    inspector.select_font(&loaded_name, show);
                }
            }
            KeyCode::Char('r') => {
                inspector.reset_selection();
                self.message = None;
            }
            KeyCode::Char('d') => {
                if let Some(entry) = inspector.fonts().get(self.selected) {
                    let name = entry.descriptor.loaded_name.clone();
                    self.message = Some(match inspector.export_font(&name, &self.export_dir) {
                        Ok(path) => format!("Saved {}", path.display()),
                        Err(e) => {
                            warn!("Font export failed: {}", e);
                            e.to_string()
                        }
                    });
                }
            }
            _ => return Ok(EventResponse::NotHandled),
        }
        Ok(EventResponse::Handled)
    }

    fn tool_id(&self) -> ToolId {
        ToolId::FontInspector
    }
}
