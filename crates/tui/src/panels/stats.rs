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

//! Stats panel

use crossterm::event::{KeyCode, KeyEvent};
use eyre::Result;
use pdfbug_engine::{PanelHost, ToolId};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{EventResponse, Panel};
use crate::config::Theme;

/// Rendering statistics of every page, ordered by page number
#[derive(Debug, Default)]
pub struct StatsPanel {
    scroll: u16,
}

impl StatsPanel {
    /// Create a new stats panel
    pub fn new() -> Self {
        Self::default()
    }
}

impl Panel for StatsPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, host: &PanelHost, theme: &Theme) {
        let mut lines = Vec::new();
        for stats in host.stats().map(|collector| collector.stats()).unwrap_or_default() {
            lines.push(Line::from(Span::styled(
                format!("Page: {}", stats.page_number),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.extend(stats.text.lines().map(|line| Line::from(line.to_string())));
            lines.push(Line::from(""));
        }
        if lines.is_empty() {
            lines.push(Line::from("No page rendered yet"));
        }

        let paragraph = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(" Stats ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.focused_border)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn handle_key_event(&mut self, event: KeyEvent, _host: &mut PanelHost) -> Result<EventResponse> {
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => return Ok(EventResponse::NotHandled),
        }
        Ok(EventResponse::Handled)
    }

    fn tool_id(&self) -> ToolId {
        ToolId::Stats
    }
}
