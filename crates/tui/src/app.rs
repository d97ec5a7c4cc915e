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

//! Main application state and logic
//!
//! This module contains the panel switching, the pause controls and the
//! routing of key events to the active panel.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eyre::Result;
use pdfbug_engine::{PanelHost, SharedHost, ToolId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tracing::{debug, info};

use crate::{
    config::Theme,
    panels::{EventResponse, FontsPanel, Panel, StatsPanel, StepperPanel},
};

/// Application state
#[derive(Debug)]
pub struct App {
    host: SharedHost,
    panels: Vec<Box<dyn Panel>>,
    theme: Theme,
    should_exit: bool,
}

impl App {
    /// Create the application over a shared panel host
    pub fn new(host: SharedHost, theme: Theme, export_dir: PathBuf) -> Self {
        let panels: Vec<Box<dyn Panel>> = vec![
            Box::new(FontsPanel::new(export_dir)),
            Box::new(StepperPanel::new()),
            Box::new(StatsPanel::new()),
        ];
        Self { host, panels, theme, should_exit: false }
    }

    /// The shared panel host
    pub fn host(&self) -> &SharedHost {
        &self.host
    }

    /// Whether the user asked to quit
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn panel_mut(&mut self, id: ToolId) -> Option<&mut Box<dyn Panel>> {
        self.panels.iter_mut().find(|panel| panel.tool_id() == id)
    }

    /// Draw the whole interface
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let host = self.host.clone();
        let host = host.lock();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        self.render_tabs(frame, chunks[0], &host);

        let theme = self.theme;
        match host.active_slot() {
            Some(slot) if slot.is_enabled() => {
                if let Some(panel) = self.panel_mut(slot.id()) {
                    panel.render(frame, chunks[1], &host, &theme);
                }
            }
            Some(slot) => {
                let message = slot.disabled_message().unwrap_or_default();
                let paragraph = Paragraph::new(message)
                    .style(Style::default().fg(theme.disabled))
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .title(format!(" {} ", slot.name()))
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(theme.unfocused_border)),
                    );
                frame.render_widget(paragraph, chunks[1]);
            }
            None => {}
        }

        Self::render_status(frame, chunks[2], &host);
    }

    fn render_tabs(&self, frame: &mut Frame<'_>, area: Rect, host: &PanelHost) {
        let titles: Vec<Line<'_>> = host
            .slots()
            .iter()
            .map(|slot| {
                let style = if slot.is_enabled() {
                    Style::default()
                } else {
                    Style::default().fg(self.theme.disabled)
                };
                Line::styled(slot.name(), style)
            })
            .collect();

        let tabs = Tabs::new(titles)
            .select(host.active_index().unwrap_or(0))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .block(
                Block::default()
                    .title(" PDFBug ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.unfocused_border)),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status(frame: &mut Frame<'_>, area: Rect, host: &PanelHost) {
        let paused = host.stepper().and_then(|registry| registry.paused_at());
        let text = match paused {
            Some((page, op)) => format!(
                " Paused before operation {op} on page {} | s: step  c: continue  q: quit",
                page + 1
            ),
            None => " Tab: switch panel  q: quit".to_string(),
        };
        frame.render_widget(Paragraph::new(text), area);
    }

    /// Handle a key press
    pub fn handle_key_event(&mut self, event: KeyEvent) -> Result<EventResponse> {
        if event.kind != KeyEventKind::Press {
            return Ok(EventResponse::Handled);
        }

        let host = self.host.clone();
        let mut host = host.lock();

        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_exit = true;
                return Ok(EventResponse::Exit);
            }
            KeyCode::Char('q') => {
                self.should_exit = true;
                return Ok(EventResponse::Exit);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let len = host.slots().len();
                let current = host.active_index().unwrap_or(0);
                let next = if event.code == KeyCode::Tab {
                    (current + 1) % len
                } else {
                    (current + len - 1) % len
                };
                host.select_panel(next);
                return Ok(EventResponse::Handled);
            }
            KeyCode::Char(c) if host.handle_key_code(c.to_ascii_uppercase() as u32) => {
                debug!("Resumed renderer with '{}'", c);
                return Ok(EventResponse::Handled);
            }
            _ => {}
        }

        let Some(id) = host.active_slot().filter(|slot| slot.is_enabled()).map(|slot| slot.id())
        else {
            return Ok(EventResponse::NotHandled);
        };
        match self.panel_mut(id) {
            Some(panel) => panel.handle_key_event(event, &mut host),
            None => Ok(EventResponse::NotHandled),
        }
    }

    /// Release the renderer and clean up every tool
    pub fn shutdown(&mut self) {
        info!("Cleaning up debugging tools");
        self.host.lock().cleanup();
    }
}
