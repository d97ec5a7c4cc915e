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

//! Terminal User Interface for PDFBug
//!
//! This crate draws the debugging panels of a [`pdfbug_engine::PanelHost`]
//! in the terminal and forwards key presses to the tools, including the
//! step and continue keys that release a paused renderer.

mod app;
mod config;
mod panels;

pub use app::App;
pub use config::{ColorScheme, Config, SessionConfig, Theme, UiConfig};
pub use panels::EventResponse;

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use futures::StreamExt;
use pdfbug_engine::SharedHost;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, time::Duration};
use tokio::{select, time::interval};
use tracing::{debug, info};

/// Configuration for the TUI
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Terminal refresh interval
    pub refresh_interval: Duration,
    /// Enable mouse support
    pub enable_mouse: bool,
    /// Directory receiving exported font programs
    pub export_dir: PathBuf,
    /// Resolved colors
    pub theme: Theme,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(50),
            enable_mouse: false,
            export_dir: PathBuf::from("."),
            theme: Theme::default(),
        }
    }
}

impl TuiConfig {
    /// Build the runtime configuration from the user configuration file
    pub fn from_config(config: &Config, export_dir: PathBuf) -> Self {
        Self {
            refresh_interval: Duration::from_millis(config.ui.refresh_interval_ms.max(1)),
            enable_mouse: config.ui.enable_mouse,
            export_dir,
            theme: config.colors.theme(),
        }
    }
}

/// Main TUI runner that manages the terminal interface and event loop
pub struct Tui {
    /// The main application state and panel management
    app: App,
    /// Terminal backend for rendering and input handling
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Configuration settings for the TUI behavior
    config: TuiConfig,
}

impl Tui {
    /// Create a new TUI instance
    pub fn new(host: SharedHost, config: TuiConfig) -> Result<Self> {
        info!("Initializing TUI with config: {:?}", config);

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.enable_mouse {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let app = App::new(host, config.theme, config.export_dir.clone());

        Ok(Self { app, terminal, config })
    }

    /// Run the main TUI event loop
    ///
    /// The renderer runs on its own task and changes the host between ticks,
    /// so the screen is redrawn on every tick as well as on every event.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting TUI event loop");

        let mut event_stream = EventStream::new();
        let mut ticker = interval(self.config.refresh_interval);

        let result = loop {
            if let Err(e) = self.terminal.draw(|frame| self.app.render(frame)) {
                break Err(e.into());
            }

            select! {
                event_result = event_stream.next() => {
                    match event_result {
                        Some(Ok(Event::Key(key_event))) => {
                            if self.handle_key_event(key_event)? {
                                break Ok(());
                            }
                        }
                        Some(Ok(Event::Mouse(mouse_event))) if self.config.enable_mouse => {
                            // Wheel scrolling moves the selection of the active panel.
                            let code = match mouse_event.kind {
                                MouseEventKind::ScrollUp => Some(KeyCode::Up),
                                MouseEventKind::ScrollDown => Some(KeyCode::Down),
                                _ => None,
                            };
                            if let Some(code) = code {
                                self.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))?;
                            }
                        }
                        Some(Ok(Event::Resize(width, height))) => {
                            debug!("Terminal resized: {}x{}", width, height);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => break Err(e.into()),
                        None => break Ok(()),
                    }
                }

                _ = ticker.tick() => {}
            }

            if self.app.should_exit() {
                info!("App requested exit");
                break Ok(());
            }
        };

        self.app.shutdown();
        info!("TUI event loop ended");
        result
    }

    // Handle a single key event, returning true if the app should exit
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        match self.app.handle_key_event(key_event)? {
            EventResponse::Exit => {
                info!("Exit requested");
                return Ok(true);
            }
            EventResponse::Handled => {}
            EventResponse::NotHandled => {
                debug!("Unhandled key event: {:?}", key_event);
            }
        }

        Ok(false)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        if self.config.enable_mouse {
            let _ =
                execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        } else {
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Public API for the TUI module
pub mod api {
    use super::*;

    /// Start the TUI over `host` with the given configuration
    pub async fn start_tui(host: SharedHost, config: TuiConfig) -> Result<()> {
        let tui = Tui::new(host, config)?;
        tui.run().await
    }
}
