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

//! Configuration system for PDFBug
//!
//! Manages the enabled tools, the breakpoint session, UI timings and colors.

use eyre::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// User configuration, stored as TOML in `~/.pdfbug.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tools to enable: `"all"` or a comma separated list
    pub tools: String,
    /// Breakpoint session settings
    pub session: SessionConfig,
    /// UI settings
    pub ui: UiConfig,
    /// Color scheme
    pub colors: ColorScheme,
}

/// Breakpoint session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session name; breakpoints are shared by runs using the same name
    pub name: String,
    /// Directory holding session data (system temp directory if unset)
    pub storage_dir: Option<PathBuf>,
    /// Persist breakpoints at all
    pub persist: bool,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Terminal refresh interval in milliseconds
    pub refresh_interval_ms: u64,
    /// Operations handed to the debugger per chunk during replay
    pub chunk_size: usize,
    /// Capture the mouse; the wheel scrolls the active panel
    pub enable_mouse: bool,
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    /// Background of the operation the renderer is paused before
    pub highlight_bg: String,
    /// Breakpoint marker color
    pub breakpoint: String,
    /// Focused panel border color
    pub focused_border: String,
    /// Unfocused panel border color
    pub unfocused_border: String,
    /// Text color of disabled tools
    pub disabled: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: "all".to_string(),
            session: SessionConfig::default(),
            ui: UiConfig::default(),
            colors: ColorScheme::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { name: "default".to_string(), storage_dir: None, persist: true }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { refresh_interval_ms: 50, chunk_size: 500, enable_mouse: false }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            highlight_bg: "dark_gray".to_string(),
            breakpoint: "red".to_string(),
            focused_border: "cyan".to_string(),
            unfocused_border: "gray".to_string(),
            disabled: "dark_gray".to_string(),
        }
    }
}

impl Config {
    /// Get the config file path (~/.pdfbug.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".pdfbug.toml"))
    }

    /// Load configuration from the default path, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found, creating default at {:?}", config_path);
            let default_config = Self::default();
            default_config.save_to_path(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from_path(config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;

        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Convert color string to ratatui Color
    pub fn parse_color(color_str: &str) -> Color {
        match color_str.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "light_gray" => Color::Gray,
            "dark_gray" => Color::DarkGray,
            "light_red" => Color::LightRed,
            "light_green" => Color::LightGreen,
            "light_yellow" => Color::LightYellow,
            "light_blue" => Color::LightBlue,
            "light_magenta" => Color::LightMagenta,
            "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            _ => {
                warn!("Unknown color '{}', using default gray", color_str);
                Color::Gray
            }
        }
    }
}

impl ColorScheme {
    /// Resolve every color of the scheme
    pub fn theme(&self) -> Theme {
        Theme {
            highlight_bg: Config::parse_color(&self.highlight_bg),
            breakpoint: Config::parse_color(&self.breakpoint),
            focused_border: Config::parse_color(&self.focused_border),
            unfocused_border: Config::parse_color(&self.unfocused_border),
            disabled: Config::parse_color(&self.disabled),
        }
    }
}

/// Resolved colors used while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Background of the paused operation
    pub highlight_bg: Color,
    /// Breakpoint marker
    pub breakpoint: Color,
    /// Focused border
    pub focused_border: Color,
    /// Unfocused border
    pub unfocused_border: Color,
    /// Disabled tool text
    pub disabled: Color,
}

impl Default for Theme {
    fn default() -> Self {
        ColorScheme::default().theme()
    }
}
