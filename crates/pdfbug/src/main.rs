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

//! PDFBug - Operator List Debugger
//!
//! Replays a recorded PDF document operation by operation, with breakpoints,
//! stepping, a font inspector and per-page rendering statistics.

use std::path::PathBuf;

use clap::Parser;
use eyre::Result;
use pdfbug_common::types::{BreakpointLocation, RecordedDocument};
use pdfbug_tui::Config;

mod cmd;

/// Command-line interface for PDFBug
#[derive(Debug, Parser)]
#[command(name = "pdfbug")]
#[command(about = "PDFBug - step through the operator lists of a recorded PDF document")]
#[command(version)]
pub struct Cli {
    /// Recorded document (JSON with `pages` of `fnArray`/`argsArray`)
    pub recording: PathBuf,

    /// Tools to enable: "all" or a comma separated list of FontInspector, Stepper, Stats
    #[arg(long, env = "PDFBUG_TOOLS")]
    pub tools: Option<String>,

    /// Configuration file (default: ~/.pdfbug.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Breakpoint session name
    #[arg(long)]
    pub session: Option<String>,

    /// Directory holding breakpoint sessions
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Keep breakpoints in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Operations handed to the debugger per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Run without the terminal UI, continuing through every pause
    #[arg(long)]
    pub headless: bool,

    /// Add a breakpoint before running, as <page>:<index> (zero-based)
    #[arg(long = "break", value_name = "PAGE:INDEX")]
    pub breakpoints: Vec<BreakpointLocation>,

    /// Directory receiving exported font programs
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal UI owns stdout, so interactive sessions log to a file only
    if cli.headless {
        pdfbug_common::logging::init_logging("pdfbug", false)?;
    } else {
        let log_file = pdfbug_common::logging::init_file_only_logging("pdfbug")?;
        eprintln!("Logging to {}", log_file.display());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    tracing::info!("Loading recording: {}", cli.recording.display());
    let doc = RecordedDocument::from_path(&cli.recording)?;
    tracing::info!("Recording has {} pages and {} fonts", doc.pages.len(), doc.fonts.len());

    let session = cmd::Session::prepare(&cli, &config, &doc)?;

    if cli.headless {
        cmd::run_headless(session, doc).await
    } else {
        cmd::run_interactive(session, doc, &cli, &config).await
    }
}
