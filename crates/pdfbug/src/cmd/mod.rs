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

//! Command modules for the PDFBug CLI

pub mod headless;
pub mod interactive;

pub use headless::run_headless;
pub use interactive::run_interactive;

use std::sync::Arc;

use eyre::Result;
use pdfbug_common::types::RecordedDocument;
use pdfbug_engine::{
    BreakpointStorage, DebuggerContext, MemoryStorage, PanelHost, SessionStorage, SharedHost,
    ToolSelection,
};
use pdfbug_tui::Config;
use tracing::{info, warn};

use crate::Cli;

/// A debugging session ready to replay a document
#[derive(Debug)]
pub struct Session {
    /// Panel host shared by the renderer and the user interface
    pub host: SharedHost,
    /// Operations handed to the debugger per chunk
    pub chunk_size: usize,
}

impl Session {
    /// Builds the context, initializes the selected tools and applies `--break`.
    pub fn prepare(cli: &Cli, config: &Config, doc: &RecordedDocument) -> Result<Self> {
        let storage: Arc<dyn BreakpointStorage> = if cli.no_persist || !config.session.persist {
            info!("Breakpoints are kept in memory only");
            Arc::new(MemoryStorage::new())
        } else {
            let name = cli.session.as_deref().unwrap_or(&config.session.name);
            let root = cli.storage_dir.clone().or_else(|| config.session.storage_dir.clone());
            let storage = SessionStorage::new(root, name)?;
            info!("Breakpoint session {:?} at {}", name, storage.dir().display());
            Arc::new(storage)
        };

        let ctx = DebuggerContext::new(doc.opcode_table(), storage);
        let selection = ToolSelection::parse(cli.tools.as_deref().unwrap_or(&config.tools));

        let mut host = PanelHost::new();
        host.init(&ctx, &selection);

        if !cli.breakpoints.is_empty() {
            match host.stepper_mut() {
                Some(registry) => {
                    for location in &cli.breakpoints {
                        registry.toggle_breakpoint(location.page_index, location.op_index, true);
                        info!("Breakpoint added at {}", location);
                    }
                }
                None => warn!("Stepper is disabled, ignoring {} breakpoints", cli.breakpoints.len()),
            }
        }

        let chunk_size = cli.chunk_size.unwrap_or(config.ui.chunk_size);
        Ok(Self { host: host.into_shared(), chunk_size })
    }
}
