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

//! Interactive command - replays the document behind the terminal UI

use eyre::Result;
use pdfbug_common::types::RecordedDocument;
use pdfbug_engine::ReplayRenderer;
use pdfbug_tui::{Config, TuiConfig};
use tracing::{error, info};

use super::Session;
use crate::Cli;

/// Runs the renderer on its own task and the terminal UI on this one
pub async fn run_interactive(
    session: Session,
    doc: RecordedDocument,
    cli: &Cli,
    config: &Config,
) -> Result<()> {
    let renderer = ReplayRenderer::new(session.host.clone()).with_chunk_size(session.chunk_size);
    let render = tokio::spawn(async move {
        let outcomes = renderer.render_document(&doc).await;
        info!(
            "Replay finished: {} pages, {} aborted",
            outcomes.len(),
            outcomes.iter().filter(|o| o.is_aborted()).count()
        );
    });

    info!("Launching Terminal UI...");
    let tui_config = TuiConfig::from_config(config, cli.export_dir.clone());
    let result = pdfbug_tui::api::start_tui(session.host.clone(), tui_config).await;
    if let Err(e) = &result {
        error!("TUI failed: {}", e);
    }

    // The UI released any pending pause on exit; stop whatever is left.
    render.abort();
    info!("Shutting down PDFBug...");
    result
}
