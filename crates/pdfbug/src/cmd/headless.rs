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

//! Headless command - replays the document and continues through every pause

use std::time::Duration;

use eyre::Result;
use pdfbug_common::types::RecordedDocument;
use pdfbug_engine::{RenderOutcome, ReplayRenderer, ResumeCommand};
use tokio::time::interval;
use tracing::info;

use super::Session;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Replays `doc`, continuing past every breakpoint, then prints a report
pub async fn run_headless(session: Session, doc: RecordedDocument) -> Result<()> {
    let renderer = ReplayRenderer::new(session.host.clone()).with_chunk_size(session.chunk_size);
    let mut render = tokio::spawn(async move { renderer.render_document(&doc).await });

    let mut ticker = interval(POLL_INTERVAL);
    let outcomes = loop {
        tokio::select! {
            result = &mut render => break result?,
            _ = ticker.tick() => {
                let mut host = session.host.lock();
                let paused = host.stepper().and_then(|registry| registry.paused_at());
                if let Some((page, op)) = paused {
                    println!("Breakpoint hit on page {} before operation {}", page + 1, op);
                    host.resume(ResumeCommand::Continue);
                }
            }
        }
    };

    info!("Replay finished");
    print_report(&session, &outcomes);
    session.host.lock().cleanup();
    Ok(())
}

fn print_report(session: &Session, outcomes: &[RenderOutcome]) {
    let host = session.host.lock();

    for (page, outcome) in outcomes.iter().enumerate() {
        match outcome {
            RenderOutcome::Completed { executed } => {
                println!("Page {}: completed, {} operations", page + 1, executed)
            }
            RenderOutcome::Aborted { at } => {
                println!("Page {}: aborted before operation {}", page + 1, at)
            }
        }
    }

    if let Some(inspector) = host.font_inspector() {
        for entry in inspector.fonts() {
            println!(
                "Font {} ({}, {})",
                entry.descriptor.name, entry.descriptor.loaded_name, entry.descriptor.font_type
            );
        }
    }

    if let Some(collector) = host.stats() {
        for stats in collector.stats() {
            println!("Page: {}", stats.page_number);
            print!("{}", stats.text);
        }
    }
}
