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

//! Replay of recorded operator lists.
//!
//! The [`ReplayRenderer`] plays the role of the host renderer: it hands the
//! operator list to the debugger chunk by chunk as if it were still being
//! produced, and calls the pre-execution hook before every operation.
//! Executing an operation is a no-op; the replay exists to drive stepping.

use pdfbug_common::types::{OperatorList, RecordedDocument};
use tracing::{debug, info, warn};

use crate::{tools::StatTimer, HookDecision, SharedHost};

/// Default number of operations handed over per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// How a page render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every operation was executed.
    Completed {
        /// Number of executed operations.
        executed: usize,
    },
    /// A pause was released without resuming.
    Aborted {
        /// Operation the renderer was paused before.
        at: usize,
    },
}

impl RenderOutcome {
    /// Whether the render was aborted.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

/// Replays operator lists through a [`SharedHost`].
#[derive(Debug, Clone)]
pub struct ReplayRenderer {
    host: SharedHost,
    chunk_size: usize,
}

impl ReplayRenderer {
    /// Creates a renderer feeding `host`.
    pub fn new(host: SharedHost) -> Self {
        Self { host, chunk_size: DEFAULT_CHUNK_SIZE }
    }

    /// Sets the chunk size. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The host this renderer reports to.
    pub fn host(&self) -> &SharedHost {
        &self.host
    }

    /// Renders one page, pausing wherever the debugger asks to.
    pub async fn render_page(&self, page_index: usize, page: &OperatorList) -> RenderOutcome {
        let mut timer = StatTimer::new();
        timer.time("Overall");
        self.host.lock().page_started(page_index);

        timer.time("Rendering");
        let mut shown = OperatorList::new();
        let mut executed = 0;
        for chunk in page.as_slice().chunks(self.chunk_size) {
            shown.extend_from_slice(chunk);
            self.host.lock().update_operator_list(page_index, &shown);

            for _ in chunk {
                let decision = self.host.lock().on_before_execute(page_index, executed);
                if let HookDecision::Pause(handle) = decision {
                    if let Err(e) = handle.await {
                        info!("Render of page {} aborted: {}", page_index, e);
                        return RenderOutcome::Aborted { at: executed };
                    }
                }
                executed += 1;
            }
            tokio::task::yield_now().await;
        }
        timer.time_end("Rendering");
        timer.time_end("Overall");

        debug!("Page {} rendered {} operations", page_index, executed);
        self.host.lock().page_finished(page_index, &timer);
        RenderOutcome::Completed { executed }
    }

    /// Renders every page of `doc` in order, stopping at the first aborted page.
    pub async fn render_document(&self, doc: &RecordedDocument) -> Vec<RenderOutcome> {
        for font in &doc.fonts {
            self.host.lock().font_added(&font.font, font.css.as_deref());
        }

        let mut outcomes = Vec::with_capacity(doc.pages.len());
        for (page_index, page) in doc.pages.iter().enumerate() {
            for font in &page.fonts {
                self.host.lock().font_added(&font.font, font.css.as_deref());
            }

            let outcome = self.render_page(page_index, &page.operator_list()).await;
            outcomes.push(outcome);
            if outcome.is_aborted() {
                warn!("Stopping document replay after page {}", page_index);
                break;
            }
        }
        outcomes
    }
}
