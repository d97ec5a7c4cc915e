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

//! Per-page rendering statistics.

use std::{
    collections::HashMap,
    fmt,
    time::{Duration, Instant},
};

use tracing::warn;

use super::{DebugTool, ToolId};
use crate::DebuggerContext;

/// A finished timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    /// Name the timer was started with.
    pub name: String,
    /// Elapsed time.
    pub duration: Duration,
}

/// Named wall-clock timers of one page render.
#[derive(Debug, Clone, Default)]
pub struct StatTimer {
    started: HashMap<String, Instant>,
    times: Vec<TimeEntry>,
}

impl StatTimer {
    /// Creates a timer with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing `name`. A timer already running under that name is kept.
    pub fn time(&mut self, name: &str) {
        if self.started.contains_key(name) {
            warn!("Timer is already running for {}", name);
            return;
        }
        self.started.insert(name.to_string(), Instant::now());
    }

    /// Stops timing `name`. Unknown names are ignored.
    pub fn time_end(&mut self, name: &str) {
        let Some(start) = self.started.remove(name) else {
            warn!("Timer has not been started for {}", name);
            return;
        };
        self.record(name, start.elapsed());
    }

    /// Records a finished timing directly.
    pub fn record(&mut self, name: &str, duration: Duration) {
        self.times.push(TimeEntry { name: name.to_string(), duration });
    }

    /// Finished timings in completion order.
    pub fn entries(&self) -> &[TimeEntry] {
        &self.times
    }
}

impl fmt::Display for StatTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let longest = self.times.iter().map(|t| t.name.chars().count()).max().unwrap_or(0);
        for entry in &self.times {
            writeln!(f, "{:<longest$} {}ms", entry.name, entry.duration.as_millis())?;
        }
        Ok(())
    }
}

/// Statistics text of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStats {
    /// One-based page number.
    pub page_number: usize,
    /// Rendered statistics.
    pub text: String,
}

/// The stats tool: the latest statistics of every rendered page.
#[derive(Debug, Default)]
pub struct StatsCollector {
    stats: Vec<PageStats>,
    active: bool,
}

impl StatsCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the statistics of `page_number`, replacing earlier ones.
    ///
    /// Empty statistics are ignored.
    pub fn add(&mut self, page_number: usize, stats: &impl fmt::Display) {
        let text = stats.to_string();
        if text.trim().is_empty() {
            return;
        }
        self.stats.retain(|s| s.page_number != page_number);
        let pos = self.stats.partition_point(|s| s.page_number < page_number);
        self.stats.insert(pos, PageStats { page_number, text });
    }

    /// Statistics ordered by page number.
    pub fn stats(&self) -> &[PageStats] {
        &self.stats
    }

    /// Whether the stats panel is active.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl DebugTool for StatsCollector {
    fn id(&self) -> ToolId {
        ToolId::Stats
    }

    fn init(&mut self, _ctx: &DebuggerContext) {}

    fn cleanup(&mut self) {
        self.stats.clear();
    }

    fn activate(&mut self, active: bool) {
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_display_pads_names() {
        let mut timer = StatTimer::new();
        timer.record("Overall", Duration::from_millis(42));
        timer.record("Page Request", Duration::from_millis(3));

        assert_eq!(timer.to_string(), "Overall      42ms\nPage Request 3ms\n");
    }

    #[test]
    fn test_timer_misuse_is_ignored() {
        let mut timer = StatTimer::new();
        timer.time_end("never started");
        assert!(timer.entries().is_empty());

        timer.time("Rendering");
        timer.time("Rendering");
        timer.time_end("Rendering");
        timer.time_end("Rendering");
        assert_eq!(timer.entries().len(), 1);
        assert_eq!(timer.entries()[0].name, "Rendering");
    }

    #[test]
    fn test_add_replaces_and_sorts() {
        let mut collector = StatsCollector::new();
        collector.add(3, &"third");
        collector.add(1, &"first");
        collector.add(3, &"third again");
        collector.add(2, &"  ");

        let pages: Vec<_> = collector.stats().iter().map(|s| (s.page_number, s.text.as_str())).collect();
        assert_eq!(pages, vec![(1, "first"), (3, "third again")]);

        collector.cleanup();
        assert!(collector.stats().is_empty());
    }
}
