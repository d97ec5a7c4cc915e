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

//! Suspend/resume protocol between the renderer and the user interface.
//!
//! When the pre-execution hook decides to stop, it hands the renderer a
//! [`PauseHandle`] and keeps the matching [`PendingPause`]. The renderer
//! awaits the handle; the user interface resolves the pending pause with a
//! [`ResumeCommand`]. The pending side is consumed on resolution, so a pause
//! can be resumed at most once. Dropping it without resolving cancels the
//! pause and the renderer sees [`DebuggerError::PauseCancelled`].

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::oneshot;
use tracing::trace;

use crate::DebuggerError;

/// How the user asked a paused renderer to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResumeCommand {
    /// Execute exactly one more operation, then pause again.
    Step,
    /// Run until the next breakpoint after the current operation.
    Continue,
}

impl ResumeCommand {
    /// Key code of the step key (`S`).
    pub const STEP_KEY_CODE: u32 = 83;
    /// Key code of the continue key (`C`).
    pub const CONTINUE_KEY_CODE: u32 = 67;

    /// Maps a key code to a command. Other keys map to `None`.
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            Self::STEP_KEY_CODE => Some(Self::Step),
            Self::CONTINUE_KEY_CODE => Some(Self::Continue),
            _ => None,
        }
    }

    /// Maps a typed character to a command, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        Self::from_key_code(c.to_ascii_uppercase() as u32)
    }
}

/// Outcome of the pre-execution hook.
#[derive(Debug)]
pub enum HookDecision {
    /// Execute the operation right away.
    Proceed,
    /// Wait on the handle before executing the operation.
    Pause(PauseHandle),
}

impl HookDecision {
    /// Whether the renderer has to wait.
    pub fn is_pause(&self) -> bool {
        matches!(self, Self::Pause(_))
    }
}

/// Renderer side of a pause. Resolves once the user steps or continues.
#[derive(Debug)]
pub struct PauseHandle {
    page_index: usize,
    op_index: usize,
    rx: oneshot::Receiver<ResumeCommand>,
}

impl PauseHandle {
    /// Page the renderer is paused on.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Operation the renderer is paused before.
    pub fn op_index(&self) -> usize {
        self.op_index
    }
}

impl Future for PauseHandle {
    type Output = Result<ResumeCommand, DebuggerError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let (page_index, op_index) = (self.page_index, self.op_index);
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| DebuggerError::PauseCancelled { page_index, op_index }))
    }
}

/// User-interface side of a pause.
#[derive(Debug)]
pub struct PendingPause {
    page_index: usize,
    op_index: usize,
    tx: oneshot::Sender<ResumeCommand>,
}

impl PendingPause {
    /// Page the renderer is paused on.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Operation the renderer is paused before.
    pub fn op_index(&self) -> usize {
        self.op_index
    }

    /// Wakes the renderer. Returns `false` if the renderer stopped waiting.
    pub fn resolve(self, command: ResumeCommand) -> bool {
        trace!(page = self.page_index, op = self.op_index, ?command, "resolving pause");
        self.tx.send(command).is_ok()
    }

    /// Releases the pause without resuming; the renderer observes a cancellation.
    pub fn cancel(self) {
        trace!(page = self.page_index, op = self.op_index, "cancelling pause");
    }
}

/// Creates the two halves of a pause before `op_index` on `page_index`.
pub fn pause_channel(page_index: usize, op_index: usize) -> (PendingPause, PauseHandle) {
    let (tx, rx) = oneshot::channel();
    (PendingPause { page_index, op_index, tx }, PauseHandle { page_index, op_index, rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(ResumeCommand::from_key_code(83), Some(ResumeCommand::Step));
        assert_eq!(ResumeCommand::from_key_code(67), Some(ResumeCommand::Continue));
        assert_eq!(ResumeCommand::from_key_code(13), None);

        assert_eq!(ResumeCommand::from_char('s'), Some(ResumeCommand::Step));
        assert_eq!(ResumeCommand::from_char('C'), Some(ResumeCommand::Continue));
        assert_eq!(ResumeCommand::from_char('x'), None);
    }

    #[tokio::test]
    async fn test_resolve_wakes_handle() {
        let (pending, handle) = pause_channel(2, 9);
        assert_eq!(handle.page_index(), 2);
        assert_eq!(handle.op_index(), 9);

        assert!(pending.resolve(ResumeCommand::Step));
        assert_eq!(handle.await.unwrap(), ResumeCommand::Step);
    }

    #[tokio::test]
    async fn test_cancel_reports_cancellation() {
        let (pending, handle) = pause_channel(0, 4);
        pending.cancel();

        match handle.await {
            Err(DebuggerError::PauseCancelled { page_index, op_index }) => {
                assert_eq!((page_index, op_index), (0, 4));
            }
            other => panic!("Expected cancellation, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_after_renderer_gone() {
        let (pending, handle) = pause_channel(0, 0);
        drop(handle);
        assert!(!pending.resolve(ResumeCommand::Continue));
    }
}
