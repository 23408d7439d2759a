// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Per-screen fetch state.
//!
//! Every fetch a screen starts is stamped with a generation. A completion is
//! applied only if its ticket still matches the newest generation and the
//! screen is still mounted, so a slow response can never overwrite a newer
//! one or touch a screen the user has left.

use crate::error::ConsoleResult;

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Loading,
    Ready(T),
    /// Display message of the error that ended the last fetch.
    Failed(String),
}

/// Proof of a started fetch. Hand it back to [`Screen::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct Screen<T> {
    state: ScreenState<T>,
    generation: u64,
    mounted: bool,
}

impl<T> Default for Screen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Screen<T> {
    pub fn new() -> Self {
        Self {
            state: ScreenState::Loading,
            generation: 0,
            mounted: true,
        }
    }

    pub fn state(&self) -> &ScreenState<T> {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ScreenState::Loading)
    }

    /// Start a fetch. Any fetch still in flight becomes stale.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = ScreenState::Loading;
        tracing::debug!(generation = self.generation, "Screen fetch started");
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns whether it was applied.
    pub fn complete(&mut self, ticket: FetchTicket, result: ConsoleResult<T>) -> bool {
        if !self.mounted {
            tracing::warn!(
                generation = ticket.generation,
                "Dropping completion for unmounted screen"
            );
            return false;
        }
        if ticket.generation != self.generation {
            tracing::warn!(
                stale = ticket.generation,
                current = self.generation,
                "Dropping stale completion"
            );
            return false;
        }

        self.state = match result {
            Ok(data) => ScreenState::Ready(data),
            Err(e) => {
                tracing::warn!(error = %e, "Screen fetch failed");
                ScreenState::Failed(e.to_string())
            }
        };
        true
    }

    /// Leave the screen. Later completions are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn into_state(self) -> ScreenState<T> {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;

    #[test]
    fn test_completion_applies() {
        let mut screen = Screen::new();
        let ticket = screen.begin();
        assert!(screen.is_loading());
        assert!(screen.complete(ticket, Ok(vec![1, 2, 3])));
        assert_eq!(screen.state(), &ScreenState::Ready(vec![1, 2, 3]));
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut screen = Screen::new();
        let first = screen.begin();
        let second = screen.begin();

        assert!(screen.complete(second, Ok("new")));
        assert!(!screen.complete(first, Ok("old")));
        assert_eq!(screen.state(), &ScreenState::Ready("new"));
    }

    #[test]
    fn test_stale_ticket_ignored_while_loading() {
        let mut screen: Screen<&str> = Screen::new();
        let first = screen.begin();
        let _second = screen.begin();
        assert!(!screen.complete(first, Ok("old")));
        assert!(screen.is_loading());
    }

    #[test]
    fn test_unmounted_screen_ignores_completion() {
        let mut screen: Screen<u32> = Screen::new();
        let ticket = screen.begin();
        screen.unmount();
        assert!(!screen.complete(ticket, Ok(7)));
        assert!(screen.is_loading());
    }

    #[test]
    fn test_failure_becomes_state() {
        let mut screen: Screen<u32> = Screen::new();
        let ticket = screen.begin();
        let err = ConsoleError::FetchFailed {
            url: "http://localhost:8000/v0/projects".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(screen.complete(ticket, Err(err)));
        match screen.state() {
            ScreenState::Failed(message) => assert!(message.contains("connection refused")),
            other => panic!("unexpected state {other:?}"),
        }
    }
}
