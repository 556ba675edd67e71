/// Batch state definitions for tracking run progress
///
/// This module defines the phases a batch run goes through, from reading input
/// to replacing the output file.
use std::fmt;

/// Represents the current phase of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchState {
    // ===== Active States =====
    /// Coordinator built, nothing read yet
    Idle,

    /// Reading input lines and extracting URLs
    Scanning,

    /// Answering a URL from the resume cache or handing it to a worker
    Dispatching,

    /// Input exhausted, waiting for outstanding workers
    Draining,

    /// Flushing the temporary file and moving it over the final path
    Finalizing,

    // ===== Terminal States =====
    /// Output replaced successfully
    Done,

    /// The run hit an unrecoverable I/O error; previous output left in place
    Aborted,
}

impl BatchState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Scanning and Dispatching alternate once per discovered URL. Any active
    /// state may abort.
    pub fn can_transition_to(&self, next: BatchState) -> bool {
        use BatchState::*;

        match (self, next) {
            (Idle, Scanning) => true,
            (Scanning, Dispatching) | (Dispatching, Scanning) => true,
            (Scanning, Draining) => true,
            (Draining, Finalizing) => true,
            (Finalizing, Done) => true,
            (from, Aborted) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Dispatching => "dispatching",
            Self::Draining => "draining",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
