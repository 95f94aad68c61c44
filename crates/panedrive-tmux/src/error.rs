//! Error types for the tmux backend.

use std::fmt;
use std::time::Duration;

use panedrive_core::AddressError;
use thiserror::Error;

/// Level of the tmux hierarchy a lookup failed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Session,
    Window,
    Pane,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Session => "session",
            Self::Window => "window",
            Self::Pane => "pane",
        })
    }
}

#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("tmux command failed: {0}")]
    CommandFailed(String),

    #[error("tmux binary {0:?} not found")]
    BinaryNotFound(String),

    #[error("failed to parse tmux output line {line_num}: {detail}")]
    ParseError { line_num: usize, detail: String },

    #[error("tmux io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("{kind} {name:?} not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("invalid session name {name:?}: tmux does not allow {forbidden:?} in session names")]
    InvalidSessionName { name: String, forbidden: char },

    #[error(
        "pane index {index} out of range for window {window:?} in session {session:?} (available panes: {available})"
    )]
    PaneIndexOutOfRange {
        index: i64,
        session: String,
        window: String,
        available: usize,
    },

    #[error("command in pane {pane} did not complete within {waited:?}")]
    WaitTimedOut { pane: String, waited: Duration },

    #[error("wait for pane {pane} cancelled")]
    Cancelled { pane: String },
}

impl TmuxError {
    pub(crate) fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// tmux reports a missing server (or a missing socket file) as a command
    /// failure. Any other connection error, such as a permission problem on a
    /// shared socket, is a real failure.
    pub fn is_no_server(&self) -> bool {
        match self {
            Self::CommandFailed(msg) => {
                msg.contains("no server running")
                    || (msg.contains("error connecting to")
                        && msg.contains("(No such file or directory)"))
            }
            _ => false,
        }
    }
}
