//! Non-owning reference to a pane living in the tmux server.

use std::fmt;

use serde::Serialize;

/// Lookup key for a resolved pane.
///
/// The pane belongs to the tmux server and outlives this process; dropping a
/// handle does nothing. Resolving the same address twice yields equal handles.
/// If the pane is killed, commands targeting the handle fail with
/// `TmuxError::CommandFailed` and the address must be resolved again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PaneHandle {
    pub session_id: String,
    pub session_name: String,
    pub window_id: String,
    pub window_index: u32,
    pub window_name: String,
    /// tmux pane id, e.g. `%12`. Stable for the pane's lifetime.
    pub pane_id: String,
    /// Position within the window's pane list.
    pub pane_position: usize,
}

impl PaneHandle {
    /// Value for tmux's `-t` flag.
    pub fn target(&self) -> &str {
        &self.pane_id
    }
}

/// `session.window.position`, the canonical address of the pane.
impl fmt::Display for PaneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.session_name, self.window_name, self.pane_position
        )
    }
}
