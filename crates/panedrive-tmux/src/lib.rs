//! panedrive-tmux: tmux backend for pane addressing and command driving.
//! Subprocess execution, hierarchy queries and creation, keystroke injection
//! and capture, plus the two front components built on them:
//! [`TargetResolver`] and [`PaneController`].

pub mod capture;
pub mod controller;
pub mod error;
pub mod executor;
pub mod handle;
pub mod resolver;
pub mod server;

#[cfg(test)]
pub(crate) mod fake;

pub use capture::{capture_pane, send_keys};
pub use controller::{PaneController, RunOptions, RunOutcome};
pub use error::{ResourceKind, TmuxError};
pub use executor::{TmuxExecutor, TmuxRunner};
pub use handle::PaneHandle;
pub use resolver::TargetResolver;
pub use server::{PaneInfo, SessionInfo, WindowInfo};
