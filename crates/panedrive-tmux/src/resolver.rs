//! Address → pane resolution, with optional creation of what is missing.
//!
//! Creation only ever adds: no session, window or pane is removed, resized or
//! renamed apart from the window tmux creates along with a new session. So
//! repeated calls converge on "at least N panes" instead of duplicating.

use panedrive_core::Address;

use crate::error::{ResourceKind, TmuxError};
use crate::executor::TmuxRunner;
use crate::handle::PaneHandle;
use crate::server::{self, PaneInfo, SessionInfo, WindowInfo};

/// tmux silently rewrites this to `_` when creating a session, so a session
/// created under such a name could never be found again by that name.
const FORBIDDEN_SESSION_CHAR: char = ':';

pub struct TargetResolver<R> {
    runner: R,
}

impl<R: TmuxRunner> TargetResolver<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Parse `address` and resolve it to a pane.
    ///
    /// Errors:
    /// - `TmuxError::Address`: malformed address
    /// - `TmuxError::InvalidSessionName`: the session name contains `:`
    /// - `TmuxError::NotFound`: a level is missing and `create_if_missing` is false
    /// - `TmuxError::PaneIndexOutOfRange`: negative pane index
    /// - anything tmux itself reports, unchanged
    pub fn resolve(&self, address: &str, create_if_missing: bool) -> Result<PaneHandle, TmuxError> {
        let address = Address::parse(address)?;
        self.resolve_address(&address, create_if_missing)
    }

    pub fn resolve_address(
        &self,
        address: &Address,
        create_if_missing: bool,
    ) -> Result<PaneHandle, TmuxError> {
        if address.session.contains(FORBIDDEN_SESSION_CHAR) {
            return Err(TmuxError::InvalidSessionName {
                name: address.session.clone(),
                forbidden: FORBIDDEN_SESSION_CHAR,
            });
        }
        let session = self.session(address, create_if_missing)?;
        let window = self.window(&session, address, create_if_missing)?;
        let (position, pane) = self.pane(&session, &window, address, create_if_missing)?;
        Ok(PaneHandle {
            session_id: session.id,
            session_name: session.name,
            window_id: window.id,
            window_index: window.index,
            window_name: window.name,
            pane_id: pane.id,
            pane_position: position,
        })
    }

    fn session(&self, address: &Address, create: bool) -> Result<SessionInfo, TmuxError> {
        let existing = server::list_sessions(&self.runner)?
            .into_iter()
            .find(|s| s.name == address.session);
        if let Some(session) = existing {
            return Ok(session);
        }
        if !create {
            return Err(TmuxError::not_found(ResourceKind::Session, &address.session));
        }

        let (session, first_window) = server::new_session(&self.runner, &address.session)?;
        tracing::debug!(session = %session.name, id = %session.id, "created session");
        self.normalize_first_window(&first_window, &address.window)?;
        Ok(session)
    }

    /// A new session comes with a window named after its shell. Reuse it for
    /// the requested window rather than leaving a stray one behind.
    fn normalize_first_window(&self, window: &WindowInfo, wanted: &str) -> Result<(), TmuxError> {
        if window.name != wanted {
            server::rename_window(&self.runner, &window.id, wanted)?;
            tracing::debug!(from = %window.name, to = %wanted, "renamed auto-created window");
        }
        Ok(())
    }

    fn window(
        &self,
        session: &SessionInfo,
        address: &Address,
        create: bool,
    ) -> Result<WindowInfo, TmuxError> {
        let windows = server::list_windows(&self.runner, &session.id)?;
        let by_name = windows.iter().position(|w| w.name == address.window);
        let by_index = || {
            address
                .window_index_hint()
                .and_then(|idx| windows.iter().position(|w| w.index == idx))
        };
        if let Some(pos) = by_name.or_else(by_index) {
            return Ok(windows[pos].clone());
        }
        if !create {
            return Err(TmuxError::not_found(
                ResourceKind::Window,
                format!("{}.{}", address.session, address.window),
            ));
        }

        let window = server::new_window(&self.runner, &session.id, &address.window)?;
        tracing::debug!(window = %window.name, id = %window.id, "created window");
        Ok(window)
    }

    fn pane(
        &self,
        session: &SessionInfo,
        window: &WindowInfo,
        address: &Address,
        create: bool,
    ) -> Result<(usize, PaneInfo), TmuxError> {
        let mut panes = server::list_panes(&self.runner, &window.id)?;
        let Ok(position) = usize::try_from(address.pane_index) else {
            return Err(TmuxError::PaneIndexOutOfRange {
                index: address.pane_index,
                session: session.name.clone(),
                window: window.name.clone(),
                available: panes.len(),
            });
        };

        while panes.len() <= position {
            if !create {
                return Err(TmuxError::not_found(
                    ResourceKind::Pane,
                    format!("{}.{}.{}", session.name, window.name, position),
                ));
            }
            let pane = server::split_window(&self.runner, &window.id)?;
            tracing::debug!(pane = %pane.id, window = %window.id, "split window");
            panes = server::list_panes(&self.runner, &window.id)?;
        }

        Ok((position, panes.swap_remove(position)))
    }
}
