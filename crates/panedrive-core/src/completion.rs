//! Completion detection for commands injected into a pane.
//!
//! tmux has no "command finished" signal, so every command is sent as
//! `<cmd>; echo <marker>` and the pane's screen is polled until the marker
//! shows up as a line of its own. The echoed command line also contains the
//! marker, and a long command may wrap so the marker is split across two
//! screen rows; [`classify`] tells these cases apart.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;

/// Joins the user command and the marker echo.
pub const ECHO_SEPARATOR: &str = "; echo ";

static MARKER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Sentinel token echoed after a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompletionMarker(String);

impl CompletionMarker {
    /// A marker unique to this process and call, so a marker left in
    /// scroll-back by an earlier command can never satisfy a later wait.
    pub fn generate() -> Self {
        let seq = MARKER_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!(
            "__panedrive_done_{}_{}_{}__",
            std::process::id(),
            Utc::now().timestamp_micros(),
            seq
        ))
    }

    /// A caller-chosen literal.
    pub fn fixed(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompletionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the text actually typed into the pane.
///
/// ```text
/// "make test"  -> "make test; echo M"
/// ""           -> "echo M"
/// "sleep 5 &"  -> "sleep 5 & echo M"
/// "ls;"        -> "ls; echo M"
/// ```
pub fn compose_command(cmd: &str, marker: &CompletionMarker) -> String {
    let trimmed = cmd.trim_end();
    if trimmed.trim_start().is_empty() {
        return format!("echo {marker}");
    }
    // `cmd &; echo` and `cmd;; echo` are syntax errors in POSIX shells.
    let ends_with_single = |c: char| {
        trimmed.ends_with(c) && !trimmed[..trimmed.len() - c.len_utf8()].ends_with(c)
    };
    if ends_with_single('&') || ends_with_single(';') {
        return format!("{trimmed} echo {marker}");
    }
    format!("{trimmed}{ECHO_SEPARATOR}{marker}")
}

/// Time to wait after injecting keystrokes before the first capture:
/// `base + len / chars_per_sec` seconds. A zero rate means `base` only.
pub fn warmup_delay(base: Duration, chars_per_sec: u32, len: usize) -> Duration {
    if chars_per_sec == 0 {
        return base;
    }
    base + Duration::from_secs_f64(len as f64 / f64::from(chars_per_sec))
}

/// What a capture says about the injected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// Marker not visible at all yet.
    Pending,
    /// The shell echoed the command line but has not printed the marker.
    MarkerEchoed,
    /// The marker was printed on a line of its own.
    Complete,
}

impl CompletionState {
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

/// Classify a capture, newest line last.
///
/// Scans from the bottom up. A row whose trimmed text is exactly the marker
/// means the command finished, unless the row above ends with the `echo` of
/// the injected line: then the row is the wrapped tail of the echoed command.
/// Otherwise a row that contains the marker, either alone or joined with the
/// row below it, is the echoed command and stops the scan.
pub fn classify<S: AsRef<str>>(lines: &[S], marker: &CompletionMarker) -> CompletionState {
    let marker = marker.as_str();
    let mut below = "";
    for (idx, line) in lines.iter().enumerate().rev() {
        let line = line.as_ref();
        if line.trim() == marker {
            let above = idx
                .checked_sub(1)
                .map(|i| lines[i].as_ref())
                .unwrap_or_default();
            if !ends_with_marker_echo(above) {
                return CompletionState::Complete;
            }
        }
        if line.contains(marker) || format!("{line}{below}").contains(marker) {
            return CompletionState::MarkerEchoed;
        }
        below = line;
    }
    CompletionState::Pending
}

/// `...; echo` or `... & echo` at the end of a screen row.
fn ends_with_marker_echo(row: &str) -> bool {
    row.trim_end()
        .strip_suffix("echo")
        .map(|head| {
            let head = head.trim_end();
            head.ends_with(';') || head.ends_with('&')
        })
        .unwrap_or(false)
}
