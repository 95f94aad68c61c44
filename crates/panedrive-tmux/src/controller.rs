//! Run a command in a pane and block until it has finished.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use panedrive_core::{CompletionMarker, classify, compose_command, warmup_delay};

use crate::capture::{capture_pane, send_keys};
use crate::error::TmuxError;
use crate::executor::TmuxRunner;
use crate::handle::PaneHandle;

/// Options for [`PaneController::run`].
///
/// The defaults wait without limit: a command that produces no output for an
/// hour looks the same as a wedged one. Set `timeout` or `cancel` to bound it.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Press Enter after typing the command.
    pub send_enter: bool,
    /// Poll until the completion marker appears.
    pub wait: bool,
    /// Delay between captures.
    pub poll_interval: Duration,
    /// Fixed part of the delay between typing and the first capture.
    pub warmup_base: Duration,
    /// Typing speed assumed for the length-dependent part of the warm-up.
    pub warmup_chars_per_sec: u32,
    pub timeout: Option<Duration>,
    /// Checked between captures; set it from another thread to stop waiting.
    pub cancel: Option<Arc<AtomicBool>>,
    /// Use this marker instead of a freshly generated one.
    pub marker: Option<CompletionMarker>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            send_enter: true,
            wait: true,
            poll_interval: Duration::from_millis(100),
            warmup_base: Duration::from_secs(1),
            warmup_chars_per_sec: 80,
            timeout: None,
            cancel: None,
            marker: None,
        }
    }
}

impl RunOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: CompletionMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// What a finished [`PaneController::run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub pane: PaneHandle,
    /// Exactly what was typed, marker included.
    pub command: String,
    pub marker: CompletionMarker,
    /// False when `wait` was off.
    pub completed: bool,
    pub polls: u32,
    pub elapsed: Duration,
}

pub struct PaneController<R> {
    runner: R,
}

impl<R: TmuxRunner> PaneController<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Type `cmd` into `pane` and, if `opts.wait`, block until it finishes.
    ///
    /// Callers must serialize runs against the same pane: keystrokes from
    /// concurrent runs interleave.
    pub fn run(
        &self,
        pane: &PaneHandle,
        cmd: &str,
        opts: &RunOptions,
    ) -> Result<RunOutcome, TmuxError> {
        let started = Instant::now();
        let marker = opts.marker.clone().unwrap_or_else(CompletionMarker::generate);
        let command = compose_command(cmd, &marker);

        if opts.cancelled() {
            return Err(TmuxError::Cancelled {
                pane: pane.to_string(),
            });
        }

        tracing::info!(pane = %pane, pane_id = %pane.pane_id, "sending command {command:?}");
        send_keys(&self.runner, pane.target(), &command, opts.send_enter)?;

        // Keystrokes take a while to show up in captures; polling before the
        // echo lands would read the previous command's screen.
        let warmup = warmup_delay(
            opts.warmup_base,
            opts.warmup_chars_per_sec,
            command.chars().count(),
        );
        thread::sleep(warmup);

        let mut outcome = RunOutcome {
            pane: pane.clone(),
            command,
            marker,
            completed: false,
            polls: 0,
            elapsed: Duration::ZERO,
        };
        if !opts.wait {
            outcome.elapsed = started.elapsed();
            return Ok(outcome);
        }

        let mut last_state = None;
        loop {
            if opts.cancelled() {
                return Err(TmuxError::Cancelled {
                    pane: pane.to_string(),
                });
            }

            let lines = capture_pane(&self.runner, pane.target())?;
            outcome.polls += 1;
            let state = classify(lines.as_slice(), &outcome.marker);
            if last_state != Some(state) {
                tracing::debug!(pane = %pane, ?state, polls = outcome.polls, "completion state");
                last_state = Some(state);
            }
            if state.is_complete() {
                outcome.completed = true;
                outcome.elapsed = started.elapsed();
                return Ok(outcome);
            }

            if let Some(limit) = opts.timeout {
                let waited = started.elapsed();
                if waited >= limit {
                    return Err(TmuxError::WaitTimedOut {
                        pane: pane.to_string(),
                        waited,
                    });
                }
            }
            thread::sleep(opts.poll_interval);
        }
    }
}
