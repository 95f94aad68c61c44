//! `panedrive run`: resolve the address, type the command and wait for it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use panedrive_tmux::{PaneController, RunOutcome, TargetResolver, TmuxError, TmuxExecutor};

use crate::cli::RunOpts;

pub const EXIT_OK: i32 = 0;
pub const EXIT_TIMEOUT: i32 = 2;
pub const EXIT_INTERRUPTED: i32 = 3;

/// Entry point for `panedrive run`.
///
/// Returns an exit code:
/// - 0: command typed (and finished, unless `--no-wait`)
/// - 2: `--timeout-secs` elapsed first
/// - 3: interrupted (Ctrl-C)
///
/// Any other failure is returned as an error (exit code 1).
pub async fn cmd_run(executor: TmuxExecutor, opts: RunOpts) -> anyhow::Result<i32> {
    let cancel = Arc::new(AtomicBool::new(false));
    let run_opts = opts.run_options().with_cancel(Arc::clone(&cancel));
    let command = opts.command_line();
    let RunOpts {
        address, create, ..
    } = opts;

    // Resolution and the poll loop are blocking; keep them off the runtime so
    // Ctrl-C can still be observed.
    let mut task = tokio::task::spawn_blocking(move || {
        let pane = TargetResolver::new(&executor).resolve(&address, create)?;
        PaneController::new(&executor).run(&pane, &command, &run_opts)
    });

    let joined = tokio::select! {
        result = &mut task => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("ctrl-c received, cancelling wait");
            cancel.store(true, Ordering::SeqCst);
            task.await
        }
    };

    exit_code(joined.context("run task panicked")?)
}

pub(crate) fn exit_code(result: Result<RunOutcome, TmuxError>) -> anyhow::Result<i32> {
    match result {
        Ok(outcome) => {
            tracing::debug!(
                pane = %outcome.pane,
                completed = outcome.completed,
                polls = outcome.polls,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "run finished"
            );
            Ok(EXIT_OK)
        }
        Err(e @ TmuxError::WaitTimedOut { .. }) => {
            eprintln!("{e}");
            Ok(EXIT_TIMEOUT)
        }
        Err(TmuxError::Cancelled { .. }) => Ok(EXIT_INTERRUPTED),
        Err(e) => Err(e.into()),
    }
}
