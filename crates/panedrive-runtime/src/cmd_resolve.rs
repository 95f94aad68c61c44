//! `panedrive resolve` and `panedrive capture`.

use panedrive_tmux::{PaneHandle, TargetResolver, TmuxExecutor, capture_pane};

use crate::cli::{CaptureOpts, ResolveOpts};

pub fn cmd_resolve(executor: &TmuxExecutor, opts: &ResolveOpts) -> anyhow::Result<()> {
    let pane = TargetResolver::new(executor).resolve(&opts.address, opts.create)?;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&pane)?);
    } else {
        println!("{}", handle_line(&pane));
    }
    Ok(())
}

/// Capture never creates anything: there is nothing to read in a new pane.
pub fn cmd_capture(executor: &TmuxExecutor, opts: &CaptureOpts) -> anyhow::Result<()> {
    let pane = TargetResolver::new(executor).resolve(&opts.address, false)?;
    for line in capture_pane(executor, pane.target())? {
        println!("{line}");
    }
    Ok(())
}

/// `session.window.pane<TAB>pane_id`
fn handle_line(pane: &PaneHandle) -> String {
    format!("{pane}\t{}", pane.pane_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_line_format() {
        let pane = PaneHandle {
            session_id: "$2".into(),
            session_name: "work".into(),
            window_id: "@3".into(),
            window_index: 1,
            window_name: "logs".into(),
            pane_id: "%7".into(),
            pane_position: 2,
        };
        assert_eq!(handle_line(&pane), "work.logs.2\t%7");
    }
}
