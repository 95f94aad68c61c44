//! Session/window/pane queries and creation.
//!
//! Every query uses a tab-delimited `-F` format; names go last so a name
//! containing a tab still parses.

use serde::Serialize;

use crate::error::TmuxError;
use crate::executor::TmuxRunner;

pub const SESSION_FORMAT: &str = "#{session_id}\t#{session_name}";
pub const WINDOW_FORMAT: &str = "#{window_id}\t#{window_index}\t#{window_name}";
pub const PANE_FORMAT: &str = "#{pane_id}\t#{pane_index}";
/// Printed by `new-session -P`: the session plus its auto-created window.
pub const NEW_SESSION_FORMAT: &str =
    "#{session_id}\t#{window_id}\t#{window_index}\t#{session_name}\t#{window_name}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub id: String,
    pub index: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneInfo {
    pub id: String,
    pub index: u32,
}

/// All sessions on the server. A server that is not running has none.
pub fn list_sessions(runner: &impl TmuxRunner) -> Result<Vec<SessionInfo>, TmuxError> {
    let output = match runner.run(&["list-sessions", "-F", SESSION_FORMAT]) {
        Ok(out) => out,
        Err(e) if e.is_no_server() => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    parse_sessions(&output)
}

/// Windows of one session, in index order.
pub fn list_windows(
    runner: &impl TmuxRunner,
    session_id: &str,
) -> Result<Vec<WindowInfo>, TmuxError> {
    let output = runner.run(&["list-windows", "-t", session_id, "-F", WINDOW_FORMAT])?;
    parse_windows(&output)
}

/// Panes of one window, in tmux's layout order.
pub fn list_panes(runner: &impl TmuxRunner, window_id: &str) -> Result<Vec<PaneInfo>, TmuxError> {
    let output = runner.run(&["list-panes", "-t", window_id, "-F", PANE_FORMAT])?;
    parse_panes(&output)
}

/// Create a detached session. tmux always gives it one window, which is
/// returned alongside the session.
pub fn new_session(
    runner: &impl TmuxRunner,
    name: &str,
) -> Result<(SessionInfo, WindowInfo), TmuxError> {
    let output = runner.run(&["new-session", "-d", "-P", "-F", NEW_SESSION_FORMAT, "-s", name])?;
    let fields = single_row(&output, 5, "new-session")?;
    let index = parse_index(fields[2], 1, "window_index")?;
    Ok((
        SessionInfo {
            id: fields[0].to_string(),
            name: fields[3].to_string(),
        },
        WindowInfo {
            id: fields[1].to_string(),
            index,
            name: fields[4].to_string(),
        },
    ))
}

pub fn rename_window(runner: &impl TmuxRunner, window_id: &str, name: &str) -> Result<(), TmuxError> {
    runner.run(&["rename-window", "-t", window_id, name])?;
    Ok(())
}

/// Create a detached window at the session's next free index.
pub fn new_window(
    runner: &impl TmuxRunner,
    session_id: &str,
    name: &str,
) -> Result<WindowInfo, TmuxError> {
    let target = format!("{session_id}:");
    let output = runner.run(&[
        "new-window",
        "-d",
        "-P",
        "-F",
        WINDOW_FORMAT,
        "-t",
        &target,
        "-n",
        name,
    ])?;
    let mut windows = parse_windows(&output)?;
    windows.pop().ok_or_else(|| empty_output("new-window"))
}

/// Add one pane to a window without changing the active pane.
pub fn split_window(runner: &impl TmuxRunner, window_id: &str) -> Result<PaneInfo, TmuxError> {
    let output = runner.run(&["split-window", "-d", "-P", "-F", PANE_FORMAT, "-t", window_id])?;
    let mut panes = parse_panes(&output)?;
    panes.pop().ok_or_else(|| empty_output("split-window"))
}

pub fn parse_sessions(output: &str) -> Result<Vec<SessionInfo>, TmuxError> {
    rows(output, 2)
        .map(|row| -> Result<SessionInfo, TmuxError> {
            let (_, fields) = row?;
            Ok(SessionInfo {
                id: fields[0].to_string(),
                name: fields[1].to_string(),
            })
        })
        .collect()
}

pub fn parse_windows(output: &str) -> Result<Vec<WindowInfo>, TmuxError> {
    rows(output, 3)
        .map(|row| -> Result<WindowInfo, TmuxError> {
            let (line_num, fields) = row?;
            Ok(WindowInfo {
                id: fields[0].to_string(),
                index: parse_index(fields[1], line_num, "window_index")?,
                name: fields[2].to_string(),
            })
        })
        .collect()
}

pub fn parse_panes(output: &str) -> Result<Vec<PaneInfo>, TmuxError> {
    rows(output, 2)
        .map(|row| -> Result<PaneInfo, TmuxError> {
            let (line_num, fields) = row?;
            Ok(PaneInfo {
                id: fields[0].to_string(),
                index: parse_index(fields[1], line_num, "pane_index")?,
            })
        })
        .collect()
}

/// Non-empty lines split into exactly `fields` tab-separated fields; the last
/// field keeps any further tabs.
fn rows(
    output: &str,
    fields: usize,
) -> impl Iterator<Item = Result<(usize, Vec<&str>), TmuxError>> + '_ {
    output
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(move |(idx, line)| {
            let parts: Vec<&str> = line.splitn(fields, '\t').collect();
            if parts.len() < fields {
                return Err(TmuxError::ParseError {
                    line_num: idx + 1,
                    detail: format!(
                        "expected {fields} tab-separated fields, got {}",
                        parts.len()
                    ),
                });
            }
            Ok((idx + 1, parts))
        })
}

fn single_row<'a>(
    output: &'a str,
    fields: usize,
    command: &str,
) -> Result<Vec<&'a str>, TmuxError> {
    match rows(output, fields).next() {
        Some(row) => row.map(|(_, parts)| parts),
        None => Err(empty_output(command)),
    }
}

fn parse_index(field: &str, line_num: usize, what: &str) -> Result<u32, TmuxError> {
    field.trim().parse().map_err(|_| TmuxError::ParseError {
        line_num,
        detail: format!("{what} {field:?} is not a number"),
    })
}

fn empty_output(command: &str) -> TmuxError {
    TmuxError::ParseError {
        line_num: 1,
        detail: format!("{command} printed nothing"),
    }
}
