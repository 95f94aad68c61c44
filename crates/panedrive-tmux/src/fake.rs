//! In-memory tmux server for tests.
//!
//! Understands exactly the commands this crate issues and answers in the
//! `-F` layouts of `server.rs`. Captures are scripted per pane: each
//! `capture-pane` pops the next screen, and the last one repeats.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::TmuxError;
use crate::executor::TmuxRunner;

#[derive(Debug, Clone)]
pub(crate) struct FakeWindow {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub panes: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeSession {
    pub id: String,
    pub name: String,
    pub windows: Vec<FakeWindow>,
}

#[derive(Default)]
struct State {
    sessions: Vec<FakeSession>,
    next_id: u32,
    screens: HashMap<String, VecDeque<Vec<String>>>,
    sent: Vec<(String, String)>,
    commands: Vec<String>,
}

impl State {
    fn next(&mut self, sigil: char) -> String {
        let id = format!("{sigil}{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn window_mut(&mut self, window_id: &str) -> Result<&mut FakeWindow, TmuxError> {
        self.sessions
            .iter_mut()
            .flat_map(|s| s.windows.iter_mut())
            .find(|w| w.id == window_id)
            .ok_or_else(|| fail(&format!("can't find window: {window_id}")))
    }

    fn add_window(&mut self, session_idx: usize, name: &str) -> FakeWindow {
        let id = self.next('@');
        let pane = self.next('%');
        let session = &mut self.sessions[session_idx];
        let index = session
            .windows
            .iter()
            .map(|w| w.index + 1)
            .max()
            .unwrap_or(0);
        let window = FakeWindow {
            id,
            index,
            name: name.to_string(),
            panes: vec![pane],
        };
        session.windows.push(window.clone());
        window
    }
}

#[derive(Default)]
pub(crate) struct FakeTmux {
    state: Mutex<State>,
}

impl FakeTmux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session whose windows hold `(name, pane_count)`.
    pub fn with_session(self, name: &str, windows: &[(&str, usize)]) -> Self {
        {
            let mut st = self.state.lock().expect("lock");
            let id = st.next('$');
            st.sessions.push(FakeSession {
                id,
                name: name.to_string(),
                windows: Vec::new(),
            });
            let idx = st.sessions.len() - 1;
            for &(window, panes) in windows {
                let w = st.add_window(idx, window);
                for _ in 1..panes {
                    let pane = st.next('%');
                    st.window_mut(&w.id).expect("seeded").panes.push(pane);
                }
            }
        }
        self
    }

    /// Queue screens returned by successive captures of `pane_id`.
    pub fn script_screens(&self, pane_id: &str, screens: &[&[&str]]) {
        let mut st = self.state.lock().expect("lock");
        let queue = st.screens.entry(pane_id.to_string()).or_default();
        for screen in screens {
            queue.push_back(screen.iter().map(|l| l.to_string()).collect());
        }
    }

    pub fn sessions(&self) -> Vec<FakeSession> {
        self.state.lock().expect("lock").sessions.clone()
    }

    /// `(pane_id, keys)` in the order they were sent.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.state.lock().expect("lock").sent.clone()
    }

    /// First argument of every command received.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().expect("lock").commands.clone()
    }

    pub fn capture_count(&self) -> usize {
        self.commands().iter().filter(|c| *c == "capture-pane").count()
    }
}

fn fail(msg: &str) -> TmuxError {
    TmuxError::CommandFailed(format!("exit code 1: {msg}"))
}

fn flag<'a>(args: &[&'a str], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| *a == name)
        .and_then(|i| args.get(i + 1).copied())
}

impl TmuxRunner for FakeTmux {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        let mut st = self.state.lock().expect("lock");
        let Some(&command) = args.first() else {
            return Err(fail("no command"));
        };
        st.commands.push(command.to_string());
        let target = flag(args, "-t").unwrap_or_default();

        match command {
            "list-sessions" => {
                if st.sessions.is_empty() {
                    return Err(fail("no server running on /tmp/tmux-fake/default"));
                }
                Ok(st
                    .sessions
                    .iter()
                    .map(|s| format!("{}\t{}\n", s.id, s.name))
                    .collect())
            }
            "list-windows" => {
                let session = st
                    .sessions
                    .iter()
                    .find(|s| s.id == target)
                    .ok_or_else(|| fail(&format!("can't find session: {target}")))?;
                Ok(session
                    .windows
                    .iter()
                    .map(|w| format!("{}\t{}\t{}\n", w.id, w.index, w.name))
                    .collect())
            }
            "list-panes" => {
                let window = st.window_mut(target)?;
                Ok(window
                    .panes
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("{p}\t{i}\n"))
                    .collect())
            }
            "new-session" => {
                // tmux rewrites these when creating a session.
                let name = flag(args, "-s").unwrap_or_default().replace([':', '.'], "_");
                let name = name.as_str();
                if st.sessions.iter().any(|s| s.name == name) {
                    return Err(fail(&format!("duplicate session: {name}")));
                }
                let id = st.next('$');
                st.sessions.push(FakeSession {
                    id: id.clone(),
                    name: name.to_string(),
                    windows: Vec::new(),
                });
                let idx = st.sessions.len() - 1;
                let w = st.add_window(idx, "bash");
                Ok(format!("{id}\t{}\t{}\t{name}\t{}\n", w.id, w.index, w.name))
            }
            "rename-window" => {
                let name = args.last().copied().unwrap_or_default();
                st.window_mut(target)?.name = name.to_string();
                Ok(String::new())
            }
            "new-window" => {
                let session_id = target.trim_end_matches(':');
                let idx = st
                    .sessions
                    .iter()
                    .position(|s| s.id == session_id)
                    .ok_or_else(|| fail(&format!("can't find session: {session_id}")))?;
                let name = flag(args, "-n").unwrap_or("bash");
                let w = st.add_window(idx, name);
                Ok(format!("{}\t{}\t{}\n", w.id, w.index, w.name))
            }
            "split-window" => {
                let pane = st.next('%');
                let window = st.window_mut(target)?;
                window.panes.push(pane.clone());
                Ok(format!("{pane}\t{}\n", window.panes.len() - 1))
            }
            "send-keys" => {
                let keys = args.last().copied().unwrap_or_default();
                st.sent.push((target.to_string(), keys.to_string()));
                Ok(String::new())
            }
            "capture-pane" => {
                let Some(queue) = st.screens.get_mut(target) else {
                    return Ok(String::new());
                };
                let screen = if queue.len() > 1 {
                    queue.pop_front().unwrap_or_default()
                } else {
                    queue.front().cloned().unwrap_or_default()
                };
                Ok(screen.iter().map(|l| format!("{l}\n")).collect())
            }
            other => Err(fail(&format!("unknown command {other}"))),
        }
    }
}
