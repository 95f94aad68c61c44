//! CLI definition using clap derive. Every flag that configures the tmux
//! connection or run tuning also reads a `PANEDRIVE_*` environment variable.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use panedrive_tmux::{RunOptions, TmuxExecutor};

#[derive(Parser)]
#[command(
    name = "panedrive",
    version,
    about = "Run commands in tmux panes and wait for them to finish"
)]
pub struct Cli {
    #[command(flatten)]
    pub tmux: TmuxOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct TmuxOpts {
    /// tmux binary
    #[arg(long, global = true, env = "PANEDRIVE_TMUX_BIN", default_value = "tmux")]
    pub tmux_bin: String,

    /// tmux socket name (tmux -L)
    #[arg(long, short = 'L', global = true, env = "PANEDRIVE_SOCKET_NAME")]
    pub socket_name: Option<String>,

    /// tmux socket path (tmux -S); wins over --socket-name
    #[arg(long, short = 'S', global = true, env = "PANEDRIVE_SOCKET_PATH")]
    pub socket_path: Option<String>,
}

impl TmuxOpts {
    pub fn executor(&self) -> TmuxExecutor {
        let mut exec = TmuxExecutor::new(&self.tmux_bin);
        if let Some(ref name) = self.socket_name {
            exec = exec.with_socket_name(name);
        }
        if let Some(ref path) = self.socket_path {
            exec = exec.with_socket_path(path);
        }
        exec
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Type a command into a pane and wait for it to finish
    Run(RunOpts),
    /// Resolve an address and print the pane it names
    Resolve(ResolveOpts),
    /// Print the visible screen of a pane
    Capture(CaptureOpts),
}

#[derive(Args)]
pub struct RunOpts {
    /// Target pane: <session>.<window>[.<pane>]
    pub address: String,

    /// Command to type; multiple words are joined with spaces
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Create the session, window and panes if missing
    #[arg(long, short = 'c')]
    pub create: bool,

    /// Do not press Enter after typing
    #[arg(long)]
    pub no_enter: bool,

    /// Return right after typing instead of waiting for completion
    #[arg(long)]
    pub no_wait: bool,

    /// Give up waiting after this many seconds (default: wait forever)
    #[arg(long, env = "PANEDRIVE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Delay between screen captures
    #[arg(long, env = "PANEDRIVE_POLL_INTERVAL_MS", default_value = "100")]
    pub poll_interval_ms: u64,

    /// Fixed delay between typing and the first capture
    #[arg(long, env = "PANEDRIVE_WARMUP_MS", default_value = "1000")]
    pub warmup_ms: u64,

    /// Typing speed assumed when extending the warm-up for long commands
    #[arg(long, env = "PANEDRIVE_WARMUP_CHARS_PER_SEC", default_value = "80")]
    pub warmup_chars_per_sec: u32,
}

impl RunOpts {
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            send_enter: !self.no_enter,
            wait: !self.no_wait,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            warmup_base: Duration::from_millis(self.warmup_ms),
            warmup_chars_per_sec: self.warmup_chars_per_sec,
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..RunOptions::default()
        }
    }
}

#[derive(Args)]
pub struct ResolveOpts {
    /// Target pane: <session>.<window>[.<pane>]
    pub address: String,

    /// Create the session, window and panes if missing
    #[arg(long, short = 'c')]
    pub create: bool,

    /// Print the full handle as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CaptureOpts {
    /// Target pane: <session>.<window>[.<pane>]
    pub address: String,
}
