//! panedrive: run commands in tmux panes addressed as `session.window[.pane]`.

use clap::Parser;

mod cli;
mod cmd_resolve;
mod cmd_run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = std::env::var("PANEDRIVE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    let executor = args.tmux.executor();

    match args.command {
        cli::Command::Run(opts) => {
            let exit_code = cmd_run::cmd_run(executor, opts).await?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        cli::Command::Resolve(opts) => {
            cmd_resolve::cmd_resolve(&executor, &opts)?;
        }
        cli::Command::Capture(opts) => {
            cmd_resolve::cmd_capture(&executor, &opts)?;
        }
    }

    Ok(())
}
