mod account;
mod cli;
mod ledger;
mod replay;
mod transaction;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, Session};
use crate::ledger::Ledger;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr so they never mix with menu or CSV output.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut ledger = Ledger::new();

    match args.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            Session::new(&mut ledger, stdin.lock(), stdout.lock()).run()?;
        }
        Command::Replay { file } => {
            let input = std::fs::File::open(&file)
                .with_context(|| format!("failed to read input file {}", file.display()))?;

            replay::replay(input, &mut ledger).context("failed to parse operations")?;
            replay::write_accounts(&ledger, std::io::stdout())
                .context("failed to write to stdout")?;
        }
    }

    Ok(())
}
