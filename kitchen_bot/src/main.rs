use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use kitchen_core::{Command, DecisionEngine, KitchenView, protocol::ProtocolReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Kitchen bot reading referee turns on stdin", long_about = None)]
struct Args {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Emit commands without the trailing diagnostic note
    #[arg(long)]
    no_notes: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Stdout carries commands, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let stdin = io::stdin();
    let mut reader = ProtocolReader::new(stdin.lock());
    let header = reader.read_header().context("Reading game header")?;
    info!(
        width = header.kitchen.width(),
        customers = header.all_orders.len(),
        "game started"
    );

    let engine = DecisionEngine::default();
    let mut stdout = io::stdout().lock();

    while let Some(snapshot) = reader
        .read_turn(&header.kitchen)
        .context("Reading turn input")?
    {
        let view = KitchenView::new(&header.kitchen, &snapshot);
        let command = match engine.decide(view) {
            Ok(decision) => decision.command,
            Err(err) => {
                error!(turns_remaining = snapshot.turns_remaining, %err, "turn planning failed");
                Command::wait("stuck")
            }
        };
        let command = if args.no_notes {
            command.without_note()
        } else {
            command
        };
        writeln!(stdout, "{command}").context("Writing command")?;
        stdout.flush()?;
    }

    info!("input closed");
    Ok(())
}
