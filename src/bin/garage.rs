//! Garage command shell
//!
//! Interactive, line-oriented front end for a multi-level parking garage

use anyhow::Context;
use clap::Parser;
use garage_rs::shell::{self, Shell};
use garage_rs::{CategoryFallback, GarageBuilder, DEFAULT_HISTORY_CAPACITY};
use std::io::{self, BufRead};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "garage")]
#[command(about = "Track machines parked in a multi-level garage")]
struct Args {
    /// Number of levels (prompted on stdin when omitted)
    #[arg(short = 'l', long)]
    levels: Option<usize>,

    /// Number of slots on each level (prompted on stdin when omitted)
    #[arg(short = 's', long)]
    slots_per_level: Option<usize>,

    /// Park unrecognized machine types as trucks instead of rejecting them
    #[arg(long)]
    legacy_truck_fallback: bool,

    /// Number of garage events kept for the `history` command (0 disables)
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Log filter used when RUST_LOG is not set (e.g. info, debug, garage_rs=trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the command protocol
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let (levels, slots_per_level) =
        shell::resolve_dimensions(args.levels, args.slots_per_level, &mut input, &mut output)
            .context("failed to read garage dimensions")?;

    let fallback = if args.legacy_truck_fallback {
        CategoryFallback::Large
    } else {
        CategoryFallback::Reject
    };

    let garage = GarageBuilder::new()
        .levels(levels)
        .slots_per_level(slots_per_level)
        .category_fallback(fallback)
        .history_capacity(args.history_capacity)
        .build()?;

    info!(
        "Garage ready: {} level(s) x {} slot(s), fallback={:?}",
        levels, slots_per_level, fallback
    );

    run_shell(&garage, input, output)?;
    Ok(())
}

fn run_shell<R: BufRead, W: io::Write>(
    garage: &garage_rs::Garage,
    input: R,
    output: W,
) -> anyhow::Result<()> {
    Shell::new(garage, input, output)
        .run()
        .context("command loop failed")
}
