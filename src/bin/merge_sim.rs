//! Headless runner: replays scripted drops and prints a JSON report.
//!
//! Usage: `merge-sim [--config path] [--seed n] <col|col:value>...`

use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use tui_merge::cli::{load_config, parse_sim_args};
use tui_merge::logging;
use tui_merge::sim::replay;

fn main() -> Result<()> {
    logging::init_stderr();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_sim_args(&args)?;
    let config = load_config(args.config.as_deref(), args.seed)?;

    let report = replay(&config, &args.drops)?;
    info!(
        drops = report.steps.len(),
        rejected = report.rejected(),
        score = report.summary.score,
        "replay finished"
    );

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}
