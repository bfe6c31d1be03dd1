//! CLI entrypoint for `cargo-smithygen`.

use cargo_smithygen::{Args, SmithygenError, logging, run};
use clap::Parser;
use tracing::info;

fn main() -> Result<(), SmithygenError> {
    logging::init()?;
    let args = Args::parse();
    let written = run(&args)?;
    info!(crates = written.len(), out_dir = %args.out_dir, "generation finished");
    Ok(())
}
