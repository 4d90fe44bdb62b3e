mod bootstrap_helpers;
mod cli_args;
mod runtime_loop;

use anyhow::Result;
use clap::Parser;

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::CliArgs;
use crate::runtime_loop::run_bot;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    run_bot(args).await
}
