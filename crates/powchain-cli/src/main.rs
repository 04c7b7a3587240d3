mod logging;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use logging::{init_logging, LogFormat};
use powchain_core::{
    constants::{DEFAULT_DIFFICULTY, GENESIS_PAYLOAD},
    Chain, ChainConfig, MineControl,
};
use session::Session;
use std::io;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "powchain")]
#[command(about = "Interactive proof-of-work ledger simulator", version)]
struct Cli {
    /// Leading zero hex digits required of every mined block
    #[arg(long, env = "POWCHAIN_DIFFICULTY", default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u32,

    /// Give up on a block after this many hashes instead of searching forever
    #[arg(long, env = "POWCHAIN_MAX_ATTEMPTS", value_parser = clap::value_parser!(u64).range(1..))]
    max_attempts: Option<u64>,

    /// Text carried by the genesis block
    #[arg(long, env = "POWCHAIN_GENESIS", default_value = GENESIS_PAYLOAD)]
    genesis: String,

    /// Log output format (logs are written to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("info", cli.log_format);

    let config = ChainConfig {
        difficulty: cli.difficulty,
        genesis_payload: cli.genesis,
    };
    let chain = Chain::new(&config).context("invalid chain configuration")?;

    let mut control = MineControl::unbounded();
    if let Some(max) = cli.max_attempts {
        control = control.with_max_attempts(max);
    }

    info!("powchain started with difficulty {}", chain.difficulty());
    let stdin = io::stdin();
    let mut session = Session::new(chain, control, stdin.lock(), io::stdout());
    session.run()
}
