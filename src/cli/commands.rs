use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quantumshield", about = "Post-quantum proof-of-work ledger")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "demo",
        about = "Run a scripted scenario: wallets, transfers, mining, validation"
    )]
    Demo {
        #[arg(long, help = "Load chain parameters from a TOML file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Proof-of-work difficulty in leading zero hex digits")]
        difficulty: Option<u32>,
    },
    #[command(name = "mine", about = "Mine empty blocks to a fresh wallet")]
    Mine {
        #[arg(long, help = "Load chain parameters from a TOML file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Proof-of-work difficulty in leading zero hex digits")]
        difficulty: Option<u32>,
        #[arg(long, default_value_t = 3, help = "Number of blocks to mine")]
        blocks: u64,
    },
}
