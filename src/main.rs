// CLI entry point. The chain is in-memory for the process lifetime, so
// every command builds its own chain, runs a scenario against it, and
// prints the result.
use clap::Parser;
use log::{error, LevelFilter};
use quantumshield::{
    Blockchain, CancelToken, ChainConfig, Command, Opt, Transaction, Wallets,
};
use std::process;

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();
    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    // Configuration comes from a TOML file when --config is given,
    // otherwise from the environment (QS_* variables); the CLI
    // difficulty flag takes precedence over both
    let load_config = |path: Option<std::path::PathBuf>,
                       difficulty: Option<u32>|
     -> Result<ChainConfig, Box<dyn std::error::Error>> {
        let mut config = match path {
            Some(p) => ChainConfig::from_toml_file(p)?,
            None => ChainConfig::from_env()?,
        };
        if let Some(d) = difficulty {
            config.difficulty = d;
        }
        config.validate()?;
        Ok(config)
    };

    match command {
        Command::Demo { config, difficulty } => {
            let config = load_config(config, difficulty)?;
            let chain = Blockchain::with_default_scorer(config)?;

            let mut wallets = Wallets::new();
            let alice = wallets.create_wallet()?;
            let bob = wallets.create_wallet()?;
            let miner = wallets.create_wallet()?;
            println!("alice: {alice}");
            println!("bob:   {bob}");
            println!("miner: {miner}");

            // Fund alice with one mining reward, then spend from her wallet
            chain.mine_pending_block(&alice, &CancelToken::new())?;
            println!("alice funded: {}", chain.get_balance(&alice));

            let alice_wallet = wallets.get_wallet(&alice)?;
            chain.add_transaction(Transaction::new_signed(alice_wallet, &bob, 3.5)?)?;
            chain.add_transaction(Transaction::new_signed(alice_wallet, &bob, 1.25)?)?;

            // A self-transfer trips the admission gate when the threshold
            // is tight enough; with defaults it scores 0.5 and passes, so
            // show the gate with an absurd amount instead
            match chain.add_transaction(Transaction::new_signed(
                alice_wallet,
                &alice,
                1_000_000.0,
            )?) {
                Ok(()) => println!("suspicious transfer admitted (threshold too loose?)"),
                Err(e) => println!("suspicious transfer rejected: {e}"),
            }

            chain.mine_pending_block(&miner, &CancelToken::new())?;

            println!("alice: {}", chain.get_balance(&alice));
            println!("bob:   {}", chain.get_balance(&bob));
            println!("miner: {}", chain.get_balance(&miner));

            chain.validate_chain()?;
            println!("{}", serde_json::to_string_pretty(&chain.get_chain_info())?);
        }
        Command::Mine {
            config,
            difficulty,
            blocks,
        } => {
            let config = load_config(config, difficulty)?;
            let chain = Blockchain::with_default_scorer(config)?;

            let mut wallets = Wallets::new();
            let miner = wallets.create_wallet()?;

            for _ in 0..blocks {
                let block = chain.mine_pending_block(&miner, &CancelToken::new())?;
                println!("block {}: {}", block.get_index(), block.get_hash());
            }

            chain.validate_chain()?;
            println!("miner balance: {}", chain.get_balance(&miner));
            println!("{}", serde_json::to_string_pretty(&chain.get_chain_info())?);
        }
    }
    Ok(())
}
