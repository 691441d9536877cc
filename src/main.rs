//! Oracle price CLI.
//!
//! Reads and updates the single price value held by a CosmWasm oracle
//! contract on a Terra (Cosmos SDK) chain.
//!
//! # Architecture Overview
//!
//! ```text
//!   oracle-cli get-price ──▶ OracleContract ──▶ LcdClient ──▶ LCD smart query
//!                                                                  │
//!   stdout ◀── PriceResponse ◀───────────────────────────────────────┘
//!
//!   oracle-cli set-price N ──▶ OracleContract ──▶ TxBuilder ──▶ LcdClient
//!                                                   │  account, simulate,
//!                                  Wallet (env) ────┘  sign, broadcast
//!   stdout ◀── TxResponse (+ confirmation with --wait)
//!
//!   --simulate swaps OracleContract for the in-memory LocalOracle.
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use oracle_price::app::{self, OracleHandle, Overrides};
use oracle_price::blockchain::Wallet;
use oracle_price::config;
use oracle_price::observability::logging;

#[derive(Parser)]
#[command(name = "oracle-cli")]
#[command(about = "Read and update the price stored in a CosmWasm oracle contract", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Oracle contract address (overrides the config file)
    #[arg(long)]
    contract: Option<String>,

    /// LCD endpoint URL (overrides the config file)
    #[arg(long)]
    lcd_url: Option<String>,

    /// Use an in-memory oracle instead of the chain
    #[arg(long)]
    simulate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the current price
    GetPrice,
    /// Update the price (contract owner only)
    SetPrice {
        /// New price
        price: u64,

        /// Coins sent with the update, e.g. 100000uluna
        #[arg(long)]
        funds: Option<String>,

        /// Wait until the transaction is included in a block
        #[arg(long)]
        wait: bool,
    },
    /// Print the wallet address derived from the environment
    Address,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let funds = match &cli.command {
        Commands::SetPrice { funds, .. } => funds.clone(),
        _ => None,
    };
    let overrides = Overrides {
        contract: cli.contract.clone(),
        lcd_url: cli.lcd_url.clone(),
        funds,
    };
    let config = config::read_or_default(cli.config.as_deref())?;
    let config = app::apply_overrides(config, &overrides)?;

    logging::init(&config.observability)?;
    tracing::info!(
        chain_id = %config.network.chain_id,
        lcd_url = %config.network.lcd_url,
        contract = %config.oracle.address,
        simulate = cli.simulate,
        "Configuration loaded"
    );

    match cli.command {
        Commands::GetPrice => {
            let handle = if cli.simulate {
                OracleHandle::simulated(&config)?
            } else {
                OracleHandle::on_chain(&config, false).await?
            };
            let price = handle.oracle().query_price().await?;
            println!("{}", app::render(&price)?);
        }
        Commands::SetPrice { price, wait, .. } => {
            let handle = if cli.simulate {
                OracleHandle::simulated(&config)?
            } else {
                OracleHandle::on_chain(&config, true).await?
            };
            let receipt = handle.oracle().update_price(price).await?;
            println!("{}", app::render(&receipt)?);

            if wait {
                if let Some(status) = handle.confirm(&receipt).await? {
                    println!("{}", app::describe_confirmation(&status));
                }
            }
        }
        Commands::Address => {
            let wallet = Wallet::from_env(&config.wallet, &config.network.address_prefix)?;
            println!("{}", wallet.address());
        }
    }

    Ok(())
}
