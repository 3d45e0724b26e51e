use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use estore_client::{
    config::Config,
    contract::{ContractRegistry, StoreContract},
    provider::{AmbientProvider, ProviderResolver},
    seed::{CallState, Catalog, SeedReport, SeedWindow, SeedingClient, SettlePolicy},
    units::{from_wei, to_wei, EtherUnit},
};
use ethers::types::U256;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "estore", version, about = "EcommerceStore contract client: provider bootstrap and catalog seeding")]
struct Cli {
    /// Path to a configuration file (yaml, toml or json)
    #[arg(long, env = "ESTORE_CONFIG")]
    config: Option<PathBuf>,

    /// Injected provider endpoint; the local network is used when absent
    #[arg(long, env = "ESTORE_PROVIDER_URL")]
    provider_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the deployed store with a product catalog
    Seed {
        /// JSON catalog file; the four sample phones are used when absent
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Contract build artifact
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Sender account (hex 0x...)
        #[arg(long)]
        from: Option<String>,
        /// Read the product index without waiting for the writes
        #[arg(long)]
        detached: bool,
    },
    /// Read the store's product index
    Index {
        /// Contract build artifact
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Show the resolved provider
    Provider,
    /// Convert an amount to wei
    ToWei {
        amount: String,
        #[arg(long, value_enum, default_value_t = EtherUnit::Ether)]
        unit: EtherUnit,
    },
    /// Convert wei to an amount
    FromWei {
        wei: String,
        #[arg(long, value_enum, default_value_t = EtherUnit::Ether)]
        unit: EtherUnit,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = cli.provider_url {
        config.provider.url = Some(url);
    }

    match cli.command {
        Commands::ToWei { amount, unit } => {
            println!("{}", to_wei(&amount, unit)?);
            return Ok(());
        }
        Commands::FromWei { wei, unit } => {
            let value = U256::from_dec_str(wei.trim())
                .map_err(|e| anyhow::anyhow!("wei must be a decimal integer: {:?}", e))?;
            println!("{}", from_wei(value, unit)?);
            return Ok(());
        }
        Commands::Seed {
            catalog,
            artifact,
            from,
            detached,
        } => {
            if let Some(path) = artifact {
                config.contract.artifact_path = path;
            }
            if from.is_some() {
                config.contract.from = from;
            }
            if detached {
                config.seed.settle = SettlePolicy::Detached;
            }
            let registry = bootstrap(&config)?;
            let store = registry.store().await.context("binding store contract")?;
            seed(&config, store, catalog).await?;
        }
        Commands::Index { artifact } => {
            if let Some(path) = artifact {
                config.contract.artifact_path = path;
            }
            let registry = bootstrap(&config)?;
            let store = registry.store().await.context("binding store contract")?;
            let index = store.product_index().await?;
            println!("productIndex: {}", index);
        }
        Commands::Provider => {
            let resolver = ProviderResolver::from_config(&config.provider)?;
            let handle = resolver.resolve(ambient(&config)?);
            println!("endpoint:       {}", handle.endpoint());
            println!("origin:         {}", handle.origin());
            println!("offchain store: {}", config.offchain_store.api_url());
        }
    }

    Ok(())
}

/// Resolve the process-wide provider and prepare contract bindings
fn bootstrap(config: &Config) -> Result<ContractRegistry> {
    let resolver = ProviderResolver::from_config(&config.provider)?;
    let handle = resolver.resolve(ambient(config)?);
    info!("Off-chain store configured at {}", config.offchain_store.api_url());
    Ok(ContractRegistry::new(handle, config.contract.clone()))
}

fn ambient(config: &Config) -> Result<Option<AmbientProvider>> {
    config
        .provider
        .url
        .as_deref()
        .map(AmbientProvider::from_url)
        .transpose()
        .context("invalid provider url")
}

async fn seed(config: &Config, store: Arc<dyn StoreContract>, catalog: Option<PathBuf>) -> Result<()> {
    let catalog = match catalog {
        Some(path) => Catalog::from_json_file(&path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::sample(),
    };

    let window = SeedWindow::capture(config.seed.window_secs).context("opening seed window")?;
    let price = to_wei(&config.seed.price_ether, EtherUnit::Ether).context("converting seed price")?;
    let entries = catalog.into_entries(window, price, config.seed.status)?;

    let client = SeedingClient::new(store, config.seed.settle);
    let report = client.seed(entries).await;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SeedReport) {
    for write in &report.writes {
        match &write.state {
            CallState::Fulfilled(receipt) => {
                println!("  {:<12} ok      {:?}", write.entry.name, receipt.tx_hash)
            }
            CallState::Rejected(err) => println!("  {:<12} failed  {}", write.entry.name, err),
        }
    }
    match &report.index {
        CallState::Fulfilled(index) => println!("productIndex: {}", index),
        CallState::Rejected(err) => println!("productIndex: unavailable ({})", err),
    }
    if report.pending_at_read > 0 {
        println!(
            "note: {} writes were still in flight when the index was read",
            report.pending_at_read
        );
    }
    println!(
        "{} fulfilled, {} rejected",
        report.fulfilled(),
        report.rejected()
    );
}
