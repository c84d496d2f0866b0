//! # Deggo Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the provider clients
//! - Serve MCP over stdio, or run a one-shot command

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use deggo_hex::{Deggo, inbound::McpServer};
use deggo_types::{Currency, Money, PaymentRequest, ProviderId, Recipient, TransactionFilter};

#[derive(Parser)]
#[command(name = "deggo")]
#[command(author, version, about = "Mobile-money payments for Senegal", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, env = "DEGGO_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,
    /// Check connectivity to every configured provider
    TestConnections,
    /// Show an account balance
    Balance {
        #[arg(long)]
        provider: ProviderId,
        /// Account msisdn; defaults to the configured partner account
        #[arg(long)]
        account: Option<String>,
    },
    /// Send money to a phone number
    Send {
        #[arg(long)]
        provider: ProviderId,
        /// Amount in major units
        #[arg(long)]
        amount: Decimal,
        #[arg(long, default_value = "XOF")]
        currency: Currency,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        reference: Option<String>,
    },
    /// List transactions, merged across providers unless one is given
    History {
        #[arg(long)]
        provider: Option<ProviderId>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Look up one transaction
    Status {
        #[arg(long)]
        provider: ProviderId,
        transaction_id: String,
    },
}

fn init_tracing(json: bool) {
    // stdout carries the MCP channel
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = config::Config::from_env()?;
    let deggo = Deggo::new(&config.deggo)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!(providers = ?deggo.available_providers(), "Starting Deggo MCP server");
            McpServer::new(deggo).run_stdio().await?;
        }

        Commands::TestConnections => {
            let results = deggo.test_connections().await;
            println!("{}", serde_json::to_string_pretty(&results)?);
            if results.values().any(|ok| !ok) {
                std::process::exit(1);
            }
        }

        Commands::Balance { provider, account } => {
            let balance = deggo.check_balance(provider, account.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&balance)?);
        }

        Commands::Send {
            provider,
            amount,
            currency,
            phone,
            name,
            description,
            reference,
        } => {
            let mut recipient = Recipient::new(phone);
            recipient.name = name;

            let request = PaymentRequest {
                amount: Money::new(amount, currency),
                recipient,
                description,
                reference,
                provider,
            };
            let response = deggo.send_money(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::History {
            provider,
            page,
            limit,
        } => {
            let filter = TransactionFilter {
                provider,
                page,
                limit,
                ..Default::default()
            };
            let history = deggo.get_transaction_history(&filter).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }

        Commands::Status {
            provider,
            transaction_id,
        } => {
            let response = deggo
                .get_transaction_status(provider, &transaction_id)
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
