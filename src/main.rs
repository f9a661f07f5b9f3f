//! `beverage`: command-line access to the Beverage API.
//!
//! Results are printed to stdout as JSON; logs and errors go to stderr.

use std::process::ExitCode;
use std::time::Duration;

use beverage_provider::{init_logging_with_default, BeverageClient, ProviderError, BASE_URL_ENV};
use clap::{Parser, Subcommand};
use serde_json::{json, to_value, Value};

#[derive(Debug, Parser)]
#[command(name = "beverage", version, about = "Manage beverages through the Beverage API")]
struct Cli {
    /// Root address of the Beverage API
    #[arg(long, env = BASE_URL_ENV)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all beverages
    List,
    /// Show one beverage
    Get {
        /// Beverage id
        id: i64,
    },
    /// Create a beverage
    Create {
        /// Beverage name
        #[arg(long)]
        name: String,
        /// Beverage type, e.g. coffee or tea
        #[arg(long = "type")]
        beverage_type: String,
    },
    /// Replace the name and type of a beverage
    Update {
        /// Beverage id
        id: i64,
        /// New name
        #[arg(long)]
        name: String,
        /// New type
        #[arg(long = "type")]
        beverage_type: String,
    },
    /// Delete a beverage
    Delete {
        /// Beverage id
        id: i64,
    },
}

/// Execute the subcommand and return what should be printed.
async fn run(cli: Cli) -> Result<Value, ProviderError> {
    let client = match cli.timeout_secs {
        Some(secs) => BeverageClient::with_timeout(&cli.base_url, Duration::from_secs(secs))?,
        None => BeverageClient::new(&cli.base_url)?,
    };

    let output = match cli.command {
        Command::List => to_value(client.list().await?)?,
        Command::Get { id } => to_value(client.get(id).await?)?,
        Command::Create {
            name,
            beverage_type,
        } => to_value(client.create(&name, &beverage_type).await?)?,
        Command::Update {
            id,
            name,
            beverage_type,
        } => to_value(client.update(id, &name, &beverage_type).await?)?,
        Command::Delete { id } => {
            client.delete(id).await?;
            json!({ "deleted": id })
        }
    };
    Ok(output)
}

fn render(output: &Value) -> Result<String, ProviderError> {
    Ok(serde_json::to_string_pretty(output)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging_with_default(&cli.log_level);

    match run(cli).await.and_then(|output| render(&output)) {
        Ok(rendered) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.to_diagnostic());
            ExitCode::FAILURE
        }
    }
}
