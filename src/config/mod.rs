pub mod quote_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "quote-cart")]
#[command(about = "Cart pricing and discount resolution for sales quotes")]
pub struct CliConfig {
    #[arg(long, default_value = "./quote.toml")]
    pub config: String,

    #[arg(long, help = "Override the order record output directory")]
    pub output: Option<String>,

    #[arg(long, help = "Price the cart without writing an order record")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}
