//! Command-line arguments for the bourse client.
use bourse_common::net::DEFAULT_PORT;
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the quote server.
    #[clap(long, default_value_t = default_server_url())]
    pub server_url: String,

    /// Path to a text file with symbols to quote.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub path: Option<String>,

    /// Compute quotes locally instead of asking the server.
    #[clap(long)]
    pub offline: bool,
}

fn default_server_url() -> String {
    format!("http://127.0.0.1:{}", DEFAULT_PORT)
}
