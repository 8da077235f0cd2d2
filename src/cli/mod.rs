// CLI module for nl2formula

use clap::Parser;

/// nl2formula - Korean natural-language to Excel formula service
#[derive(Parser, Debug)]
#[command(name = "nl2formula", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (defaults to ~/.nl2formula/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Override the listen port from config
    #[arg(long)]
    pub port: Option<u16>,
}
