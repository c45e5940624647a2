use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::Result;

#[derive(Parser)]
#[command(name = "airdrop-claimer")]
#[command(version = "0.1.0")]
#[command(about = "Claim an ERC-20 airdrop across a batch of wallets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml, <CLAIMER_ENV>.toml)
    #[arg(short, long, default_value = "config", env = "CLAIMER_CONFIG_DIR")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Build the wallet store from the private key and proxy files
    InitStore,
    /// Claim on every wallet left in the store
    Claim,
}

pub const MENU: &str = "\
Modules:
  1. Create database
  2. Claim tokens
";

/// Interactive menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    InitStore,
    Claim,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::InitStore),
            "2" => Some(Self::Claim),
            _ => None,
        }
    }
}

impl From<MenuChoice> for Commands {
    fn from(choice: MenuChoice) -> Self {
        match choice {
            MenuChoice::InitStore => Commands::InitStore,
            MenuChoice::Claim => Commands::Claim,
        }
    }
}

/// Print the menu and read one selection from stdin.
///
/// Returns the raw line alongside the parsed choice so callers can report
/// what was typed.
pub async fn prompt_menu() -> Result<(String, Option<MenuChoice>)> {
    println!("{}", MENU);
    print!("Module number: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    let choice = MenuChoice::parse(&line);
    Ok((line.trim().to_string(), choice))
}
