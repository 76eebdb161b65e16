//! Command-line interface wiring for the `cardroster` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! submodules that encapsulate each command family.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod card;
pub mod listing;
pub mod utils;

/// Parsed CLI entrypoint for the `cardroster` binary.
#[derive(Parser, Debug)]
#[command(name = "cardroster", version, about = "Credit card roster manager")]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a new card and append it to a roster file.
    Add(card::AddArgs),
    /// Remove a card from a roster file by card number.
    Remove(card::RemoveArgs),
    /// Show a single card by index or card number.
    Show(card::ShowArgs),
    /// Classify a raw card number without touching a roster.
    Check(card::CheckArgs),
    /// List every card in a roster, masked.
    List(listing::ListArgs),
    /// Sort a roster file by card number.
    Sort(listing::SortArgs),
    /// Find all cards held by an exact holder name.
    Find(listing::FindArgs),
    /// List valid, non-expired cards.
    Valid(listing::ValidArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Add(args) => card::add(args),
        Command::Remove(args) => card::remove(args),
        Command::Show(args) => card::show(args),
        Command::Check(args) => card::check(args),
        Command::List(args) => listing::list(args),
        Command::Sort(args) => listing::sort(args),
        Command::Find(args) => listing::find(args),
        Command::Valid(args) => listing::valid(args),
    }
}
