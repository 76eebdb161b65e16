//! Whole-roster listings (`cardroster list/sort/find/valid`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::cli::utils::{load_roster, print_cards, save_roster};

/// Arguments for `cardroster list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Roster file to read.
    pub roster: PathBuf,
    /// Emit masked summaries as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `cardroster sort`.
#[derive(Args, Debug)]
pub struct SortArgs {
    /// Roster file to sort and rewrite.
    pub roster: PathBuf,
}

/// Arguments for `cardroster find`.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Roster file to search.
    pub roster: PathBuf,
    /// Exact holder name to match.
    #[arg(long)]
    pub name: String,
    /// Emit masked summaries as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `cardroster valid`.
#[derive(Args, Debug)]
pub struct ValidArgs {
    /// Roster file to search.
    pub roster: PathBuf,
    /// Emit masked summaries as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn list(args: ListArgs) -> Result<()> {
    let roster = load_roster(&args.roster)?;
    let cards: Vec<_> = roster.iter().collect();
    print_cards(&cards, args.json)?;
    println!("{} card(s) in {}", roster.len(), args.roster.display());
    Ok(())
}

pub fn sort(args: SortArgs) -> Result<()> {
    let mut roster = load_roster(&args.roster)?;
    roster.sort();
    save_roster(&mut roster, &args.roster)?;
    println!("Sorted {} card(s) in {}", roster.len(), args.roster.display());
    Ok(())
}

pub fn find(args: FindArgs) -> Result<()> {
    let roster = load_roster(&args.roster)?;
    let cards = roster.find_by_name(&args.name)?;
    print_cards(&cards, args.json)?;
    println!("{} card(s) held by {}", cards.len(), args.name);
    Ok(())
}

pub fn valid(args: ValidArgs) -> Result<()> {
    let roster = load_roster(&args.roster)?;
    let cards = roster.find_valid()?;
    print_cards(&cards, args.json)?;
    println!("{} valid card(s)", cards.len());
    Ok(())
}
