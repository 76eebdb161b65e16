//! Single-card operations (`cardroster add/remove/show/check`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use cardroster::{CreditCard, classify_number, load_or_new};
use clap::Args;

use crate::cli::utils::{load_roster, save_roster};

/// Arguments for `cardroster add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Roster file to modify (created when missing).
    pub roster: PathBuf,
    /// Cardholder's name.
    #[arg(long)]
    pub name: String,
    /// Cardholder's phone number (7 or 10 digits, separators allowed).
    #[arg(long)]
    pub phone: String,
    /// Cardholder's e-mail address.
    #[arg(long)]
    pub email: String,
    /// Card number (punctuation is stripped).
    #[arg(long)]
    pub number: String,
    /// Expiration date as MM/YYYY or MM/YY.
    #[arg(long)]
    pub expiry: String,
}

/// Arguments for `cardroster remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Roster file to modify.
    pub roster: PathBuf,
    /// Card number identifying the record to remove.
    #[arg(long)]
    pub number: String,
}

/// Arguments for `cardroster show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Roster file to read.
    pub roster: PathBuf,
    /// 1-based index of the card to show.
    #[arg(short = 'i', long = "index", conflicts_with = "number")]
    pub index: Option<usize>,
    /// Card number to look up (sorts the roster first).
    #[arg(long)]
    pub number: Option<String>,
    /// Persist the sorted order produced by a number lookup.
    #[arg(long, requires = "number")]
    pub write_sorted: bool,
}

/// Arguments for `cardroster check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Card number to classify (punctuation is stripped).
    pub number: String,
}

pub fn add(args: AddArgs) -> Result<()> {
    let card = CreditCard::new(&args.name, &args.phone, &args.email, &args.number, &args.expiry)
        .context("card rejected")?;
    let mut roster = load_or_new(&args.roster)?;
    let summary = format!("{} ({})", card.masked_number(), card.issuer());
    roster.append(card);
    save_roster(&mut roster, &args.roster)?;
    println!("Added {} to {}", summary, args.roster.display());
    Ok(())
}

pub fn remove(args: RemoveArgs) -> Result<()> {
    let mut roster = load_roster(&args.roster)?;
    let (digits, _) = classify_number(&args.number)?;
    let card = roster
        .get_by_number(&digits)
        .with_context(|| format!("cannot remove '{}'", args.number))?
        .clone();
    roster.remove(&card);
    save_roster(&mut roster, &args.roster)?;
    println!("Removed {} from {}", card.masked_number(), args.roster.display());
    Ok(())
}

pub fn show(args: ShowArgs) -> Result<()> {
    let mut roster = load_roster(&args.roster)?;
    let card = match (args.index, args.number.as_deref()) {
        (Some(index), None) => {
            if index == 0 {
                return Err(anyhow!("card indices are 1-based"));
            }
            roster.get(index - 1)?.clone()
        }
        (None, Some(number)) => {
            let (digits, _) = classify_number(number)?;
            roster.get_by_number(&digits)?.clone()
        }
        _ => return Err(anyhow!("pass exactly one of --index or --number")),
    };
    println!("{card}");
    if args.write_sorted {
        save_roster(&mut roster, &args.roster)?;
    }
    Ok(())
}

pub fn check(args: CheckArgs) -> Result<()> {
    let (digits, issuer) = classify_number(&args.number)?;
    println!("Number: {digits}");
    println!("Issuer: {issuer}");
    Ok(())
}
