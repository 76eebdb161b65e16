//! Convenience helpers shared across command handlers.

use std::path::Path;

use anyhow::{Context, Result};
use cardroster::{CardRoster, CreditCard};

/// Load a roster file, attaching path context to any error.
pub fn load_roster(path: &Path) -> Result<CardRoster> {
    CardRoster::load(path).with_context(|| format!("failed to read roster {}", path.display()))
}

/// Persist a roster, attaching path context to any error.
pub fn save_roster(roster: &mut CardRoster, path: &Path) -> Result<()> {
    roster
        .save(path)
        .with_context(|| format!("failed to write roster {}", path.display()))
}

/// Print a set of cards as masked text blocks, or as a JSON array of
/// summaries when `json` is set.
pub fn print_cards(cards: &[&CreditCard], json: bool) -> Result<()> {
    if json {
        let summaries: Vec<_> = cards.iter().map(|card| card.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{card}");
    }
    Ok(())
}
