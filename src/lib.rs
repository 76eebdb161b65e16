//! Core library for credit card validation and roster management.

mod card;
mod roster;

pub use card::{CardSummary, CreditCard, Expiry, InvalidField, Issuer, classify_number};
pub use roster::{CardRoster, RosterError};

use std::path::Path;

use anyhow::Result;

/// Loads a roster from `path`, or starts an empty one when the file does not
/// exist yet. Other I/O failures still propagate.
pub fn load_or_new(path: &Path) -> Result<CardRoster> {
    if path.exists() {
        CardRoster::load(path)
    } else {
        Ok(CardRoster::new())
    }
}
