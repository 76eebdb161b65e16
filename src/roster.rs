use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::card::CreditCard;

const FIELDS_PER_LINE: usize = 5;

/// Lookup failures raised by roster access operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("index {index} out of range 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no card matches the card number")]
    NumberNotFound,
    #[error("no cards matching the name were found")]
    NameNotFound,
    #[error("no valid cards found")]
    NoValidCards,
}

/// Ordered collection of [`CreditCard`] records with sorted lookup and
/// pipe-delimited file persistence.
///
/// `save_needed` tracks divergence from disk: any mutation (append, remove,
/// sort, replace) raises it, and only a successful [`CardRoster::save`]
/// clears it. Loading a file with malformed lines also raises it, since the
/// in-memory state no longer mirrors the file.
#[derive(Debug, Clone, Default)]
pub struct CardRoster {
    cards: Vec<CreditCard>,
    save_needed: bool,
}

impl CardRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a roster from a pipe-delimited file.
    ///
    /// Each line must split on `|` into exactly five fields that construct a
    /// valid [`CreditCard`]. Lines that fail either check are skipped rather
    /// than aborting the load, but leave `save_needed` set. I/O errors
    /// propagate to the caller.
    pub fn load(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open roster file {}", path.display()))?;
        let reader = BufReader::new(file);

        let mut roster = Self::new();
        for line in reader.lines() {
            let line = line?;
            match parse_line(&line) {
                Some(card) => roster.cards.push(card),
                None => roster.save_needed = true,
            }
        }
        Ok(roster)
    }

    /// Write every record as one pipe-delimited line, truncating any existing
    /// file at `path`. Clears `save_needed` only on success; I/O errors
    /// propagate with the flag untouched.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to write roster file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for card in &self.cards {
            writeln!(writer, "{}", card.to_file_line())?;
        }
        writer.flush()?;
        self.save_needed = false;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// True when the in-memory roster has diverged from its file since the
    /// last successful save.
    pub fn save_needed(&self) -> bool {
        self.save_needed
    }

    pub fn get(&self, index: usize) -> Result<&CreditCard, RosterError> {
        self.cards.get(index).ok_or(RosterError::IndexOutOfRange {
            index,
            len: self.cards.len(),
        })
    }

    /// Replace the record at `index` wholesale; records are otherwise
    /// immutable once constructed.
    pub fn set(&mut self, index: usize, card: CreditCard) -> Result<(), RosterError> {
        let len = self.cards.len();
        let slot = self
            .cards
            .get_mut(index)
            .ok_or(RosterError::IndexOutOfRange { index, len })?;
        *slot = card;
        self.save_needed = true;
        Ok(())
    }

    /// Look up a record by exact card number.
    ///
    /// Binary search requires order, so the roster is sorted in place first.
    /// The sort happens (and marks `save_needed`) even when the lookup fails.
    pub fn get_by_number(&mut self, number: &str) -> Result<&CreditCard, RosterError> {
        self.sort();
        let index = self
            .cards
            .binary_search_by(|card| card.number().cmp(number))
            .map_err(|_| RosterError::NumberNotFound)?;
        Ok(&self.cards[index])
    }

    pub fn append(&mut self, card: CreditCard) {
        self.cards.push(card);
        self.save_needed = true;
    }

    /// Remove the first record equal (by card number) to `card`. A miss is a
    /// no-op, but the flag is raised either way.
    pub fn remove(&mut self, card: &CreditCard) {
        if let Some(index) = self.cards.iter().position(|c| c == card) {
            self.cards.remove(index);
        }
        self.save_needed = true;
    }

    /// Sort in place by the lexicographic card-number ordering.
    pub fn sort(&mut self) {
        self.cards.sort();
        self.save_needed = true;
    }

    /// All records held by `name`, in original order. An empty result is an
    /// error, not an empty list.
    pub fn find_by_name(&self, name: &str) -> Result<Vec<&CreditCard>, RosterError> {
        let matches: Vec<&CreditCard> = self
            .cards
            .iter()
            .filter(|card| card.matches_name(name))
            .collect();
        if matches.is_empty() {
            return Err(RosterError::NameNotFound);
        }
        Ok(matches)
    }

    /// All records that pass the checksum and have not expired, in original
    /// order. Same fail-on-empty contract as [`CardRoster::find_by_name`].
    pub fn find_valid(&self) -> Result<Vec<&CreditCard>, RosterError> {
        let matches: Vec<&CreditCard> = self
            .cards
            .iter()
            .filter(|card| card.is_valid() && !card.is_expired())
            .collect();
        if matches.is_empty() {
            return Err(RosterError::NoValidCards);
        }
        Ok(matches)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CreditCard> {
        self.cards.iter()
    }
}

fn parse_line(line: &str) -> Option<CreditCard> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != FIELDS_PER_LINE {
        return None;
    }
    CreditCard::new(fields[0], fields[1], fields[2], fields[3], fields[4]).ok()
}
