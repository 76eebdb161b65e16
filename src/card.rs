use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, Local};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

const MIN_DIGITS: usize = 12;
const MAX_DIGITS: usize = 19;

/// Field-level failures raised while constructing a [`CreditCard`].
/// Construction is all-or-nothing; no partially valid card is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidField {
    #[error("cardholder name cannot be empty")]
    Name,
    #[error("phone number '{0}' is in an invalid format")]
    Phone(String),
    #[error("'{0}' does not contain a valid e-mail address")]
    Email(String),
    #[error("card number has an illegal number of digits (expected 12-19, got {0})")]
    Number(usize),
    #[error("expiry '{0}' is not in MM/YYYY or MM/YY format")]
    Expiry(String),
}

/// Issuing network derived from the checksum and the IIN (first 6 digits).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Issuer {
    /// Number failed the Luhn checksum.
    Invalid,
    Mastercard,
    Visa,
    Discover,
    AmericanExpress,
    /// Checksum passed but no IIN rule matched.
    Other,
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issuer::Invalid => write!(f, "Invalid"),
            Issuer::Mastercard => write!(f, "Mastercard"),
            Issuer::Visa => write!(f, "Visa"),
            Issuer::Discover => write!(f, "Discover"),
            Issuer::AmericanExpress => write!(f, "American Express"),
            Issuer::Other => write!(f, "Other"),
        }
    }
}

/// Expiration month, pinned to the first day of the month.
///
/// The month is deliberately not bounded to 01-12: the accepted input pattern
/// allows values like `13`, and that laxity is preserved rather than papered
/// over with calendar validation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Expiry {
    pub month: u32,
    pub year: i32,
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Optional 3-digit area code (bare or parenthesized), then 3+4 digits with
    // optional space/hyphen/period separators. Implemented literally; the
    // shared quantifier means mismatched parens slip through.
    RE.get_or_init(|| {
        Regex::new(r"^(\(?\d{3}[)\- \.]?)? ?\d{3}[\-\. ]?\d{4}$").expect("phone pattern")
    })
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[A-Z0-9._%+-]+@(?:[A-Z0-9-]+\.)+[A-Z]{2,}").expect("email pattern")
    })
}

fn expiry_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([0-1]?\d)/(\d{2}|19\d{2}|20\d{2})\b").expect("expiry pattern")
    })
}

/// Strip non-digit characters and enforce the 12-19 digit length contract.
fn normalize_number(raw: &str) -> Result<String, InvalidField> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
        return Err(InvalidField::Number(digits.len()));
    }
    Ok(digits)
}

/// Luhn checksum: starting from the second-to-last digit and stepping left by
/// two, double each digit (subtracting 9 when the double exceeds 9), then sum
/// everything and check divisibility by 10.
fn luhn_pass(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, ch) in digits.chars().rev().enumerate() {
        let mut d = ch.to_digit(10).unwrap_or(0);
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Classify a pure-digit card number by checksum and IIN.
fn classify(digits: &str) -> Issuer {
    if !luhn_pass(digits) {
        return Issuer::Invalid;
    }
    let iin: u32 = digits[..6].parse().unwrap_or(0);
    if matches!(iin / 10_000, 34 | 37) {
        Issuer::AmericanExpress
    } else if iin / 100_000 == 4 {
        Issuer::Visa
    } else if (51..=55).contains(&(iin / 10_000)) {
        Issuer::Mastercard
    } else if iin / 100 == 6011 || iin / 1_000 == 644 || iin / 10_000 == 65 {
        Issuer::Discover
    } else {
        Issuer::Other
    }
}

/// Normalize a raw card number and classify it without building a full record.
pub fn classify_number(raw: &str) -> Result<(String, Issuer), InvalidField> {
    let digits = normalize_number(raw)?;
    let issuer = classify(&digits);
    Ok((digits, issuer))
}

/// A single validated credit card record.
///
/// Every field is normalized at construction via [`CreditCard::new`] and
/// immutable afterwards. Equality and ordering consider only the card number.
#[derive(Debug, Clone)]
pub struct CreditCard {
    holder_name: String,
    phone: String,
    email: String,
    number: String,
    expiry: Expiry,
    issuer: Issuer,
}

impl CreditCard {
    /// Validate the five raw fields and build a classified record.
    ///
    /// A checksum failure is not a construction failure: the record is built
    /// with [`Issuer::Invalid`] and reports `is_valid() == false`.
    pub fn new(
        name: &str,
        phone: &str,
        email: &str,
        number: &str,
        expiry: &str,
    ) -> Result<Self, InvalidField> {
        if name.is_empty() {
            return Err(InvalidField::Name);
        }
        let phone = phone_pattern()
            .find(phone)
            .ok_or_else(|| InvalidField::Phone(phone.to_string()))?
            .as_str()
            .to_string();
        let email = email_pattern()
            .find(email)
            .ok_or_else(|| InvalidField::Email(email.to_string()))?
            .as_str()
            .to_string();
        let number = normalize_number(number)?;
        let expiry = parse_expiry(expiry)?;
        let issuer = classify(&number);
        Ok(Self {
            holder_name: name.to_string(),
            phone,
            email,
            number,
            expiry,
            issuer,
        })
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Pure-digit card number, 12-19 digits.
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    pub fn issuer(&self) -> Issuer {
        self.issuer
    }

    /// Card number with all but the last four digits replaced by `X`.
    pub fn masked_number(&self) -> String {
        let visible = self.number.len() - 4;
        format!("{}{}", "X".repeat(visible), &self.number[visible..])
    }

    /// True once today's date reaches the first day of the expiry month.
    pub fn is_expired(&self) -> bool {
        let today = Local::now().date_naive();
        (today.year(), today.month()) >= (self.expiry.year, self.expiry.month)
    }

    /// True unless the number failed the checksum.
    pub fn is_valid(&self) -> bool {
        self.issuer != Issuer::Invalid
    }

    /// Exact holder-name comparison without exposing the field for mutation.
    pub fn matches_name(&self, name: &str) -> bool {
        self.holder_name == name
    }

    /// Pipe-delimited line used by roster files. Unmasked; fields must not
    /// contain `|` (the format has no escaping).
    pub fn to_file_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.holder_name, self.phone, self.email, self.number, self.expiry
        )
    }

    /// Masked, serializable view for JSON output.
    pub fn summary(&self) -> CardSummary {
        CardSummary {
            holder_name: self.holder_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            number: self.masked_number(),
            expiry: self.expiry.to_string(),
            issuer: self.issuer,
            expired: self.is_expired(),
            valid: self.is_valid(),
        }
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name       : {}", self.holder_name)?;
        writeln!(f, "Email      : {}", self.email)?;
        writeln!(f, "Phone      : {}", self.phone)?;
        writeln!(f, "Card Number: {}", self.masked_number())?;
        writeln!(f, "Expiry     : {}", self.expiry)?;
        write!(f, "Issuer     : {}", self.issuer)
    }
}

impl PartialEq for CreditCard {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for CreditCard {}

impl PartialOrd for CreditCard {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CreditCard {
    /// Lexicographic comparison of the card-number strings, not numeric.
    fn cmp(&self, other: &Self) -> Ordering {
        self.number.cmp(&other.number)
    }
}

/// Masked record view emitted by `--json` listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CardSummary {
    pub holder_name: String,
    pub phone: String,
    pub email: String,
    pub number: String,
    pub expiry: String,
    pub issuer: Issuer,
    pub expired: bool,
    pub valid: bool,
}

fn parse_expiry(raw: &str) -> Result<Expiry, InvalidField> {
    let caps = expiry_pattern()
        .captures(raw)
        .ok_or_else(|| InvalidField::Expiry(raw.to_string()))?;
    let month: u32 = caps[1].parse().map_err(|_| InvalidField::Expiry(raw.to_string()))?;
    let year_str = &caps[2];
    let year: i32 = year_str
        .parse()
        .map_err(|_| InvalidField::Expiry(raw.to_string()))?;
    // Two-digit years are assumed to mean 20YY.
    let year = if year_str.len() == 2 { 2000 + year } else { year };
    Ok(Expiry { month, year })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(number: &str, expiry: &str) -> CreditCard {
        CreditCard::new("Jane Doe", "555-123-4567", "jane@example.com", number, expiry)
            .expect("test card should construct")
    }

    #[test]
    fn classifies_known_issuers() {
        let cases = [
            ("4111111111111111", Issuer::Visa),
            ("5500000000000004", Issuer::Mastercard),
            ("378282246310005", Issuer::AmericanExpress),
            ("340000000000009", Issuer::AmericanExpress),
            ("6011111111111117", Issuer::Discover),
            ("6440000000000005", Issuer::Discover),
            ("6500000000000002", Issuer::Discover),
            ("90000000000001", Issuer::Other),
        ];
        for (number, expected) in cases {
            assert_eq!(card(number, "03/2099").issuer(), expected, "{number}");
        }
    }

    #[test]
    fn checksum_failure_is_invalid_not_an_error() {
        let c = card("4111111111111112", "03/2099");
        assert_eq!(c.issuer(), Issuer::Invalid);
        assert!(!c.is_valid());
    }

    #[test]
    fn number_is_stripped_of_punctuation() {
        let c = card("4111-1111-1111-1111", "03/2099");
        assert_eq!(c.number(), "4111111111111111");
        assert_eq!(c.issuer(), Issuer::Visa);
    }

    #[test]
    fn rejects_bad_fields() {
        let err = CreditCard::new("", "555-123-4567", "a@b.com", "4111111111111111", "03/2027");
        assert_eq!(err.unwrap_err(), InvalidField::Name);

        let err = CreditCard::new("Jane", "12345", "a@b.com", "4111111111111111", "03/2027");
        assert!(matches!(err.unwrap_err(), InvalidField::Phone(_)));

        let err = CreditCard::new("Jane", "555-1234", "not-an-email", "4111111111111111", "03/2027");
        assert!(matches!(err.unwrap_err(), InvalidField::Email(_)));

        let err = CreditCard::new("Jane", "555-1234", "a@b.com", "123", "03/2027");
        assert_eq!(err.unwrap_err(), InvalidField::Number(3));

        let err = CreditCard::new("Jane", "555-1234", "a@b.com", "4111111111111111", "march 2027");
        assert!(matches!(err.unwrap_err(), InvalidField::Expiry(_)));
    }

    #[test]
    fn accepts_phone_variants() {
        for phone in ["555-1234", "555 1234", "5551234", "(423) 555-1234", "423.555.1234"] {
            let c = CreditCard::new("Jane", phone, "a@b.com", "4111111111111111", "03/2027")
                .expect(phone);
            assert_eq!(c.phone(), phone);
        }
    }

    #[test]
    fn email_keeps_only_the_matched_substring() {
        let c = CreditCard::new(
            "Jane",
            "555-1234",
            "reach me at jane.doe+cards@example.co.uk thanks",
            "4111111111111111",
            "03/2027",
        )
        .expect("email with surrounding junk");
        assert_eq!(c.email(), "jane.doe+cards@example.co.uk");
    }

    #[test]
    fn two_digit_years_become_20yy() {
        let c = card("4111111111111111", "03/27");
        assert_eq!(c.expiry(), Expiry { month: 3, year: 2027 });
        assert_eq!(c.expiry().to_string(), "03/2027");
    }

    #[test]
    fn month_thirteen_is_accepted_per_the_literal_pattern() {
        let c = card("4111111111111111", "13/2020");
        assert_eq!(c.expiry(), Expiry { month: 13, year: 2020 });
        assert!(c.is_expired());
    }

    #[test]
    fn expiry_in_the_past_is_expired() {
        assert!(card("4111111111111111", "01/2020").is_expired());
        assert!(!card("4111111111111111", "03/2099").is_expired());
    }

    #[test]
    fn display_masks_all_but_last_four() {
        let c = card("4111111111111111", "03/2027");
        assert_eq!(c.masked_number(), "XXXXXXXXXXXX1111");
        let shown = c.to_string();
        assert!(shown.contains("XXXXXXXXXXXX1111"));
        assert!(!shown.contains("4111111111111111"));
        assert!(shown.contains("03/2027"));
        assert!(shown.contains("Visa"));
    }

    #[test]
    fn file_line_is_unmasked_and_pipe_delimited() {
        let c = CreditCard::new(
            "Jane Doe",
            "555-123-4567",
            "jane@example.com",
            "4111111111111111",
            "03/2027",
        )
        .expect("valid card");
        assert_eq!(
            c.to_file_line(),
            "Jane Doe|555-123-4567|jane@example.com|4111111111111111|03/2027"
        );
    }

    #[test]
    fn equality_and_ordering_use_the_number_only() {
        let a = CreditCard::new("A", "555-1234", "a@b.com", "4111111111111111", "01/2020")
            .expect("card a");
        let b = CreditCard::new("B", "555-9999", "b@b.com", "4111111111111111", "12/2099")
            .expect("card b");
        assert_eq!(a, b);

        let c = card("5500000000000004", "03/2027");
        assert!(a < c, "'4...' sorts before '5...' lexicographically");
    }

    #[test]
    fn classify_number_checks_length_first() {
        assert!(matches!(classify_number("123"), Err(InvalidField::Number(3))));
        let (digits, issuer) = classify_number("4111 1111 1111 1111").expect("valid");
        assert_eq!(digits, "4111111111111111");
        assert_eq!(issuer, Issuer::Visa);
    }
}
