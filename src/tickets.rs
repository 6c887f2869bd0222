//! Ticket-book arithmetic for paper order tickets.
//!
//! Tickets are numbered sequentially and bound in books of a fixed size.
//! Ticket `n` lives in book `n / size` at position `n % size`. A staff
//! member's shift covers a range from the first to the last ticket they
//! wrote, which may roll over into a later book.

use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroU64, str::FromStr};
use thiserror::Error;

pub const DEFAULT_BOOK_SIZE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl TicketError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TicketInput", into = "u64")]
pub struct TicketNumber(u64);

impl TicketNumber {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for TicketNumber {
    type Error = TicketError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| TicketError::invalid(format!("ticket number must not be negative, got {value}")))
    }
}

impl FromStr for TicketNumber {
    type Err = TicketError;

    /// Accepts operator-entered text. Surrounding whitespace is ignored;
    /// signs, decimals and anything non-numeric are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TicketError::invalid("ticket number is empty"));
        }
        parse_whole(trimmed).map(Self).ok_or_else(|| {
            TicketError::invalid(format!(
                "ticket number must be a whole non-negative number, got {trimmed:?}"
            ))
        })
    }
}

// Digits only: `u64::from_str` would also take a leading `+`.
fn parse_whole(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl From<TicketNumber> for u64 {
    fn from(value: TicketNumber) -> Self {
        value.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Form fields arrive either as JSON numbers or as the raw text the operator typed.
#[derive(Deserialize)]
#[serde(untagged)]
enum TicketInput {
    Number(u64),
    Text(String),
}

impl TryFrom<TicketInput> for TicketNumber {
    type Error = TicketError;

    fn try_from(input: TicketInput) -> Result<Self, Self::Error> {
        match input {
            TicketInput::Number(value) => Ok(Self(value)),
            TicketInput::Text(text) => text.parse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BookSize(NonZeroU64);

impl BookSize {
    pub fn new(size: u64) -> Result<Self, TicketError> {
        NonZeroU64::new(size)
            .map(Self)
            .ok_or_else(|| TicketError::invalid("book size must be greater than zero"))
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }

    pub fn book_of(self, ticket: TicketNumber) -> u64 {
        ticket.get() / self.get()
    }

    pub fn position_of(self, ticket: TicketNumber) -> u64 {
        ticket.get() % self.get()
    }
}

impl Default for BookSize {
    fn default() -> Self {
        Self(NonZeroU64::MIN.saturating_add(DEFAULT_BOOK_SIZE - 1))
    }
}

impl TryFrom<u64> for BookSize {
    type Error = TicketError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for BookSize {
    type Error = TicketError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let size = u64::try_from(value)
            .map_err(|_| TicketError::invalid(format!("book size must be greater than zero, got {value}")))?;
        Self::new(size)
    }
}

impl From<BookSize> for u64 {
    fn from(value: BookSize) -> Self {
        value.get()
    }
}

impl FromStr for BookSize {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let size = parse_whole(trimmed)
            .ok_or_else(|| TicketError::invalid(format!("book size must be a positive whole number, got {trimmed:?}")))?;
        Self::new(size)
    }
}

/// How tickets in books strictly between the start and end book are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Only the partial first and last books are counted. Matches the
    /// figures the shop has always reported, including the undercount when
    /// a whole book is skipped.
    #[default]
    Observed,
    /// Every fully spanned intermediate book adds a full book of tickets.
    FullBooks,
}

impl FromStr for CountMode {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observed" => Ok(Self::Observed),
            "full_books" | "full-books" => Ok(Self::FullBooks),
            other => Err(TicketError::invalid(format!(
                "count mode must be 'observed' or 'full_books', got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRange {
    pub start: TicketNumber,
    pub end: TicketNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub start_book: u64,
    pub end_book: u64,
    pub book_rollover: bool,
    pub valid: bool,
    pub tickets_used: u64,
}

impl TicketRange {
    pub const fn new(start: TicketNumber, end: TicketNumber) -> Self {
        Self { start, end }
    }

    pub fn crosses_books(&self, book: BookSize) -> bool {
        book.book_of(self.start) != book.book_of(self.end)
    }

    /// Within one book tickets only go up. Across books anything goes: the
    /// operator is trusted to have started a new book.
    pub fn is_valid(&self, book: BookSize) -> bool {
        if self.crosses_books(book) {
            return true;
        }
        book.position_of(self.end) >= book.position_of(self.start)
    }

    /// Inclusive count of tickets used. A decreasing range inside one book
    /// counts as zero.
    pub fn count(&self, book: BookSize, mode: CountMode) -> u64 {
        let start_book = book.book_of(self.start);
        let end_book = book.book_of(self.end);

        if start_book == end_book {
            return match self.end.get().checked_sub(self.start.get()) {
                Some(diff) => diff + 1,
                None => 0,
            };
        }

        let size = book.get();
        let in_first_book = size - book.position_of(self.start);
        let in_last_book = book.position_of(self.end) + 1;
        let partial = in_first_book.saturating_add(in_last_book);

        match mode {
            CountMode::Observed => partial,
            CountMode::FullBooks => {
                let skipped = end_book.saturating_sub(start_book).saturating_sub(1);
                partial.saturating_add(skipped.saturating_mul(size))
            }
        }
    }

    pub fn reconcile(&self, book: BookSize, mode: CountMode) -> Reconciliation {
        let start_book = book.book_of(self.start);
        let end_book = book.book_of(self.end);
        Reconciliation {
            start_book,
            end_book,
            book_rollover: start_book != end_book,
            valid: self.is_valid(book),
            tickets_used: self.count(book, mode),
        }
    }
}

fn validated(start: i64, end: i64, book_size: i64) -> Result<(TicketRange, BookSize), TicketError> {
    let book = BookSize::try_from(book_size)?;
    let start = TicketNumber::try_from(start)?;
    let end = TicketNumber::try_from(end)?;
    Ok((TicketRange::new(start, end), book))
}

/// Whether `start..=end` is a plausible range of tickets for books of
/// `book_size`.
///
/// Fails with [`TicketError::InvalidArgument`] for negative ticket numbers or
/// a non-positive book size.
pub fn is_valid_range(start: i64, end: i64, book_size: i64) -> Result<bool, TicketError> {
    let (range, book) = validated(start, end, book_size)?;
    Ok(range.is_valid(book))
}

/// Tickets used between `start` and `end`, counted the way shift reports
/// always have been (intermediate books are not added).
///
/// Fails with [`TicketError::InvalidArgument`] under the same conditions as
/// [`is_valid_range`].
pub fn count_tickets(start: i64, end: i64, book_size: i64) -> Result<u64, TicketError> {
    let (range, book) = validated(start, end, book_size)?;
    Ok(range.count(book, CountMode::Observed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn range(start: u64, end: u64) -> TicketRange {
        TicketRange::new(TicketNumber::new(start), TicketNumber::new(end))
    }

    fn book(size: u64) -> BookSize {
        BookSize::new(size).unwrap()
    }

    #[test]
    fn same_book_counts_inclusively() {
        assert_eq!(count_tickets(105, 110, 100).unwrap(), 6);
        assert!(is_valid_range(105, 110, 100).unwrap());
    }

    #[test]
    fn same_book_single_ticket_counts_one() {
        assert_eq!(count_tickets(142, 142, 100).unwrap(), 1);
        assert!(is_valid_range(142, 142, 100).unwrap());
    }

    #[test]
    fn same_book_decreasing_is_invalid_and_zero() {
        assert_eq!(count_tickets(150, 120, 100).unwrap(), 0);
        assert!(!is_valid_range(150, 120, 100).unwrap());
    }

    #[test]
    fn adjacent_books_add_both_partials() {
        assert_eq!(count_tickets(195, 205, 100).unwrap(), 11);
        assert!(is_valid_range(195, 205, 100).unwrap());
    }

    #[test]
    fn cross_book_is_valid_regardless_of_positions() {
        assert!(is_valid_range(150, 220, 100).unwrap());
        // later position in an earlier book still counts as a new book
        assert!(is_valid_range(290, 110, 100).unwrap());
    }

    #[test]
    fn end_in_earlier_book_uses_both_partials() {
        // 290..=299 in book 2, then 100..=110 in book 1
        assert_eq!(count_tickets(290, 110, 100).unwrap(), 21);
        assert_eq!(range(290, 110).count(book(100), CountMode::FullBooks), 21);
        assert_eq!(count_tickets(250, 50, 100).unwrap(), 101);
    }

    #[test]
    fn skipped_book_is_not_counted_in_observed_mode() {
        assert_eq!(count_tickets(50, 250, 100).unwrap(), 101);
        assert_eq!(range(50, 250).count(book(100), CountMode::Observed), 101);
    }

    #[test]
    fn full_books_mode_adds_skipped_books() {
        assert_eq!(range(50, 250).count(book(100), CountMode::FullBooks), 201);
        assert_eq!(range(50, 450).count(book(100), CountMode::FullBooks), 401);
        // adjacent books have nothing to skip
        assert_eq!(range(195, 205).count(book(100), CountMode::FullBooks), 11);
        assert_eq!(range(105, 110).count(book(100), CountMode::FullBooks), 6);
    }

    #[test]
    fn rollover_to_book_boundary() {
        // 199 is the last ticket of book 1, 200 the first of book 2
        assert_eq!(count_tickets(199, 200, 100).unwrap(), 2);
        assert_eq!(count_tickets(100, 199, 100).unwrap(), 100);
    }

    #[test]
    fn other_book_sizes() {
        assert_eq!(count_tickets(45, 55, 50).unwrap(), 11);
        assert_eq!(count_tickets(3, 7, 1).unwrap(), 2);
        assert!(is_valid_range(0, 0, 1).unwrap());
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert!(matches!(count_tickets(-1, 5, 100), Err(TicketError::InvalidArgument(_))));
        assert!(matches!(is_valid_range(5, -1, 100), Err(TicketError::InvalidArgument(_))));
    }

    #[test]
    fn non_positive_book_size_is_rejected() {
        assert!(matches!(count_tickets(1, 5, 0), Err(TicketError::InvalidArgument(_))));
        assert!(matches!(is_valid_range(1, 5, -100), Err(TicketError::InvalidArgument(_))));
        assert!(BookSize::new(0).is_err());
    }

    #[test]
    fn parses_operator_text() {
        assert_eq!(" 0042 ".parse::<TicketNumber>().unwrap(), TicketNumber::new(42));
        assert!("12.5".parse::<TicketNumber>().is_err());
        assert!("-3".parse::<TicketNumber>().is_err());
        assert!("+3".parse::<TicketNumber>().is_err());
        assert!("abc".parse::<TicketNumber>().is_err());
        assert!("".parse::<TicketNumber>().is_err());
    }

    #[test]
    fn deserializes_numbers_and_numeric_strings() {
        let from_number: TicketNumber = serde_json::from_str("120").unwrap();
        let from_text: TicketNumber = serde_json::from_str("\"120\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<TicketNumber>("-5").is_err());
        assert!(serde_json::from_str::<TicketNumber>("1.5").is_err());
        assert!(serde_json::from_str::<TicketNumber>("\"x1\"").is_err());
        assert!(serde_json::from_str::<BookSize>("0").is_err());
    }

    #[test]
    fn book_size_text_takes_digits_only() {
        assert_eq!(" 50 ".parse::<BookSize>().unwrap().get(), 50);
        assert!("+100".parse::<BookSize>().is_err());
        assert!("-100".parse::<BookSize>().is_err());
        assert!("0".parse::<BookSize>().is_err());
        assert!("1e2".parse::<BookSize>().is_err());
        assert!("".parse::<BookSize>().is_err());
    }

    #[test]
    fn count_mode_parses() {
        assert_eq!("observed".parse::<CountMode>().unwrap(), CountMode::Observed);
        assert_eq!("FULL_BOOKS".parse::<CountMode>().unwrap(), CountMode::FullBooks);
        assert!("all".parse::<CountMode>().is_err());
    }

    #[test]
    fn reconcile_reports_books() {
        let result = range(195, 205).reconcile(BookSize::default(), CountMode::Observed);
        assert_eq!(result.start_book, 1);
        assert_eq!(result.end_book, 2);
        assert!(result.book_rollover);
        assert!(result.valid);
        assert_eq!(result.tickets_used, 11);
    }

    proptest! {
        #[test]
        fn prop_same_book_matches_inclusive_count(b in 1u64..1_000, book_no in 0u64..1_000, x in 0u64..1_000, y in 0u64..1_000) {
            let start = book_no * b + x % b;
            let end = book_no * b + y % b;
            let counted = range(start, end).count(book(b), CountMode::Observed);
            if end >= start {
                prop_assert_eq!(counted, end - start + 1);
                prop_assert!(range(start, end).is_valid(book(b)));
            } else {
                prop_assert_eq!(counted, 0);
                prop_assert!(!range(start, end).is_valid(book(b)));
            }
        }

        #[test]
        fn prop_cross_book_always_valid_and_bounded(b in 1u64..1_000, start in 0u64..100_000, end in 0u64..100_000) {
            let r = range(start, end);
            prop_assume!(r.crosses_books(book(b)));
            prop_assert!(r.is_valid(book(b)));
            let counted = r.count(book(b), CountMode::Observed);
            prop_assert!(counted >= 2);
            prop_assert!(counted <= 2 * b);
        }

        #[test]
        fn prop_end_in_earlier_book_is_valid_and_bounded(b in 1u64..1_000, end_book in 0u64..100, gap in 1u64..100, x in 0u64..1_000, y in 0u64..1_000) {
            let start = (end_book + gap) * b + x % b;
            let end = end_book * b + y % b;
            let r = range(start, end);
            prop_assert!(start > end);
            prop_assert!(r.is_valid(book(b)));
            let counted = r.count(book(b), CountMode::Observed);
            prop_assert_eq!(counted, (b - x % b) + (y % b + 1));
            prop_assert_eq!(r.count(book(b), CountMode::FullBooks), counted);
        }

        #[test]
        fn prop_functions_are_idempotent(start in 0i64..1_000_000, end in 0i64..1_000_000, b in 1i64..10_000) {
            prop_assert_eq!(count_tickets(start, end, b), count_tickets(start, end, b));
            prop_assert_eq!(is_valid_range(start, end, b), is_valid_range(start, end, b));
        }

        #[test]
        fn prop_full_books_never_less_than_observed(b in 1u64..1_000, start in 0u64..100_000, end in 0u64..100_000) {
            let r = range(start, end);
            prop_assert!(r.count(book(b), CountMode::FullBooks) >= r.count(book(b), CountMode::Observed));
        }
    }
}
