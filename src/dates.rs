//! Canonical date-format normalisation for oracle-extracted dates.
//!
//! The oracle is asked for `DD/MM/YYYY` (date of birth) and `DD/MM/YY`
//! (audiogram date) but occasionally answers in the other year width. These
//! are cheap, deterministic string rules that repair the year width without
//! touching anything else.
//!
//! Two deliberate limitations:
//!
//! * **No calendar validation** — `"31/13/2099"` passes through unchanged.
//!   A human reviews every extracted field downstream; blanking or
//!   "correcting" a value here would hide exactly the cases the reviewer
//!   needs to see.
//! * **Fixed century pivot** — two-digit years 00–30 expand to `20YY` and
//!   31–99 to `19YY`. A best-effort guess, not exact: it is right for
//!   claimant dates of birth (1931–2030) and wrong outside that window.

use once_cell::sync::Lazy;
use regex::Regex;

/// The two canonical output shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `DD/MM/YYYY` — four-digit year (dates of birth).
    FourDigitYear,
    /// `DD/MM/YY` — two-digit year (audiogram test dates).
    TwoDigitYear,
}

static RE_FOUR_DIGIT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap());
static RE_TWO_DIGIT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{2}$").unwrap());

/// Two-digit years at or below this expand to `20YY`; above it, `19YY`.
const CENTURY_PIVOT: u32 = 30;

/// Normalise a raw date string to the target format.
///
/// Rules, in order:
/// 1. Empty (after trimming) → empty string.
/// 2. Already matches the target pattern → returned unchanged.
/// 3. Matches the *other* pattern → year truncated or expanded.
/// 4. Anything else → returned unchanged (logged at `warn`) so the caller
///    can still show the value for visual verification. Never panics,
///    never blanks.
pub fn normalise(raw: &str, target: DateFormat) -> String {
    let date = raw.trim();
    if date.is_empty() {
        return String::new();
    }

    match target {
        DateFormat::FourDigitYear => {
            if RE_FOUR_DIGIT_YEAR.is_match(date) {
                return date.to_string();
            }
            if RE_TWO_DIGIT_YEAR.is_match(date) {
                return expand_year(date);
            }
        }
        DateFormat::TwoDigitYear => {
            if RE_TWO_DIGIT_YEAR.is_match(date) {
                return date.to_string();
            }
            if RE_FOUR_DIGIT_YEAR.is_match(date) {
                return truncate_year(date);
            }
        }
    }

    tracing::warn!(raw = %date, ?target, "date does not match a canonical pattern, passing through");
    date.to_string()
}

/// `DD/MM/YY` → `DD/MM/YYYY` using the century pivot.
fn expand_year(date: &str) -> String {
    let Some((day_month, year)) = date.rsplit_once('/') else {
        return date.to_string();
    };
    let Ok(year_num) = year.parse::<u32>() else {
        return date.to_string();
    };
    let century = if year_num <= CENTURY_PIVOT { "20" } else { "19" };
    format!("{day_month}/{century}{year}")
}

/// `DD/MM/YYYY` → `DD/MM/YY` by keeping the last two year digits.
fn truncate_year(date: &str) -> String {
    let Some((day_month, year)) = date.rsplit_once('/') else {
        return date.to_string();
    };
    format!("{day_month}/{}", &year[year.len().saturating_sub(2)..])
}
