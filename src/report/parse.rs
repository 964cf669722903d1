//! Field parsers - turn scraped display text into typed values
//! Every parser is total: unparseable text yields `None` or an empty value.

use crate::report::types::Price;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static CURRENCY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());
static AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap());
static DATE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d/]+").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static WEEKDAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").unwrap());

/// Dates farther than this from today are assumed to be missing their year
const YEAR_INFERENCE_WINDOW_DAYS: i64 = 365;

/// Display formats seen on purchase history pages, tried in order.
/// Two-digit years come before four-digit ones so "03/15/17" is not year 17.
const DATE_FORMATS: &[&str] = &[
    "%b %d, %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %b, %Y",
    "%d %B %Y",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m/%d %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
];

/// Parse a price such as "US $1,234.56" into amount and currency code.
///
/// The currency code is the first alphabetic run anywhere in the text, so
/// "US $1.00" gives "US" and "$1.00 USD" gives "USD". Bare symbols are not
/// translated: "€99.00" has an empty currency code.
pub fn parse_price(text: &str) -> Price {
    Price {
        text: text.trim().to_string(),
        amount: parse_amount(text),
        currency_code: parse_currency_code(text),
    }
}

/// First numeric run, thousands separators removed
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let run = AMOUNT.find(text)?;
    let clean = run.as_str().replace(',', "");
    Decimal::from_str(&clean).ok()
}

pub fn parse_currency_code(text: &str) -> String {
    CURRENCY_CODE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Keep only the part after the last `-`, so "Jan 5 - Jan 10" becomes "Jan 10"
pub fn strip_range(text: &str) -> &str {
    match text.rfind('-') {
        Some(pos) => text[pos + 1..].trim(),
        None => text.trim(),
    }
}

/// Parse display text as a date relative to `today`.
///
/// Text that fails to parse, or parses to a date more than a year away from
/// `today`, is retried once with the current year appended. A literal parse is
/// kept when the retry fails.
pub fn parse_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let literal = parse_date_literal(text);
    let within_window = literal
        .map(|date| (today - date).num_days().abs() <= YEAR_INFERENCE_WINDOW_DAYS)
        .unwrap_or(false);

    if within_window {
        return literal;
    }

    let with_year = format!("{} {}", text, today.year());
    parse_date_literal(&with_year).or(literal)
}

/// Weekday names are dropped first; chrono rejects a weekday that does not
/// match the date, and the page shows them on year-less dates.
fn parse_date_literal(text: &str) -> Option<NaiveDate> {
    let text = WEEKDAY.replace(text, "");
    let text = text.as_ref();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Parse the tail of a possibly ranged date text ("Jan 5 - Jan 10")
pub fn parse_range_end(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_date(strip_range(text), today)
}

/// Whole days between `date` and `today`.
///
/// With `sign == 1` the date is expected in the past and the result counts
/// days elapsed; any other sign flips it for dates expected in the future.
pub fn date_diff(date: NaiveDate, sign: i64, today: NaiveDate) -> i64 {
    let sign = if sign == 1 { 1 } else { -1 };
    sign * (today - date).num_days()
}

/// First date-like run of digits and slashes in a shipping status text.
/// Empty means "not shipped".
pub fn ship_status_digits(text: &str) -> String {
    DATE_DIGITS
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// True when the extracted status is a real ship date
pub fn is_shipped(ship_status: &str, today: NaiveDate) -> bool {
    !ship_status.is_empty() && parse_date(ship_status, today).is_some()
}

/// Quantity from text such as "Qty: 2"; missing or zero means 1
pub fn parse_quantity(text: &str) -> u32 {
    DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|q| *q > 0)
        .unwrap_or(1)
}
