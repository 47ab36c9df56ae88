//! Amount extraction from free-text bank SMS.
//!
//! Formats vary by bank: currency before or after the figure, with or without
//! thousands separators. Rules are tried in a fixed order and the first rule
//! that matches anywhere in the text wins, even if a later rule would be more
//! specific. Currency tokens are `NGN`, `₦` or a bare `N`, all case-insensitive.
//!
//!   ₦1,234.56  NGN 1,234.56   -> currency-prefixed
//!   debited ... NGN1,200.00   -> debited phrase
//!   1,234.56 NGN              -> currency-suffixed
//!   ₦1200                     -> currency, ungrouped digits
//!   50000                     -> bare number (last resort)

use once_cell::sync::Lazy;
use regex::Regex;

/// Which cascade rule produced an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    CurrencyPrefixed,
    DebitedPhrase,
    CurrencySuffixed,
    CurrencyUngrouped,
    BareNumber,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountMatch {
    pub amount: f64,
    pub rule: AmountRule,
}

type Matcher = fn(&str) -> Option<f64>;

const CASCADE: [(AmountRule, Matcher); 5] = [
    (AmountRule::CurrencyPrefixed, currency_prefixed),
    (AmountRule::DebitedPhrase, debited_phrase),
    (AmountRule::CurrencySuffixed, currency_suffixed),
    (AmountRule::CurrencyUngrouped, currency_ungrouped),
    (AmountRule::BareNumber, bare_number),
];

// Every pattern below is a literal; failing to compile is a programming error.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid amount pattern {pattern}: {e}"))
}

// Digits are ASCII only: other scripts' digits never parse as f64.
static PREFIXED_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(?:NGN|₦|N)\s?([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?)"));

static DEBITED_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)debited.*?(?:NGN|₦|N)\s?([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?)")
});

static SUFFIXED_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?)\s?(?:NGN|₦|N)"));

static UNGROUPED_RE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)(?:NGN|₦|N)([0-9]+)"));

// Grouped figures first, then plain digit runs such as `50000`.
static BARE_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b([0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]{2})?|[0-9]+(?:\.[0-9]{2})?)\b")
});

/// First capture group of the leftmost match, commas stripped, parsed as a decimal.
///
/// Only finite amounts above zero count; anything else lets the cascade move on.
fn capture_amount(re: &Regex, text: &str) -> Option<f64> {
    let caps = re.captures(text)?;
    let amount: f64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn currency_prefixed(text: &str) -> Option<f64> {
    capture_amount(&PREFIXED_RE, text)
}

fn debited_phrase(text: &str) -> Option<f64> {
    capture_amount(&DEBITED_RE, text)
}

fn currency_suffixed(text: &str) -> Option<f64> {
    capture_amount(&SUFFIXED_RE, text)
}

fn currency_ungrouped(text: &str) -> Option<f64> {
    capture_amount(&UNGROUPED_RE, text)
}

fn bare_number(text: &str) -> Option<f64> {
    capture_amount(&BARE_RE, text)
}

/// Run the cascade and report which rule fired.
pub fn match_amount(message: &str) -> Option<AmountMatch> {
    CASCADE.iter().find_map(|(rule, matcher)| {
        matcher(message).map(|amount| AmountMatch {
            amount,
            rule: *rule,
        })
    })
}

pub fn extract_amount(message: &str) -> Option<f64> {
    match_amount(message).map(|m| m.amount)
}
