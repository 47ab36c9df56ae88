//! Pick the next unprocessed debit SMS and turn it into a transaction.
//!
//! Each call emits at most one transaction, even when several eligible
//! messages are waiting. Candidates are visited in lexicographic order of
//! their stringified id, so `"10"` comes before `"2"`.

use chrono::NaiveDate;
use penny_core::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount;
use crate::error::{IngestError, Result};
use crate::ledger::{LedgerStore, ProcessedLedger};
use crate::source::MessageSource;
use crate::types::RawMessage;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// What to do when the first eligible message has no recognizable amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparsablePolicy {
    /// Stop and return nothing for this call. Later messages wait until the
    /// offending one leaves the batch.
    #[default]
    Block,
    /// Disqualify it and move on to the next candidate.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub fallback_date: NaiveDate,
    pub fallback_source: String,
    pub on_unparsable: UnparsablePolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fallback_date: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap_or_default(),
            fallback_source: "Unknown".to_string(),
            on_unparsable: UnparsablePolicy::Block,
        }
    }
}

/// Why a candidate was passed over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyId,
    AlreadyProcessed,
    MissingMessage,
    NotDebit,
    UnparsableAmount,
    MalformedDate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyId => write!(f, "empty id"),
            SkipReason::AlreadyProcessed => write!(f, "already processed"),
            SkipReason::MissingMessage => write!(f, "no message text"),
            SkipReason::NotDebit => write!(f, "not a debit"),
            SkipReason::UnparsableAmount => write!(f, "no amount found"),
            SkipReason::MalformedDate(d) => write!(f, "malformed date {d:?}"),
        }
    }
}

/// A record that passed the id and debit filters
#[derive(Debug)]
struct Candidate<'a> {
    id: String,
    message: &'a str,
    record: &'a RawMessage,
}

#[derive(Debug)]
enum Screening<'a> {
    Eligible(Candidate<'a>),
    Ineligible(SkipReason),
}

fn screen<'a>(record: &'a RawMessage, ledger: &ProcessedLedger) -> Screening<'a> {
    let id = record.key();
    if id.is_empty() {
        return Screening::Ineligible(SkipReason::EmptyId);
    }
    if ledger.contains(&id) {
        return Screening::Ineligible(SkipReason::AlreadyProcessed);
    }
    let Some(message) = record.message.as_deref() else {
        return Screening::Ineligible(SkipReason::MissingMessage);
    };
    if !message.to_lowercase().contains("debit") {
        return Screening::Ineligible(SkipReason::NotDebit);
    }
    Screening::Eligible(Candidate { id, message, record })
}

fn transaction_date(
    record: &RawMessage,
    options: &ExtractOptions,
) -> std::result::Result<NaiveDate, SkipReason> {
    match record.date.as_deref() {
        None => Ok(options.fallback_date),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map_err(|_| SkipReason::MalformedDate(raw.to_string())),
    }
}

/// Extract at most one new debit transaction from `records`.
///
/// On success the message id is added to `ledger` and the ledger is saved
/// through `store` before returning. A failed save is an error and leaves
/// `ledger` as it was.
pub fn extract_next<L: LedgerStore + ?Sized>(
    records: &[RawMessage],
    ledger: &mut ProcessedLedger,
    store: &L,
    options: &ExtractOptions,
) -> Result<Option<Transaction>> {
    Ok(extract_keyed(records, ledger, store, options)?.map(|(_, tx)| tx))
}

/// Like [`extract_next`], also returning the id that was marked processed.
fn extract_keyed<L: LedgerStore + ?Sized>(
    records: &[RawMessage],
    ledger: &mut ProcessedLedger,
    store: &L,
    options: &ExtractOptions,
) -> Result<Option<(String, Transaction)>> {
    let mut ordered: Vec<&RawMessage> = records.iter().collect();
    ordered.sort_by_cached_key(|r| r.key());

    for record in ordered {
        let candidate = match screen(record, ledger) {
            Screening::Eligible(c) => c,
            Screening::Ineligible(reason) => {
                tracing::debug!(id = %record.key(), %reason, "skipping SMS");
                continue;
            }
        };

        let Some(found) = amount::match_amount(candidate.message) else {
            match options.on_unparsable {
                UnparsablePolicy::Block => {
                    tracing::debug!(
                        id = %candidate.id,
                        reason = %SkipReason::UnparsableAmount,
                        "first eligible SMS has no amount, nothing extracted this run"
                    );
                    return Ok(None);
                }
                UnparsablePolicy::Skip => {
                    tracing::debug!(
                        id = %candidate.id,
                        reason = %SkipReason::UnparsableAmount,
                        "skipping SMS"
                    );
                    continue;
                }
            }
        };

        let date = match transaction_date(candidate.record, options) {
            Ok(d) => d,
            Err(reason) => {
                tracing::debug!(id = %candidate.id, %reason, "skipping SMS");
                continue;
            }
        };
        let source = candidate
            .record
            .source
            .clone()
            .unwrap_or_else(|| options.fallback_source.clone());

        ledger.insert(candidate.id.clone());
        if let Err(err) = store.save(ledger) {
            ledger.remove(&candidate.id);
            return Err(IngestError::LedgerWrite {
                id: candidate.id,
                source: err,
            });
        }

        tracing::info!(
            id = %candidate.id,
            amount = found.amount,
            rule = ?found.rule,
            "extracted debit transaction"
        );
        let tx = Transaction::debit(found.amount, date, source);
        return Ok(Some((candidate.id, tx)));
    }

    Ok(None)
}

/// Owns a message source, the ledger store, and the in-memory ledger loaded from it.
pub struct Extractor<S, L> {
    source: S,
    store: L,
    ledger: ProcessedLedger,
    options: ExtractOptions,
    last_processed: Option<String>,
}

impl<S: MessageSource, L: LedgerStore> Extractor<S, L> {
    pub fn new(source: S, store: L, options: ExtractOptions) -> Self {
        let ledger = store.load();
        Self {
            source,
            store,
            ledger,
            options,
            last_processed: None,
        }
    }

    pub fn ledger(&self) -> &ProcessedLedger {
        &self.ledger
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Id of the message behind the most recent transaction from this extractor.
    pub fn last_processed(&self) -> Option<&str> {
        self.last_processed.as_deref()
    }

    /// Read a fresh batch from the source and extract at most one transaction.
    pub fn next_transaction(&mut self) -> Result<Option<Transaction>> {
        let records = self.source.fetch();
        tracing::debug!(
            records = records.len(),
            processed = self.ledger.len(),
            "read SMS batch"
        );
        match extract_keyed(&records, &mut self.ledger, &self.store, &self.options)? {
            Some((id, tx)) => {
                self.last_processed = Some(id);
                Ok(Some(tx))
            }
            None => Ok(None),
        }
    }

    /// Forget every processed id, on disk and then in memory. If the file
    /// cannot be removed the in-memory ledger is left untouched.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear().map_err(IngestError::LedgerReset)?;
        self.ledger.clear();
        self.last_processed = None;
        tracing::info!("processed-id ledger reset");
        Ok(())
    }
}
