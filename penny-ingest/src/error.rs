use penny_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The ledger could not be saved after marking `id` processed. The id is
    /// rolled back in memory so the on-disk and in-memory ledgers agree.
    #[error("failed to persist processed id {id}: {source}")]
    LedgerWrite { id: String, source: StoreError },
    #[error("failed to reset processed-id ledger: {0}")]
    LedgerReset(#[source] StoreError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
