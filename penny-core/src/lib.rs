//! penny-core: transaction types, the monthly budget book, and the alert log.

pub mod alerts;
pub mod budget;
pub mod store;
pub mod transaction;

pub use alerts::{Alert, AlertLog};
pub use budget::{BudgetBook, BudgetStatus};
pub use store::StoreError;
pub use transaction::{Transaction, TransactionKind};
