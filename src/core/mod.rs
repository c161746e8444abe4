pub mod convert;
pub mod dedup;
pub mod expense;
pub mod transaction;
pub mod validate;

// Flat public surface for domain types and functions.
pub use convert::{
    build_memo, convert_expense, process_expenses, user_share, ConvertError, UserShare,
};
pub use dedup::{
    detect_content_duplicates, filter_new, import_id, ContentMatchOptions, ExistingTransaction,
    IMPORT_ID_PREFIX,
};
pub use expense::{Expense, ExpenseShare, Participant};
pub use transaction::Transaction;
pub use validate::{validate_transactions, BatchValidator, ValidateError};
