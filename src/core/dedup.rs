use super::transaction::Transaction;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Namespace prefix for import identifiers.
pub const IMPORT_ID_PREFIX: &str = "splitwise_";

/// Stable import identifier for an expense.
///
/// YNAB matches on this string across runs, so the format must not change.
pub fn import_id(expense_id: u64) -> String {
    format!("{IMPORT_ID_PREFIX}{expense_id}")
}

/// Drop candidates whose import id already exists in the ledger.
///
/// Order-preserving. Identifier derivation is deterministic, so running
/// convert-then-filter again with the same snapshot removes exactly the
/// overlap and nothing else.
pub fn filter_new(
    transactions: Vec<Transaction>,
    existing_ids: &HashSet<String>,
) -> Vec<Transaction> {
    let total = transactions.len();
    let remaining: Vec<Transaction> = transactions
        .into_iter()
        .filter(|tx| {
            if existing_ids.contains(&tx.import_id) {
                log::info!("skipping duplicate transaction with import_id {}", tx.import_id);
                false
            } else {
                true
            }
        })
        .collect();

    log::info!(
        "filtered {} duplicate transactions, {} remaining",
        total - remaining.len(),
        remaining.len()
    );
    remaining
}

/// Ledger-side view of a transaction, as compared by the content matcher.
#[derive(Debug, Clone)]
pub struct ExistingTransaction {
    pub amount: i64,
    pub payee_name: String,
    pub memo: String,
    pub date: NaiveDate,
}

/// Thresholds for content-based duplicate matching.
#[derive(Debug, Clone, Copy)]
pub struct ContentMatchOptions {
    /// Maximum date difference in days still treated as the same purchase
    pub tolerance_days: i64,
    /// Minimum shared fraction of the smaller memo's word set
    pub min_memo_overlap: f64,
}

impl Default for ContentMatchOptions {
    fn default() -> Self {
        ContentMatchOptions {
            tolerance_days: 1,
            min_memo_overlap: 0.5,
        }
    }
}

/// Fallback matcher for rows imported before stable import ids existed.
///
/// Keeps candidates that match no existing transaction on amount, payee,
/// date (within tolerance) and memo word overlap.
pub fn detect_content_duplicates(
    transactions: Vec<Transaction>,
    existing: &[ExistingTransaction],
    options: ContentMatchOptions,
) -> Vec<Transaction> {
    let total = transactions.len();
    let remaining: Vec<Transaction> = transactions
        .into_iter()
        .filter(|tx| {
            let matched = existing
                .iter()
                .find(|candidate| is_content_duplicate(tx, candidate, options));
            match matched {
                Some(candidate) => {
                    log::info!(
                        "content duplicate: expense {} ('{}') on {} matches existing entry on {}",
                        tx.source_expense_id,
                        tx.payee_name,
                        tx.date(),
                        candidate.date
                    );
                    false
                }
                None => true,
            }
        })
        .collect();

    log::info!(
        "content matching dropped {} of {} transactions",
        total - remaining.len(),
        total
    );
    remaining
}

fn is_content_duplicate(
    tx: &Transaction,
    existing: &ExistingTransaction,
    options: ContentMatchOptions,
) -> bool {
    if tx.amount != existing.amount {
        return false;
    }

    let payee = tx.payee_name.trim().to_lowercase();
    let existing_payee = existing.payee_name.trim().to_lowercase();
    if payee != existing_payee {
        return false;
    }

    let date_diff = (tx.date() - existing.date).num_days().abs();
    if date_diff > options.tolerance_days {
        return false;
    }

    // Memos only count when both sides carry one.
    let memo = tx.memo.trim().to_lowercase();
    let existing_memo = existing.memo.trim().to_lowercase();
    if !memo.is_empty() && !existing_memo.is_empty() {
        let words: HashSet<&str> = memo.split_whitespace().collect();
        let existing_words: HashSet<&str> = existing_memo.split_whitespace().collect();
        let common = words.intersection(&existing_words).count();
        let required = words.len().min(existing_words.len()) as f64 * options.min_memo_overlap;
        if (common as f64) < required {
            return false;
        }
    }

    true
}
