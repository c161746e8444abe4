use super::dedup::import_id;
use super::expense::Expense;
use super::transaction::Transaction;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("missing expense date: {expense_id}")]
    MissingDate { expense_id: u64 },
    #[error("invalid date format '{value}' in expense {expense_id}")]
    InvalidDate { expense_id: u64, value: String },
    #[error("malformed {field} '{value}' in expense {expense_id}")]
    MalformedShare {
        expense_id: u64,
        field: &'static str,
        value: String,
    },
    #[error("amount out of range in expense {expense_id}")]
    AmountOutOfRange { expense_id: u64 },
}

/// A user's position on a single expense, in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserShare {
    pub paid: Decimal,
    pub owed: Decimal,
    /// paid - owed; positive when the user is owed money back
    pub net: Decimal,
}

/// Extract the share for `user_id` from an expense.
///
/// `Ok(None)` means the user is not a participant - a normal outcome,
/// distinct from a settled (zero net) share.
pub fn user_share(expense: &Expense, user_id: u64) -> Result<Option<UserShare>, ConvertError> {
    let entry = match expense.users.iter().find(|u| u.user_id == user_id) {
        Some(entry) => entry,
        None => return Ok(None),
    };

    let paid = parse_share(expense.id, "paid_share", &entry.paid_share)?;
    let owed = parse_share(expense.id, "owed_share", &entry.owed_share)?;

    Ok(Some(UserShare {
        paid,
        owed,
        net: paid - owed,
    }))
}

fn parse_share(
    expense_id: u64,
    field: &'static str,
    value: &str,
) -> Result<Decimal, ConvertError> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ConvertError::MalformedShare {
            expense_id,
            field,
            value: value.to_string(),
        })
}

/// Build the transaction memo: paid/owed summary, participant names, notes
/// and the source expense id, joined by " | ".
pub fn build_memo(expense: &Expense, share: &UserShare) -> String {
    let mut parts = vec![format!(
        "Paid: ${:.2}, Owed: ${:.2}",
        share.paid, share.owed
    )];

    let names: Vec<String> = expense
        .users
        .iter()
        .filter_map(|u| u.user.as_ref())
        .map(|p| p.display_name())
        .filter(|name| !name.is_empty())
        .collect();
    if !names.is_empty() {
        parts.push(format!("Users: {}", names.join(", ")));
    }

    if let Some(details) = &expense.details {
        let details = details.trim();
        if !details.is_empty() {
            parts.push(format!("Notes: {details}"));
        }
    }

    parts.push(format!("Splitwise ID: {}", expense.id));
    parts.join(" | ")
}

/// Convert one expense into a candidate transaction for `user_id`.
///
/// `Ok(None)` when the user is not on the expense or their share rounds to
/// zero - a fully settled share produces no ledger line.
pub fn convert_expense(
    expense: &Expense,
    user_id: u64,
) -> Result<Option<Transaction>, ConvertError> {
    let date_str = expense.date.trim();
    if date_str.is_empty() {
        return Err(ConvertError::MissingDate {
            expense_id: expense.id,
        });
    }
    let datetime = parse_datetime(date_str).ok_or_else(|| ConvertError::InvalidDate {
        expense_id: expense.id,
        value: date_str.to_string(),
    })?;

    let share = match user_share(expense, user_id)? {
        Some(share) => share,
        None => {
            log::debug!("user {} not involved in expense {}", user_id, expense.id);
            return Ok(None);
        }
    };

    let amount = to_milliunits(expense.id, share.net)?;
    if amount == 0 {
        log::debug!("user {} has no net amount for expense {}", user_id, expense.id);
        return Ok(None);
    }

    let payee_name = match expense.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => description.to_string(),
        _ => "Unknown Expense".to_string(),
    };

    Ok(Some(Transaction {
        amount,
        payee_name,
        memo: build_memo(expense, &share),
        datetime,
        import_id: import_id(expense.id),
        source_expense_id: expense.id.to_string(),
        currency_code: expense.currency_code.clone(),
    }))
}

/// Convert a batch of expenses, preserving input order.
///
/// Fails on the first malformed expense: a bad record means the upstream
/// contract is broken and the whole batch is suspect.
pub fn process_expenses(
    expenses: &[Expense],
    user_id: u64,
) -> Result<Vec<Transaction>, ConvertError> {
    log::info!("processing {} expenses for user {}", expenses.len(), user_id);

    let mut transactions = Vec::new();
    for expense in expenses {
        if let Some(tx) = convert_expense(expense, user_id)? {
            transactions.push(tx);
        }
    }

    log::info!(
        "converted {} expenses into {} transactions",
        expenses.len(),
        transactions.len()
    );
    Ok(transactions)
}

/// Net currency units to YNAB milliunits. Exact halves round away from
/// zero, so 1.0005 -> 1001 and -1.0005 -> -1001.
fn to_milliunits(expense_id: u64, net: Decimal) -> Result<i64, ConvertError> {
    (net * Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(ConvertError::AmountOutOfRange { expense_id })
}

fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().fixed_offset());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().fixed_offset());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset());
    }
    None
}
