use chrono::{DateTime, FixedOffset, NaiveDate};

/// A candidate YNAB transaction derived from a Splitwise expense.
///
/// Built once by the converter and never mutated afterwards; later stages
/// either pass it through or drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Amount in milliunits (1000 = $1.00); negative when money is owed
    pub amount: i64,
    pub payee_name: String,
    pub memo: String,
    pub datetime: DateTime<FixedOffset>,
    /// `splitwise_{expense id}` - YNAB matches on this string across runs
    pub import_id: String,
    pub source_expense_id: String,
    pub currency_code: String,
}

impl Transaction {
    /// Date portion, used for display and content matching
    pub fn date(&self) -> NaiveDate {
        self.datetime.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_drops_time_and_offset() {
        let tx = Transaction {
            amount: 12500,
            payee_name: "Grocery Shopping".to_string(),
            memo: String::new(),
            datetime: DateTime::parse_from_rfc3339("2024-01-15T22:30:00-05:00").unwrap(),
            import_id: "splitwise_67890".to_string(),
            source_expense_id: "67890".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }
}
