use super::dedup::IMPORT_ID_PREFIX;
use super::transaction::Transaction;
use std::collections::HashSet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("transaction {index} missing import_id")]
    MissingImportId { index: usize },
    #[error("transaction {index} has invalid import_id format: {import_id}")]
    InvalidImportIdFormat { index: usize, import_id: String },
    #[error("duplicate import_id in batch: {import_id} (transaction {index})")]
    DuplicateInBatch { index: usize, import_id: String },
    #[error("transaction {index} has invalid {field}: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}

/// Tracks import ids seen within one validation pass.
///
/// Owned by the caller and scoped to a single batch. Call `reset` before
/// reusing it for an unrelated batch, otherwise ids from the previous pass
/// are reported as in-batch duplicates.
#[derive(Debug, Default)]
pub struct BatchValidator {
    seen: HashSet<String>,
}

impl BatchValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every candidate carries a well-formed, batch-unique
    /// import id. Fails on the first violation.
    pub fn validate_uniqueness(
        &mut self,
        transactions: &[Transaction],
    ) -> Result<(), ValidateError> {
        for (index, tx) in transactions.iter().enumerate() {
            if tx.import_id.is_empty() {
                return Err(ValidateError::MissingImportId { index });
            }
            if !tx.import_id.starts_with(IMPORT_ID_PREFIX) {
                return Err(ValidateError::InvalidImportIdFormat {
                    index,
                    import_id: tx.import_id.clone(),
                });
            }
            if !self.seen.insert(tx.import_id.clone()) {
                return Err(ValidateError::DuplicateInBatch {
                    index,
                    import_id: tx.import_id.clone(),
                });
            }
        }

        log::info!(
            "validated {} transactions with unique import ids",
            transactions.len()
        );
        Ok(())
    }

    /// Clear seen ids so the validator can serve another batch.
    pub fn reset(&mut self) {
        self.seen.clear();
        log::debug!("reset batch validator");
    }
}

/// Final structural check before candidates are sent to YNAB.
///
/// Uniqueness runs on a fresh validator; the per-field checks cover what
/// stays dynamic in a typed candidate (amounts and dates are already
/// enforced by their types).
pub fn validate_transactions(transactions: &[Transaction]) -> Result<(), ValidateError> {
    let mut validator = BatchValidator::new();
    validator.validate_uniqueness(transactions)?;

    for (index, tx) in transactions.iter().enumerate() {
        if tx.payee_name.trim().is_empty() {
            return Err(ValidateError::InvalidField {
                index,
                field: "payee_name",
                reason: "must not be empty".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn tx(import_id: &str, payee: &str) -> Transaction {
        Transaction {
            amount: 1000,
            payee_name: payee.to_string(),
            memo: String::new(),
            datetime: DateTime::parse_from_rfc3339("2024-01-15T00:00:00+00:00").unwrap(),
            import_id: import_id.to_string(),
            source_expense_id: "1".to_string(),
            currency_code: "USD".to_string(),
        }
    }

    #[test]
    fn unique_well_formed_ids_pass() {
        let transactions = vec![tx("splitwise_123", "Test 1"), tx("splitwise_456", "Test 2")];

        let mut validator = BatchValidator::new();
        assert!(validator.validate_uniqueness(&transactions).is_ok());
    }

    #[test]
    fn empty_import_id_is_missing() {
        let transactions = vec![tx("", "Test 1")];

        let mut validator = BatchValidator::new();
        let err = validator.validate_uniqueness(&transactions).unwrap_err();
        assert_eq!(err, ValidateError::MissingImportId { index: 0 });
    }

    #[test]
    fn foreign_prefix_is_rejected() {
        let transactions = vec![tx("invalid_format", "Test 1")];

        let mut validator = BatchValidator::new();
        let err = validator.validate_uniqueness(&transactions).unwrap_err();
        assert_eq!(
            err,
            ValidateError::InvalidImportIdFormat {
                index: 0,
                import_id: "invalid_format".to_string(),
            }
        );
    }

    #[test]
    fn repeated_id_in_batch_is_rejected() {
        let transactions = vec![tx("splitwise_123", "Test 1"), tx("splitwise_123", "Test 2")];

        let mut validator = BatchValidator::new();
        let err = validator.validate_uniqueness(&transactions).unwrap_err();
        assert_eq!(
            err,
            ValidateError::DuplicateInBatch {
                index: 1,
                import_id: "splitwise_123".to_string(),
            }
        );
    }

    #[test]
    fn reset_clears_seen_ids() {
        let transactions = vec![tx("splitwise_123", "Test 1")];

        let mut validator = BatchValidator::new();
        validator.validate_uniqueness(&transactions).unwrap();

        // Same batch again without reset trips the in-batch check.
        let err = validator.validate_uniqueness(&transactions).unwrap_err();
        assert_eq!(
            err,
            ValidateError::DuplicateInBatch {
                index: 0,
                import_id: "splitwise_123".to_string(),
            }
        );

        validator.reset();
        assert!(validator.validate_uniqueness(&transactions).is_ok());
    }

    #[test]
    fn blank_payee_fails_final_validation() {
        let transactions = vec![tx("splitwise_123", "   ")];

        let err = validate_transactions(&transactions).unwrap_err();
        assert_eq!(
            err,
            ValidateError::InvalidField {
                index: 0,
                field: "payee_name",
                reason: "must not be empty".to_string(),
            }
        );
    }

    #[test]
    fn well_formed_batch_passes_final_validation() {
        let transactions = vec![tx("splitwise_123", "Test 1"), tx("splitwise_456", "Test 2")];
        assert!(validate_transactions(&transactions).is_ok());
    }
}
