//! YNAB REST client.

use crate::core::{ExistingTransaction, Transaction};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub struct YnabClient {
    agent: ureq::Agent,
    base_url: String,
    access_token: String,
    budget_id: String,
}

/// A budget account as returned by the YNAB API.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    /// Current balance in milliunits
    pub balance: i64,
    #[serde(default)]
    pub closed: bool,
}

/// A ledger transaction as returned by the YNAB API.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionDetail {
    pub id: String,
    pub date: NaiveDate,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub import_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AccountsData {
    accounts: Vec<Account>,
}

#[derive(Debug, Deserialize)]
struct TransactionsData {
    transactions: Vec<TransactionDetail>,
}

#[derive(Debug, Deserialize)]
struct SaveTransactionsData {
    #[serde(default)]
    transactions: Vec<TransactionDetail>,
    #[serde(default)]
    duplicate_import_ids: Vec<String>,
}

/// Outgoing payload for the create endpoint.
#[derive(Debug, Serialize)]
struct SaveTransaction<'a> {
    account_id: &'a str,
    date: String,
    amount: i64,
    payee_name: &'a str,
    memo: &'a str,
    cleared: &'static str,
    import_id: &'a str,
}

#[derive(Debug, Serialize)]
struct SaveTransactionsBody<'a> {
    transactions: Vec<SaveTransaction<'a>>,
}

impl YnabClient {
    pub fn new(base_url: &str, access_token: &str, budget_id: &str) -> Self {
        YnabClient {
            agent: ureq::agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            budget_id: budget_id.to_string(),
        }
    }

    /// All accounts in the budget.
    pub fn accounts(&self) -> anyhow::Result<Vec<Account>> {
        let url = format!("{}/budgets/{}/accounts", self.base_url, self.budget_id);
        let response: Envelope<AccountsData> = self.get(&url)?;
        log::debug!("{} accounts in budget {}", response.data.accounts.len(), self.budget_id);
        Ok(response.data.accounts)
    }

    /// Look up an account by exact name.
    pub fn find_account(&self, name: &str) -> anyhow::Result<Account> {
        let accounts = self.accounts()?;
        match accounts.iter().find(|account| account.name == name) {
            Some(account) => {
                log::info!("found account '{}' with id {}", account.name, account.id);
                Ok(account.clone())
            }
            None => {
                let available: Vec<&str> =
                    accounts.iter().map(|account| account.name.as_str()).collect();
                anyhow::bail!(
                    "account '{}' not found. Available accounts: {}",
                    name,
                    available.join(", ")
                )
            }
        }
    }

    /// Every transaction on the account; the sync derives both the known
    /// import ids and the content-match view from this list.
    pub fn account_transactions(
        &self,
        account_id: &str,
    ) -> anyhow::Result<Vec<TransactionDetail>> {
        let url = format!(
            "{}/budgets/{}/accounts/{}/transactions",
            self.base_url, self.budget_id, account_id
        );
        let response: Envelope<TransactionsData> = self.get(&url)?;
        log::info!(
            "{} existing transactions on the account",
            response.data.transactions.len()
        );
        Ok(response.data.transactions)
    }

    /// Create the batch. Transactions land uncleared so they show up for
    /// review rather than silently posting.
    pub fn create_transactions(
        &self,
        account_id: &str,
        transactions: &[Transaction],
    ) -> anyhow::Result<Vec<TransactionDetail>> {
        if transactions.is_empty() {
            log::info!("no transactions to create");
            return Ok(Vec::new());
        }

        let body = SaveTransactionsBody {
            transactions: transactions
                .iter()
                .map(|tx| SaveTransaction {
                    account_id,
                    date: tx.date().format("%Y-%m-%d").to_string(),
                    amount: tx.amount,
                    payee_name: &tx.payee_name,
                    memo: &tx.memo,
                    cleared: "uncleared",
                    import_id: &tx.import_id,
                })
                .collect(),
        };

        let url = format!("{}/budgets/{}/transactions", self.base_url, self.budget_id);
        log::info!("creating batch of {} transactions", transactions.len());
        let response: Envelope<SaveTransactionsData> = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .send_json(&body)
            .with_context(|| format!("YNAB request failed: POST {url}"))?
            .into_json()
            .context("decoding YNAB create response")?;

        if !response.data.duplicate_import_ids.is_empty() {
            log::warn!(
                "YNAB rejected duplicate import ids: {}",
                response.data.duplicate_import_ids.join(", ")
            );
        }
        for created in &response.data.transactions {
            log::debug!(
                "created transaction {} for '{}'",
                created.id,
                created.payee_name.as_deref().unwrap_or("unknown")
            );
        }

        Ok(response.data.transactions)
    }

    fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        log::debug!("GET {url}");
        self.agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .call()
            .with_context(|| format!("YNAB request failed: GET {url}"))?
            .into_json()
            .with_context(|| format!("decoding YNAB response from {url}"))
    }
}

/// Comparable view of ledger transactions for the content matcher.
pub fn existing_view(transactions: &[TransactionDetail]) -> Vec<ExistingTransaction> {
    transactions
        .iter()
        .map(|tx| ExistingTransaction {
            amount: tx.amount,
            payee_name: tx.payee_name.clone().unwrap_or_default(),
            memo: tx.memo.clone().unwrap_or_default(),
            date: tx.date,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};

    #[test]
    fn accounts_response_shape() {
        let json = r#"{
            "data": {
                "accounts": [
                    {
                        "id": "account-123",
                        "name": "Splitwise (Wallet)",
                        "type": "cash",
                        "balance": 100000,
                        "closed": false
                    },
                    {
                        "id": "account-456",
                        "name": "Checking Account",
                        "type": "checking",
                        "balance": 500000,
                        "closed": true
                    }
                ]
            }
        }"#;

        let response: Envelope<AccountsData> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.accounts.len(), 2);
        assert_eq!(response.data.accounts[0].name, "Splitwise (Wallet)");
        assert_eq!(response.data.accounts[0].balance, 100000);
        assert!(response.data.accounts[1].closed);
    }

    #[test]
    fn transactions_response_tolerates_missing_optionals() {
        let json = r#"{
            "data": {
                "transactions": [
                    {
                        "id": "ynab-txn-123",
                        "date": "2024-01-15",
                        "amount": 12500,
                        "payee_name": "Grocery Shopping",
                        "import_id": "splitwise_67890"
                    },
                    {
                        "id": "ynab-txn-456",
                        "date": "2024-01-16",
                        "amount": -4200
                    }
                ]
            }
        }"#;

        let response: Envelope<TransactionsData> = serde_json::from_str(json).unwrap();
        let transactions = &response.data.transactions;
        assert_eq!(transactions[0].import_id.as_deref(), Some("splitwise_67890"));
        assert_eq!(transactions[1].import_id, None);
        assert_eq!(transactions[1].memo, None);
        assert_eq!(
            transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn create_response_defaults_duplicate_ids() {
        let json = r#"{"data": {"transactions": []}}"#;
        let response: Envelope<SaveTransactionsData> = serde_json::from_str(json).unwrap();
        assert!(response.data.duplicate_import_ids.is_empty());

        let json = r#"{
            "data": {
                "transactions": [],
                "duplicate_import_ids": ["splitwise_67890"]
            }
        }"#;
        let response: Envelope<SaveTransactionsData> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.duplicate_import_ids, vec!["splitwise_67890"]);
    }

    #[test]
    fn save_payload_matches_api_contract() {
        let tx = Transaction {
            amount: -15000,
            payee_name: "Restaurant Dinner".to_string(),
            memo: "Paid: $0.00, Owed: $15.00 | Splitwise ID: 11111".to_string(),
            datetime: DateTime::parse_from_rfc3339("2024-01-20T19:00:00+00:00").unwrap(),
            import_id: "splitwise_11111".to_string(),
            source_expense_id: "11111".to_string(),
            currency_code: "USD".to_string(),
        };

        let body = SaveTransactionsBody {
            transactions: vec![SaveTransaction {
                account_id: "account-123",
                date: tx.date().format("%Y-%m-%d").to_string(),
                amount: tx.amount,
                payee_name: &tx.payee_name,
                memo: &tx.memo,
                cleared: "uncleared",
                import_id: &tx.import_id,
            }],
        };

        let value = serde_json::to_value(&body).unwrap();
        let payload = &value["transactions"][0];
        assert_eq!(payload["account_id"], "account-123");
        assert_eq!(payload["date"], "2024-01-20");
        assert_eq!(payload["amount"], -15000);
        assert_eq!(payload["cleared"], "uncleared");
        assert_eq!(payload["import_id"], "splitwise_11111");
    }

    #[test]
    fn existing_view_fills_missing_fields() {
        let details = vec![TransactionDetail {
            id: "ynab-txn-456".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            amount: -4200,
            memo: None,
            payee_name: None,
            import_id: None,
        }];

        let view = existing_view(&details);
        assert_eq!(view[0].amount, -4200);
        assert_eq!(view[0].payee_name, "");
        assert_eq!(view[0].memo, "");
    }
}
