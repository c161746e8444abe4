use serde::Deserialize;

/// A shared expense as returned by the Splitwise API.
///
/// Only the fields the conversion pipeline consumes are modelled; anything
/// else in the payload is ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Expense {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form notes attached to the expense
    #[serde(default)]
    pub details: Option<String>,
    /// Expense datetime as sent by the API; parsed during conversion
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_currency")]
    pub currency_code: String,
    #[serde(default)]
    pub users: Vec<ExpenseShare>,
}

/// One participant's paid/owed split on an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseShare {
    #[serde(default)]
    pub user: Option<Participant>,
    pub user_id: u64,
    /// Decimal string, e.g. "25.00"
    #[serde(default = "zero_share")]
    pub paid_share: String,
    #[serde(default = "zero_share")]
    pub owed_share: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Participant {
    /// Full name for display; empty when both parts are missing.
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{first} {last}").trim().to_string()
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn zero_share() -> String {
    "0".to_string()
}
