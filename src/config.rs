use clap::Args;

const SPLITWISE_API_URL: &str = "https://secure.splitwise.com/api/v3.0";
const YNAB_API_URL: &str = "https://api.ynab.com/v1";

// Below this a credential cannot be a real token.
const MIN_TOKEN_LEN: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid Splitwise API key: expected a long alphanumeric string")]
    InvalidSplitwiseKey,
    #[error("invalid YNAB access token: expected a long alphanumeric string")]
    InvalidYnabToken,
    #[error("YNAB account name must not be empty")]
    EmptyAccountName,
}

/// Splitwise credentials and endpoint, from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct SplitwiseAuth {
    /// Splitwise personal API key
    #[arg(
        long = "splitwise-api-key",
        env = "SPLITWISE_API_KEY",
        hide_env_values = true
    )]
    pub api_key: String,

    /// Splitwise API base URL
    #[arg(
        id = "splitwise_api_url",
        long = "splitwise-api-url",
        env = "SPLITWISE_API_URL",
        default_value = SPLITWISE_API_URL
    )]
    pub api_url: String,
}

impl SplitwiseAuth {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.len() < MIN_TOKEN_LEN {
            return Err(ConfigError::InvalidSplitwiseKey);
        }
        Ok(())
    }
}

/// YNAB credentials, budget and endpoint, from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct YnabAuth {
    /// YNAB personal access token
    #[arg(
        long = "ynab-access-token",
        env = "YNAB_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub access_token: String,

    /// Account receiving the imported transactions
    #[arg(
        long = "ynab-account-name",
        env = "YNAB_ACCOUNT_NAME",
        default_value = "Splitwise (Wallet)"
    )]
    pub account_name: String,

    /// Budget to import into ("last-used" targets the most recently opened budget)
    #[arg(
        long = "ynab-budget-id",
        env = "YNAB_BUDGET_ID",
        default_value = "last-used"
    )]
    pub budget_id: String,

    /// YNAB API base URL
    #[arg(
        id = "ynab_api_url",
        long = "ynab-api-url",
        env = "YNAB_API_URL",
        default_value = YNAB_API_URL
    )]
    pub api_url: String,
}

impl YnabAuth {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.len() < MIN_TOKEN_LEN {
            return Err(ConfigError::InvalidYnabToken);
        }
        if self.account_name.trim().is_empty() {
            return Err(ConfigError::EmptyAccountName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitwise(api_key: &str) -> SplitwiseAuth {
        SplitwiseAuth {
            api_key: api_key.to_string(),
            api_url: SPLITWISE_API_URL.to_string(),
        }
    }

    fn ynab(access_token: &str, account_name: &str) -> YnabAuth {
        YnabAuth {
            access_token: access_token.to_string(),
            account_name: account_name.to_string(),
            budget_id: "last-used".to_string(),
            api_url: YNAB_API_URL.to_string(),
        }
    }

    #[test]
    fn plausible_credentials_pass() {
        assert!(splitwise("abcdef1234567890").validate().is_ok());
        assert!(ynab("abcdef1234567890", "Splitwise (Wallet)").validate().is_ok());
    }

    #[test]
    fn short_tokens_are_rejected() {
        assert_eq!(
            splitwise("short").validate().unwrap_err(),
            ConfigError::InvalidSplitwiseKey
        );
        assert_eq!(
            ynab("short", "Splitwise (Wallet)").validate().unwrap_err(),
            ConfigError::InvalidYnabToken
        );
    }

    #[test]
    fn blank_account_name_is_rejected() {
        assert_eq!(
            ynab("abcdef1234567890", "   ").validate().unwrap_err(),
            ConfigError::EmptyAccountName
        );
    }
}
