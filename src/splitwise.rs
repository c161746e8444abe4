//! Splitwise REST client.

use crate::core::Expense;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;

const PAGE_SIZE: u32 = 100;

pub struct SplitwiseClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

/// The authenticated Splitwise user.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CurrentUser {
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{first} {last}").trim().to_string()
    }
}

#[derive(Debug, Deserialize)]
struct CurrentUserResponse {
    user: CurrentUser,
}

#[derive(Debug, Deserialize)]
struct ExpensesResponse {
    expenses: Vec<Expense>,
}

impl SplitwiseClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        SplitwiseClient {
            agent: ureq::agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Identify the authenticated user; also serves as the connection check.
    pub fn get_current_user(&self) -> anyhow::Result<CurrentUser> {
        let response: CurrentUserResponse = self.get("/get_current_user", &[])?;
        log::info!(
            "connected to Splitwise as {} ({})",
            response.user.display_name(),
            response.user.email.as_deref().unwrap_or("no email")
        );
        Ok(response.user)
    }

    /// One page of expenses dated after `dated_after`.
    pub fn get_expenses(
        &self,
        dated_after: NaiveDate,
        limit: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<Expense>> {
        let dated_after = dated_after.format("%Y-%m-%d").to_string();
        let limit = limit.to_string();
        let offset = offset.to_string();
        let params = [
            ("dated_after", dated_after.as_str()),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ];

        let response: ExpensesResponse = self.get("/get_expenses", &params)?;
        log::debug!("retrieved {} expenses at offset {offset}", response.expenses.len());
        Ok(response.expenses)
    }

    /// Every expense dated after `start_date`, paging until a short page.
    pub fn get_all_expenses_since(&self, start_date: NaiveDate) -> anyhow::Result<Vec<Expense>> {
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.get_expenses(start_date, PAGE_SIZE, offset)?;
            let page_len = page.len() as u32;
            all.extend(page);

            if page_len < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        log::info!("{} expenses fetched since {start_date}", all.len());
        Ok(all)
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key));
        for (name, value) in params {
            request = request.query(name, value);
        }

        log::debug!("GET {url}");
        let body: serde_json::Value = request
            .call()
            .with_context(|| format!("Splitwise request failed: GET {endpoint}"))?
            .into_json()
            .with_context(|| format!("decoding Splitwise response from {endpoint}"))?;

        // Splitwise reports some failures in an `errors` payload on a 200.
        if let Some(errors) = body.get("errors") {
            if has_errors(errors) {
                anyhow::bail!("Splitwise API error: {errors}");
            }
        }

        serde_json::from_value(body)
            .with_context(|| format!("unexpected Splitwise response shape from {endpoint}"))
    }
}

/// Mirrors the API convention: an absent, null or empty `errors` value
/// means success.
fn has_errors(errors: &serde_json::Value) -> bool {
    match errors {
        serde_json::Value::Null => false,
        serde_json::Value::Object(map) => !map.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
