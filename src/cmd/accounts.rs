//! Accounts command - lists the accounts of a YNAB budget

use crate::cmd::format_milliunits;
use crate::config::YnabAuth;
use crate::ynab::YnabClient;
use clap::Args;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct AccountsCommand {
    #[command(flatten)]
    ynab: YnabAuth,
}

impl AccountsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        self.ynab.validate()?;

        let client = YnabClient::new(
            &self.ynab.api_url,
            &self.ynab.access_token,
            &self.ynab.budget_id,
        );
        let accounts = client.accounts()?;
        if accounts.is_empty() {
            println!("No accounts found in budget '{}'", self.ynab.budget_id);
            return Ok(());
        }

        let rows: Vec<AccountRow> = accounts
            .iter()
            .map(|account| AccountRow {
                name: account.name.clone(),
                account_type: account.account_type.clone(),
                balance: format_milliunits(account.balance),
                closed: if account.closed { "yes" } else { "" }.to_string(),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

/// Row for the accounts table output
#[derive(Debug, Clone, Tabled)]
struct AccountRow {
    #[tabled(rename = "Account")]
    name: String,

    #[tabled(rename = "Type")]
    account_type: String,

    #[tabled(rename = "Balance")]
    balance: String,

    #[tabled(rename = "Closed")]
    closed: String,
}
