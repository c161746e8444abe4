//! Sync command - converts Splitwise expenses and imports them into YNAB

use crate::cmd::format_milliunits;
use crate::config::{SplitwiseAuth, YnabAuth};
use crate::core::{
    detect_content_duplicates, filter_new, process_expenses, validate_transactions,
    ContentMatchOptions, Transaction,
};
use crate::splitwise::SplitwiseClient;
use crate::ynab::{existing_view, YnabClient};
use chrono::NaiveDate;
use clap::Args;
use std::collections::HashSet;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SyncCommand {
    /// Sync expenses dated on or after this date (YYYY-MM-DD)
    #[arg(short, long)]
    start_date: NaiveDate,

    /// Preview the transactions without importing them
    #[arg(long)]
    dry_run: bool,

    /// Also match against ledger rows imported before stable import ids
    #[arg(long)]
    content_match: bool,

    /// Date difference in days the content matcher still accepts
    #[arg(long, default_value_t = 1)]
    tolerance_days: i64,

    #[command(flatten)]
    splitwise: SplitwiseAuth,

    #[command(flatten)]
    ynab: YnabAuth,
}

impl SyncCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        self.splitwise.validate()?;
        self.ynab.validate()?;

        let splitwise = SplitwiseClient::new(&self.splitwise.api_url, &self.splitwise.api_key);
        let ynab = YnabClient::new(
            &self.ynab.api_url,
            &self.ynab.access_token,
            &self.ynab.budget_id,
        );

        let user = splitwise.get_current_user()?;
        println!("Connected to Splitwise as {}", user.display_name());

        let account = ynab.find_account(&self.ynab.account_name)?;
        println!("Found YNAB account '{}'", account.name);

        let expenses = splitwise.get_all_expenses_since(self.start_date)?;
        if expenses.is_empty() {
            println!("No expenses found since {}", self.start_date);
            return Ok(());
        }
        println!("Found {} expenses since {}", expenses.len(), self.start_date);

        let transactions = process_expenses(&expenses, user.id)?;
        if transactions.is_empty() {
            println!("No transactions to import (you have no share in the found expenses)");
            return Ok(());
        }

        let existing = ynab.account_transactions(&account.id)?;
        let existing_ids: HashSet<String> = existing
            .iter()
            .filter_map(|tx| tx.import_id.clone())
            .collect();

        let total = transactions.len();
        let mut new_transactions = filter_new(transactions, &existing_ids);
        if self.content_match {
            let options = ContentMatchOptions {
                tolerance_days: self.tolerance_days,
                ..ContentMatchOptions::default()
            };
            new_transactions =
                detect_content_duplicates(new_transactions, &existing_view(&existing), options);
        }

        let skipped = total - new_transactions.len();
        if skipped > 0 {
            println!("Skipped {skipped} duplicate transactions");
        }
        if new_transactions.is_empty() {
            println!("All transactions already exist in YNAB");
            return Ok(());
        }

        let currencies: HashSet<&str> = new_transactions
            .iter()
            .map(|tx| tx.currency_code.as_str())
            .collect();
        if currencies.len() > 1 {
            let mut currencies: Vec<&str> = currencies.into_iter().collect();
            currencies.sort_unstable();
            log::warn!(
                "expenses span multiple currencies ({}); amounts are imported as-is",
                currencies.join(", ")
            );
        }

        println!("{} new transactions to import:", new_transactions.len());
        self.print_preview(&new_transactions);

        if self.dry_run {
            println!("Dry run completed - no transactions were imported");
            return Ok(());
        }

        validate_transactions(&new_transactions)?;
        let created = ynab.create_transactions(&account.id, &new_transactions)?;
        println!(
            "Imported {} transactions ({} duplicates skipped)",
            created.len(),
            skipped
        );
        println!("Imported transactions are uncleared, ready for review in YNAB");
        Ok(())
    }

    fn print_preview(&self, transactions: &[Transaction]) {
        let rows: Vec<TransactionRow> = transactions
            .iter()
            .map(|tx| TransactionRow {
                date: tx.date().to_string(),
                amount: format_milliunits(tx.amount),
                payee: tx.payee_name.clone(),
                memo: truncate_memo(&tx.memo),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        let total: i64 = transactions.iter().map(|tx| tx.amount).sum();
        println!("Total: {}", format_milliunits(total));
    }
}

/// Row for the preview table output
#[derive(Debug, Clone, Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,

    #[tabled(rename = "Amount")]
    amount: String,

    #[tabled(rename = "Payee")]
    payee: String,

    #[tabled(rename = "Memo")]
    memo: String,
}

fn truncate_memo(memo: &str) -> String {
    if memo.chars().count() > 60 {
        let head: String = memo.chars().take(57).collect();
        format!("{head}...")
    } else {
        memo.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_memos_pass_through() {
        assert_eq!(truncate_memo("Paid: $25.00"), "Paid: $25.00");
        assert_eq!(truncate_memo(""), "");
    }

    #[test]
    fn long_memos_are_cut_with_ellipsis() {
        let memo = "x".repeat(80);
        let truncated = truncate_memo(&memo);
        assert_eq!(truncated.chars().count(), 60);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with(&"x".repeat(57)));
    }

    #[test]
    fn sixty_character_memo_is_untouched() {
        let memo = "y".repeat(60);
        assert_eq!(truncate_memo(&memo), memo);
    }
}
