pub mod accounts;
pub mod sync;

/// Renders a milliunit amount as a signed dollar string, e.g. `+$12.50`.
pub fn format_milliunits(amount: i64) -> String {
    let sign = if amount >= 0 { "+" } else { "-" };
    let abs = amount.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 1000, (abs % 1000) / 10)
}
