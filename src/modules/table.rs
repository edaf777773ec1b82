use crate::tokens::UNKNOWN_SYMBOL;

use super::{resolver::Resolution, vaults::VaultReport};

pub const AGREEMENT: &str = "By claiming these tokens, I understand and manifest my assent and \
agreement to be bound by this enforceable contract, and agree that all claims under this \
agreement will be resolved exclusively under the laws of the State of New York.";

/// Renders a raw token amount with `decimals` places, without going through floats.
pub fn format_amount(raw: u64, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }

    let digits = format!("{raw:0>width$}", width = decimals as usize + 1);
    let (whole, fraction) = digits.split_at(digits.len() - decimals as usize);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

pub fn render_rows(resolution: &Resolution) -> Vec<String> {
    resolution
        .entries
        .iter()
        .map(|entry| {
            let (symbol, amount) = match resolution.mint_info(&entry.mint) {
                Some(info) => (
                    info.symbol.as_str(),
                    format_amount(entry.raw_amount, info.decimals),
                ),
                None => (UNKNOWN_SYMBOL, entry.raw_amount.to_string()),
            };
            let mark = if resolution.is_claimed(entry) { "✔" } else { "✘" };

            format!("{symbol:<10} {amount:>24}   {mark}")
        })
        .collect()
}

pub fn print_table(resolution: &Resolution) {
    if resolution.entries.is_empty() {
        println!("No reimbursable tokens for this wallet");
        return;
    }

    println!("{:<10} {:>24}   Claimed", "Token", "Amount");
    for row in render_rows(resolution) {
        println!("{row}");
    }

    if let Some(account) = resolution.reimbursement_account.as_ref() {
        println!(
            "Claimed {} of {} token(s), {} claim(s) transferred",
            account.reimbursed_count(),
            resolution.entries.len(),
            account.claim_transferred_count()
        );
    }
}

pub fn print_vault_warning(report: &VaultReport) {
    for shortfall in &report.shortfalls {
        tracing::warn!(
            "Vault for slot {} needs refilling: holds {}, {} required",
            shortfall.token_index,
            shortfall.available,
            shortfall.required
        );
    }
}
