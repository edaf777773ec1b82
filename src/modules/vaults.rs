use solana_sdk::pubkey::Pubkey;

use crate::onchain::{rpc::ChainReader, state::Group};

use super::resolver::ClaimEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub token_index: usize,
    pub vault: Pubkey,
    pub available: u64,
    pub required: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultReport {
    pub shortfalls: Vec<Shortfall>,
}

impl VaultReport {
    pub fn is_sufficient(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

/// Compares every entry's vault balance against its claim amount.
pub async fn check_vaults(
    rpc: &impl ChainReader,
    group: &Group,
    entries: &[ClaimEntry],
) -> eyre::Result<VaultReport> {
    let mut report = VaultReport::default();

    for entry in entries {
        let slot = group
            .slot(entry.token_index)
            .ok_or_else(|| eyre::eyre!("Token slot {} is not configured", entry.token_index))?;

        let available = rpc.token_balance(&slot.vault).await?;

        if available < entry.raw_amount {
            tracing::warn!(
                "Vault `{}` for slot {} holds {} but {} is claimable",
                slot.vault,
                entry.token_index,
                available,
                entry.raw_amount
            );

            report.shortfalls.push(Shortfall {
                token_index: entry.token_index,
                vault: slot.vault,
                available,
                required: entry.raw_amount,
            });
        }
    }

    Ok(report)
}
