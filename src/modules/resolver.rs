use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::{
    config::Cluster,
    onchain::{
        reimbursement::ReimbursementClient,
        rpc::ChainReader,
        state::{Group, ReimbursementAccount, TableLookup},
    },
    tokens::{lookup, UNKNOWN_SYMBOL},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimEntry {
    pub mint: Pubkey,
    pub raw_amount: u64,
    pub token_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
    pub symbol: String,
}

/// Everything known about a wallet's claim after reading program state.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub group: Group,
    pub row_index: Option<usize>,
    pub entries: Vec<ClaimEntry>,
    pub mints: HashMap<Pubkey, MintInfo>,
    pub reimbursement_account: Option<ReimbursementAccount>,
}

impl Resolution {
    pub fn is_claimed(&self, entry: &ClaimEntry) -> bool {
        ReimbursementClient::reimbursed(self.reimbursement_account.as_ref(), entry.token_index)
    }

    pub fn unclaimed(&self) -> Vec<ClaimEntry> {
        self.entries
            .iter()
            .filter(|entry| !self.is_claimed(entry))
            .copied()
            .collect()
    }

    pub fn mint_info(&self, mint: &Pubkey) -> Option<&MintInfo> {
        self.mints.get(mint)
    }
}

/// One entry per non-zero slot in `balances`. Balances in slots the group does not
/// configure cannot be claimed and are skipped.
pub fn entries_from_row(group: &Group, balances: &[u64]) -> Vec<ClaimEntry> {
    balances
        .iter()
        .enumerate()
        .filter(|(_, amount)| **amount != 0)
        .filter_map(|(token_index, amount)| match group.slot(token_index) {
            Some(slot) => Some(ClaimEntry {
                mint: slot.mint,
                raw_amount: *amount,
                token_index,
            }),
            None => {
                tracing::warn!("Skipping {amount} in unconfigured token slot {token_index}");
                None
            }
        })
        .collect()
}

pub async fn resolve_claims(
    rpc: &impl ChainReader,
    client: &ReimbursementClient,
    wallet: &Pubkey,
    cluster: Cluster,
) -> eyre::Result<Resolution> {
    let group = client.fetch_group(rpc).await?;

    let (row_index, entries) = match client.find_table_row(rpc, &group, wallet).await? {
        Ok(TableLookup::Found { row_index, row }) => {
            (Some(row_index), entries_from_row(&group, &row.balances))
        }
        Ok(TableLookup::NotFound) => {
            tracing::info!("Wallet `{wallet}` has no row in the claim table");
            (None, vec![])
        }
        Err(e) => {
            tracing::warn!("Claim table for group #{} is unreadable: {e}", client.group_num());
            (None, vec![])
        }
    };

    let mut mints = HashMap::new();
    for entry in &entries {
        if !mints.contains_key(&entry.mint) {
            let info = resolve_mint_info(rpc, &entry.mint, cluster).await;
            mints.insert(entry.mint, info);
        }
    }

    let reimbursement_account = if entries.is_empty() {
        None
    } else {
        match client.fetch_reimbursement_account(rpc, wallet).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!("Claimed status for `{wallet}` is unreadable: {e}");
                None
            }
        }
    };

    Ok(Resolution {
        group,
        row_index,
        entries,
        mints,
        reimbursement_account,
    })
}

async fn resolve_mint_info(rpc: &impl ChainReader, mint: &Pubkey, cluster: Cluster) -> MintInfo {
    let known = lookup(cluster, mint);

    let decimals = match rpc.mint_decimals(mint).await {
        Ok(Some(decimals)) => decimals,
        Ok(None) => known.map(|token| token.decimals).unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read mint `{mint}`: {e}");
            known.map(|token| token.decimals).unwrap_or_default()
        }
    };

    MintInfo {
        decimals,
        symbol: known
            .map(|token| token.symbol.to_string())
            .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string()),
    }
}
