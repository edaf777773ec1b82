use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::onchain::{reimbursement::ReimbursementClient, rpc::ChainReader, tx::BatchSender};

use super::{
    builder::{build_claim_instructions, ClaimRequest},
    poller::{diagnose_failure, FailureCause},
    resolver::Resolution,
    sequencer::{fit_to_packet_size, partition_into_batches, submit_sequentially},
    vaults::VaultReport,
};

#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error("The reimbursement vault needs refilling before this claim can go through")]
    VaultNeedsRefill(VaultReport),
    #[error("The reimbursement vault ran out of funds during the claim, it needs refilling")]
    InsufficientFundsOnChain,
    #[error("Failed to prepare the claim: {0}")]
    Build(String),
    #[error("Something went wrong: {0}")]
    Submission(String),
}

impl From<eyre::Report> for ClaimError {
    fn from(e: eyre::Report) -> Self {
        Self::Build(e.to_string())
    }
}

/// Where a wallet session stands. Every transition into a connected state is
/// derived from a fresh [`Resolution`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClaimState {
    #[default]
    Disconnected,
    NoEntries,
    Unclaimed { error: Option<String> },
    Submitting,
    Claimed,
}

impl ClaimState {
    pub fn connected(resolution: &Resolution) -> Self {
        if resolution.entries.is_empty() {
            Self::NoEntries
        } else if resolution.unclaimed().is_empty() {
            Self::Claimed
        } else {
            Self::Unclaimed { error: None }
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Unclaimed { .. })
    }

    /// Hands the state back unchanged when there is nothing to submit from it.
    pub fn begin_submit(self) -> Result<Self, Self> {
        match self {
            Self::Unclaimed { .. } => Ok(Self::Submitting),
            other => Err(other),
        }
    }

    pub fn finish<T>(self, outcome: &Result<T, ClaimError>) -> Self {
        match (self, outcome) {
            (Self::Submitting, Ok(_)) => Self::Claimed,
            (Self::Submitting, Err(e)) => Self::Unclaimed {
                error: Some(e.to_string()),
            },
            (other, _) => other,
        }
    }

    /// Records a failure that happened before anything was submitted.
    pub fn with_error(self, error: impl Into<String>) -> Self {
        match self {
            Self::Unclaimed { .. } => Self::Unclaimed {
                error: Some(error.into()),
            },
            other => other,
        }
    }

    pub fn disconnect(self) -> Self {
        Self::Disconnected
    }
}

/// Claims every unclaimed entry of `resolution`: instruction build, batching and
/// sequential submission, refused up front when `vaults` reports a shortfall. A
/// failed transaction is looked up once to tell an empty vault apart from other
/// failures.
pub async fn submit_claim(
    rpc: &impl ChainReader,
    sender: &impl BatchSender,
    client: &ReimbursementClient,
    wallet: &Pubkey,
    resolution: &Resolution,
    vaults: &VaultReport,
    transfer_claim: bool,
) -> Result<Vec<Signature>, ClaimError> {
    let unclaimed = resolution.unclaimed();

    if unclaimed.is_empty() {
        tracing::info!("Nothing left to claim");
        return Ok(vec![]);
    }

    let row_index = resolution
        .row_index
        .ok_or_else(|| ClaimError::Build("wallet has no row in the claim table".to_string()))?;

    if !vaults.is_sufficient() {
        return Err(ClaimError::VaultNeedsRefill(vaults.clone()));
    }

    let ixs = build_claim_instructions(
        rpc,
        client,
        ClaimRequest {
            wallet,
            group: &resolution.group,
            row_index,
            entries: &unclaimed,
            transfer_claim,
        },
    )
    .await?;

    let batches = fit_to_packet_size(
        partition_into_batches(ixs.into_ordered(), client.program_id()),
        wallet,
    )?;

    match submit_sequentially(sender, &batches).await {
        Ok(signatures) => Ok(signatures),
        Err(failure) => {
            tracing::error!("Claim transaction failed: {failure}");

            let cause = match failure.source.signature {
                Some(signature) => {
                    diagnose_failure(
                        rpc,
                        &signature,
                        &batches[failure.index],
                        client.program_id(),
                    )
                    .await
                }
                None => None,
            };

            match cause {
                Some(FailureCause::InsufficientFunds) => Err(ClaimError::InsufficientFundsOnChain),
                _ => Err(ClaimError::Submission(failure.source.reason)),
            }
        }
    }
}
