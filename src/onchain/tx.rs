use crate::utils::constants::SOLANA_EXPLORER_URL;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_client::SerializableTransaction,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    instruction::Instruction,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use solana_transaction_status::UiTransactionEncoding;

/// A transaction that was not confirmed. `signature` is set whenever the
/// transaction was signed, so its on-chain record can still be looked up.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct SendFailure {
    pub signature: Option<Signature>,
    pub reason: String,
}

impl SendFailure {
    pub fn new(signature: Option<Signature>, reason: impl Into<String>) -> Self {
        Self {
            signature,
            reason: reason.into(),
        }
    }
}

/// Signs, sends and confirms one batch of instructions as a single transaction.
#[allow(async_fn_in_trait)]
pub trait BatchSender {
    async fn send_batch(&self, ixs: &[Instruction]) -> Result<Signature, SendFailure>;
}

pub struct RpcBatchSender<'a> {
    provider: &'a RpcClient,
    signer: &'a Keypair,
}

impl<'a> RpcBatchSender<'a> {
    pub fn new(provider: &'a RpcClient, signer: &'a Keypair) -> Self {
        Self { provider, signer }
    }
}

impl BatchSender for RpcBatchSender<'_> {
    async fn send_batch(&self, ixs: &[Instruction]) -> Result<Signature, SendFailure> {
        let (recent_blockhash, _) = self
            .provider
            .get_latest_blockhash_with_commitment(CommitmentConfig::finalized())
            .await
            .map_err(|e| SendFailure::new(None, format!("Failed to fetch blockhash: {e}")))?;

        let tx = Transaction::new_signed_with_payer(
            ixs,
            Some(&self.signer.pubkey()),
            &[self.signer],
            recent_blockhash,
        );

        send_and_confirm_tx(self.provider, tx).await
    }
}

pub async fn send_and_confirm_tx(
    provider: &RpcClient,
    tx: impl SerializableTransaction,
) -> Result<Signature, SendFailure> {
    // Preflight is skipped so program failures land on-chain and can be inspected afterwards.
    let tx_config = RpcSendTransactionConfig {
        skip_preflight: true,
        preflight_commitment: Some(CommitmentLevel::Confirmed),
        encoding: Some(UiTransactionEncoding::Base64),
        max_retries: None,
        min_context_slot: None,
    };

    let local_signature = *tx.get_signature();

    match provider.send_transaction_with_config(&tx, tx_config).await {
        Ok(tx_signature) => {
            tracing::info!("Sent transaction: {}{}", SOLANA_EXPLORER_URL, tx_signature);

            match provider
                .confirm_transaction_with_spinner(
                    &tx_signature,
                    tx.get_recent_blockhash(),
                    CommitmentConfig::confirmed(),
                )
                .await
            {
                Ok(_) => {
                    tracing::info!("Transaction confirmed");
                    Ok(tx_signature)
                }
                Err(e) => Err(SendFailure::new(
                    Some(tx_signature),
                    format!("Transaction failed: {e}"),
                )),
            }
        }
        Err(e) => Err(SendFailure::new(
            Some(local_signature),
            format!("Failed to send tx: {e}"),
        )),
    }
}
