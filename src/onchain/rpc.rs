use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcTransactionConfig};
use solana_sdk::{
    commitment_config::CommitmentConfig, program_pack::Pack, pubkey::Pubkey,
    signature::Signature, transaction::TransactionError,
};
use solana_transaction_status::UiTransactionEncoding;

/// On-chain record of a landed transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxRecord {
    pub err: Option<TransactionError>,
    pub log_messages: Vec<String>,
}

/// The RPC reads the claim flow depends on.
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    /// Raw account data, `None` when the account does not exist.
    async fn account_data(&self, pubkey: &Pubkey) -> eyre::Result<Option<Vec<u8>>>;

    /// Raw token amount held by an SPL token account.
    async fn token_balance(&self, token_account: &Pubkey) -> eyre::Result<u64>;

    /// Transaction record, `None` while the transaction is not visible yet.
    async fn transaction(&self, signature: &Signature) -> eyre::Result<Option<TxRecord>>;

    async fn account_exists(&self, pubkey: &Pubkey) -> eyre::Result<bool> {
        Ok(self.account_data(pubkey).await?.is_some())
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> eyre::Result<Option<u8>> {
        match self.account_data(mint).await? {
            Some(data) => Ok(Some(spl_token::state::Mint::unpack(&data)?.decimals)),
            None => Ok(None),
        }
    }
}

impl ChainReader for RpcClient {
    async fn account_data(&self, pubkey: &Pubkey) -> eyre::Result<Option<Vec<u8>>> {
        let response = self
            .get_account_with_commitment(pubkey, self.commitment())
            .await?;

        Ok(response.value.map(|account| account.data))
    }

    async fn token_balance(&self, token_account: &Pubkey) -> eyre::Result<u64> {
        let balance = self.get_token_account_balance(token_account).await?;
        Ok(balance.amount.parse::<u64>()?)
    }

    async fn transaction(&self, signature: &Signature) -> eyre::Result<Option<TxRecord>> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };

        match self.get_transaction_with_config(signature, config).await {
            Ok(tx) => {
                let record = tx
                    .transaction
                    .meta
                    .map(|meta| TxRecord {
                        err: meta.err,
                        log_messages: Option::<Vec<String>>::from(meta.log_messages)
                            .unwrap_or_default(),
                    })
                    .unwrap_or_default();

                Ok(Some(record))
            }
            Err(e) => {
                tracing::debug!("Transaction {signature} not available yet: {e}");
                Ok(None)
            }
        }
    }
}
