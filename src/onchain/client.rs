use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;

const RPC_TIMEOUT: Duration = Duration::from_secs(60);

pub fn init_solana_rpc_client(rpc_url: &str) -> RpcClient {
    RpcClient::new_with_timeout_and_commitment(
        rpc_url.to_string(),
        RPC_TIMEOUT,
        CommitmentConfig::confirmed(),
    )
}
