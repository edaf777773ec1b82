use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::{path::Path, str::FromStr};

const CONFIG_FILE_PATH: &str = "data/config.toml";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Mainnet,
    Devnet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub solana_rpc_url: String,
    pub cluster: Cluster,
    pub reimbursement_program_id: String,
    pub group_num: u32,
    #[serde(default)]
    pub transfer_claim: bool,
    pub refresh_sleep_range: [u64; 2],
}

impl Config {
    async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let cfg_str = tokio::fs::read_to_string(path).await?;
        Self::parse(&cfg_str)
    }

    fn parse(cfg_str: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(cfg_str)?;
        config.program_id()?;
        Ok(config)
    }

    pub async fn read_default() -> eyre::Result<Self> {
        Self::read_from_file(CONFIG_FILE_PATH)
            .await
            .map_err(|e| eyre::eyre!("Failed to read `{CONFIG_FILE_PATH}`: {e}"))
    }

    pub fn program_id(&self) -> eyre::Result<Pubkey> {
        Pubkey::from_str(&self.reimbursement_program_id).map_err(|e| {
            eyre::eyre!(
                "Invalid REIMBURSEMENT_PROGRAM_ID `{}`: {e}",
                self.reimbursement_program_id
            )
        })
    }
}
