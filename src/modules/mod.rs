mod builder;
mod claimer;
mod poller;
mod resolver;
mod sequencer;
mod table;
mod vaults;

use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{signature::Keypair, signer::Signer};

use crate::{
    config::Config,
    onchain::{
        client::init_solana_rpc_client, crypto::get_wallet, reimbursement::ReimbursementClient,
        tx::RpcBatchSender,
    },
    utils::{constants::SECRETS_FILE_PATH, files::read_file_lines, misc::pretty_sleep},
};

use claimer::{submit_claim, ClaimError, ClaimState};
use resolver::{resolve_claims, Resolution};
use table::{print_table, print_vault_warning, AGREEMENT};
use vaults::check_vaults;

const LOGO: &str = r#"
   ___      _           __
  / _ \___ (_)_ _  ___ / /  __ _________ ___ __ _  ___ ___  / /_
 / , _/ -_) /  ' \/ _ \/ _ \/ // / __(_-</ -_)  ' \/ -_) _ \/ __/
/_/|_|\__/_/_/_/_/_.__/_.__/\_,_/_/ /___/\__/_/_/_/\__/_//_/\__/
                       claimer
"#;

struct Session {
    provider: RpcClient,
    client: ReimbursementClient,
    wallet: Option<Keypair>,
    resolution: Option<Resolution>,
    state: ClaimState,
}

impl Session {
    async fn refresh(&mut self, config: &Config) {
        let Some(wallet) = self.wallet.as_ref() else {
            self.state = ClaimState::Disconnected;
            self.resolution = None;
            return;
        };

        match resolve_claims(&self.provider, &self.client, &wallet.pubkey(), config.cluster).await
        {
            Ok(resolution) => {
                if !resolution.group.has_reimbursement_started() {
                    tracing::warn!("Reimbursements have not started for this group yet");
                }

                self.state = ClaimState::connected(&resolution);
                print_table(&resolution);
                self.resolution = Some(resolution);
            }
            Err(e) => {
                tracing::error!("Failed to load reimbursable amounts: {e}");
                self.state = ClaimState::NoEntries;
                self.resolution = None;
            }
        }
    }

    /// Runs one claim attempt. Failures are reported and leave the session ready for a
    /// retry; only a broken terminal prompt is returned as an error.
    async fn claim(&mut self, config: &Config) -> eyre::Result<()> {
        let (Some(wallet), Some(resolution)) = (self.wallet.as_ref(), self.resolution.as_ref())
        else {
            tracing::warn!("Connect a wallet with reimbursable tokens first");
            return Ok(());
        };

        if !self.state.can_submit() {
            tracing::info!("Nothing to claim ({:?})", self.state);
            return Ok(());
        }

        let vaults =
            match check_vaults(&self.provider, &resolution.group, &resolution.unclaimed()).await {
                Ok(vaults) => vaults,
                Err(e) => {
                    tracing::error!("Failed to check the reimbursement vaults: {e}");
                    self.state = std::mem::take(&mut self.state).with_error(e.to_string());
                    return Ok(());
                }
            };

        if !vaults.is_sufficient() {
            print_vault_warning(&vaults);
            return Ok(());
        }

        let agreed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{AGREEMENT}\nI agree"))
            .default(false)
            .interact()?;

        if !agreed {
            return Ok(());
        }

        self.state = match std::mem::take(&mut self.state).begin_submit() {
            Ok(state) => state,
            Err(state) => {
                tracing::error!("Cannot start a claim from {state:?}");
                self.state = state;
                return Ok(());
            }
        };

        let sender = RpcBatchSender::new(&self.provider, wallet);
        let outcome = submit_claim(
            &self.provider,
            &sender,
            &self.client,
            &wallet.pubkey(),
            resolution,
            &vaults,
            config.transfer_claim,
        )
        .await;

        match &outcome {
            Ok(signatures) => {
                tracing::info!("Claim submitted in {} transaction(s)", signatures.len())
            }
            Err(ClaimError::VaultNeedsRefill(report)) => print_vault_warning(report),
            Err(e) => tracing::error!("{e}"),
        }

        self.state = std::mem::take(&mut self.state).finish(&outcome);

        if outcome.is_ok() {
            pretty_sleep(config.refresh_sleep_range).await;
            self.refresh(config).await;
        }

        Ok(())
    }
}

fn select_wallet(secrets: &[String]) -> eyre::Result<Option<Keypair>> {
    let wallets = secrets
        .iter()
        .map(|secret| get_wallet(secret))
        .collect::<eyre::Result<Vec<_>>>()?;

    match wallets.len() {
        0 => Ok(None),
        1 => Ok(wallets.into_iter().next()),
        _ => {
            let items: Vec<String> = wallets.iter().map(|w| w.pubkey().to_string()).collect();

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Wallet:")
                .items(&items)
                .default(0)
                .interact()?;

            Ok(wallets.into_iter().nth(selection))
        }
    }
}

pub async fn menu() -> eyre::Result<()> {
    let config = Config::read_default().await?;
    let secrets = read_file_lines(SECRETS_FILE_PATH).await?;

    println!("{LOGO}");

    let mut session = Session {
        provider: init_solana_rpc_client(&config.solana_rpc_url),
        client: ReimbursementClient::new(config.program_id()?, config.group_num),
        wallet: select_wallet(&secrets)?,
        resolution: None,
        state: ClaimState::Disconnected,
    };

    match session.wallet.as_ref() {
        Some(wallet) => tracing::info!("Wallet address: `{}`", wallet.pubkey()),
        None => tracing::warn!("No wallets found in `{SECRETS_FILE_PATH}`"),
    }

    session.refresh(&config).await;

    loop {
        let options = vec![
            "Show reimbursable amounts",
            "Claim",
            "Switch wallet",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Choice:")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => session.refresh(&config).await,
            1 => session.claim(&config).await?,
            2 => {
                session.state = std::mem::take(&mut session.state).disconnect();
                session.wallet = select_wallet(&secrets)?;
                session.refresh(&config).await;
            }
            3 => {
                return Ok(());
            }
            _ => tracing::error!("Invalid selection"),
        }
    }
}
