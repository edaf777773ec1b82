use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use crate::onchain::{
    constants::{TOKEN_PROGRAM_ID, WSOL_PUBKEY},
    derive::derive_ata,
    ixs::Instructions,
    reimbursement::ReimbursementClient,
    rpc::ChainReader,
    state::Group,
    typedefs::{CreateAtaArgs, CreateReimbursementAccountArgs, ReimburseArgs},
};

use super::resolver::ClaimEntry;

/// Instructions for one claim, split so the account setup can lead.
#[derive(Debug, Clone, Default)]
pub struct ClaimInstructions {
    pub setup: Option<Instruction>,
    pub claims: Vec<Instruction>,
}

impl ClaimInstructions {
    pub fn reimburse_count(&self, program_id: &Pubkey) -> usize {
        self.claims
            .iter()
            .filter(|ix| Instructions::is_reimburse(ix, program_id))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.setup.is_none() && self.claims.is_empty()
    }

    pub fn into_ordered(self) -> Vec<Instruction> {
        self.setup.into_iter().chain(self.claims).collect()
    }
}

pub struct ClaimRequest<'a> {
    pub wallet: &'a Pubkey,
    pub group: &'a Group,
    pub row_index: usize,
    pub entries: &'a [ClaimEntry],
    pub transfer_claim: bool,
}

fn create_ata_ix(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey, ata: Pubkey) -> Instruction {
    Instructions::create_ata(CreateAtaArgs {
        funding_address: *payer,
        associated_account_address: ata,
        wallet_address: *owner,
        token_mint_address: *mint,
        token_program_id: TOKEN_PROGRAM_ID,
        instruction: 0,
    })
}

/// Builds every instruction still needed to claim `request.entries`. Accounts that
/// already exist are not recreated and claimed slots are skipped, so a rebuild after
/// a partial submission only covers the remaining work.
pub async fn build_claim_instructions(
    rpc: &impl ChainReader,
    client: &ReimbursementClient,
    request: ClaimRequest<'_>,
) -> eyre::Result<ClaimInstructions> {
    let wallet = request.wallet;
    let group = request.group;
    let reimbursement_account = client.reimbursement_account_address(wallet);

    let account_state = client.fetch_reimbursement_account(rpc, wallet).await?;

    let mut ixs = ClaimInstructions::default();

    if account_state.is_none() {
        ixs.setup = Some(Instructions::create_reimbursement_account(
            CreateReimbursementAccountArgs {
                program_id: *client.program_id(),
                group: *client.group_address(),
                reimbursement_account,
                owner: *wallet,
                payer: *wallet,
            },
        ));
    }

    for entry in request.entries {
        let slot = group.slot(entry.token_index).ok_or_else(|| {
            eyre::eyre!("Token slot {} is not configured in the group", entry.token_index)
        })?;

        if slot.mint != entry.mint {
            eyre::bail!(
                "Mint `{}` does not match slot {} of the group (`{}`)",
                entry.mint,
                entry.token_index,
                slot.mint
            );
        }

        if ReimbursementClient::reimbursed(account_state.as_ref(), entry.token_index) {
            tracing::info!("Slot {} already claimed, skipping", entry.token_index);
            continue;
        }

        let (token_account, _) = derive_ata(wallet, &slot.mint, &TOKEN_PROGRAM_ID);
        let (claim_mint_token_account, _) = derive_ata(
            &group.claim_transfer_destination,
            &slot.claim_mint,
            &TOKEN_PROGRAM_ID,
        );

        let (token_account_exists, claim_account_exists) = tokio::join!(
            rpc.account_exists(&token_account),
            rpc.account_exists(&claim_mint_token_account)
        );

        if !token_account_exists? {
            ixs.claims
                .push(create_ata_ix(wallet, wallet, &slot.mint, token_account));
        }

        if request.transfer_claim && !claim_account_exists? {
            ixs.claims.push(create_ata_ix(
                wallet,
                &group.claim_transfer_destination,
                &slot.claim_mint,
                claim_mint_token_account,
            ));
        }

        ixs.claims.push(Instructions::reimburse(ReimburseArgs {
            program_id: *client.program_id(),
            group: *client.group_address(),
            vault: slot.vault,
            token_account,
            reimbursement_account,
            owner: *wallet,
            claim_mint_token_account,
            claim_mint: slot.claim_mint,
            table: group.table,
            index_into_table: request.row_index as u64,
            token_index: entry.token_index as u64,
            transfer_claim: request.transfer_claim,
        })?);

        if slot.mint == WSOL_PUBKEY {
            ixs.claims.push(Instructions::unwrap_sol(&token_account, wallet)?);
        }
    }

    Ok(ixs)
}
