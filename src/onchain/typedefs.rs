use borsh::BorshSerialize;
use solana_sdk::pubkey::Pubkey;

pub struct CreateAtaArgs {
    pub funding_address: Pubkey,
    pub associated_account_address: Pubkey,
    pub wallet_address: Pubkey,
    pub token_mint_address: Pubkey,
    pub token_program_id: Pubkey,
    pub instruction: u8,
}

pub struct CreateReimbursementAccountArgs {
    pub program_id: Pubkey,
    pub group: Pubkey,
    pub reimbursement_account: Pubkey,
    pub owner: Pubkey,
    pub payer: Pubkey,
}

pub struct ReimburseArgs {
    pub program_id: Pubkey,
    pub group: Pubkey,
    pub vault: Pubkey,
    pub token_account: Pubkey,
    pub reimbursement_account: Pubkey,
    pub owner: Pubkey,
    pub claim_mint_token_account: Pubkey,
    pub claim_mint: Pubkey,
    pub table: Pubkey,
    pub index_into_table: u64,
    pub token_index: u64,
    pub transfer_claim: bool,
}

#[derive(Debug, BorshSerialize)]
pub struct ReimburseInput {
    index_into_table: u64,
    token_index: u64,
    transfer_claim: bool,
}

impl ReimburseInput {
    pub fn new(index_into_table: u64, token_index: u64, transfer_claim: bool) -> Self {
        Self {
            index_into_table,
            token_index,
            transfer_claim,
        }
    }
}
