use solana_sdk::pubkey::Pubkey;

use super::constants::{ASSOCIATED_TOKEN_PROGRAM_ID, GROUP_SEED, REIMBURSEMENT_ACCOUNT_SEED};

pub fn derive_ata(user: &Pubkey, token_mint: &Pubkey, token_program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            &user.to_bytes(),
            &token_program_id.to_bytes(),
            &token_mint.to_bytes(),
        ],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
}

pub fn derive_group(group_num: u32, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GROUP_SEED, &group_num.to_le_bytes()], program_id)
}

pub fn derive_reimbursement_account(
    group: &Pubkey,
    owner: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[REIMBURSEMENT_ACCOUNT_SEED, &group.to_bytes(), &owner.to_bytes()],
        program_id,
    )
}
