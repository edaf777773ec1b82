use borsh::BorshSerialize;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

use super::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use super::state::instruction_discriminator;
use super::typedefs::{
    CreateAtaArgs, CreateReimbursementAccountArgs, ReimburseArgs, ReimburseInput,
};

pub const CREATE_REIMBURSEMENT_ACCOUNT: &str = "create_reimbursement_account";

pub const REIMBURSE: &str = "reimburse";

pub struct Instructions {}

impl Instructions {
    pub fn create_ata(args: CreateAtaArgs) -> Instruction {
        Instruction {
            program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
            accounts: vec![
                AccountMeta::new(args.funding_address, true),
                AccountMeta::new(args.associated_account_address, false),
                AccountMeta::new_readonly(args.wallet_address, false),
                AccountMeta::new_readonly(args.token_mint_address, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(args.token_program_id, false),
            ],
            data: vec![args.instruction],
        }
    }

    pub fn create_reimbursement_account(args: CreateReimbursementAccountArgs) -> Instruction {
        Instruction {
            program_id: args.program_id,
            accounts: vec![
                AccountMeta::new_readonly(args.group, false),
                AccountMeta::new(args.reimbursement_account, false),
                AccountMeta::new_readonly(args.owner, false),
                AccountMeta::new(args.payer, true),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            ],
            data: instruction_discriminator(CREATE_REIMBURSEMENT_ACCOUNT).to_vec(),
        }
    }

    pub fn reimburse(args: ReimburseArgs) -> eyre::Result<Instruction> {
        let mut data = instruction_discriminator(REIMBURSE).to_vec();
        ReimburseInput::new(args.index_into_table, args.token_index, args.transfer_claim)
            .serialize(&mut data)?;

        Ok(Instruction {
            program_id: args.program_id,
            accounts: vec![
                AccountMeta::new_readonly(args.group, false),
                AccountMeta::new(args.vault, false),
                AccountMeta::new(args.token_account, false),
                AccountMeta::new(args.reimbursement_account, false),
                AccountMeta::new_readonly(args.owner, true),
                AccountMeta::new(args.claim_mint_token_account, false),
                AccountMeta::new(args.claim_mint, false),
                AccountMeta::new_readonly(args.table, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            ],
            data,
        })
    }

    /// Closes a wrapped-SOL token account so its lamports land in the wallet as native SOL.
    pub fn unwrap_sol(wsol_ata: &Pubkey, wallet_pubkey: &Pubkey) -> eyre::Result<Instruction> {
        Ok(spl_token::instruction::close_account(
            &TOKEN_PROGRAM_ID,
            wsol_ata,
            wallet_pubkey,
            wallet_pubkey,
            &[wallet_pubkey],
        )?)
    }

    pub fn is_create_reimbursement_account(ix: &Instruction, program_id: &Pubkey) -> bool {
        ix.program_id == *program_id
            && ix.data.len() == 8
            && ix.data[..] == instruction_discriminator(CREATE_REIMBURSEMENT_ACCOUNT)
    }

    pub fn is_reimburse(ix: &Instruction, program_id: &Pubkey) -> bool {
        ix.program_id == *program_id
            && ix.data.len() >= 8
            && ix.data[..8] == instruction_discriminator(REIMBURSE)
    }
}
