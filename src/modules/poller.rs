use std::time::Duration;

use solana_sdk::{
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::Signature,
    transaction::TransactionError,
};
use spl_token::error::TokenError;

use crate::onchain::{
    ixs::Instructions,
    rpc::{ChainReader, TxRecord},
};

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub const POLL_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    InsufficientFunds,
    Other,
}

/// Waits for `signature` to become visible, checking every [`POLL_INTERVAL`] for at
/// most [`POLL_ATTEMPTS`] times. Dropping the future stops the polling.
pub async fn poll_transaction(rpc: &impl ChainReader, signature: &Signature) -> Option<TxRecord> {
    for attempt in 1..=POLL_ATTEMPTS {
        tokio::time::sleep(POLL_INTERVAL).await;

        match rpc.transaction(signature).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => {}
            Err(e) => tracing::debug!("Lookup {attempt} for {signature} failed: {e}"),
        }
    }

    tracing::warn!("Transaction {signature} not found after {POLL_ATTEMPTS} attempts");
    None
}

/// Log lines emitted while top-level instruction `index` of the transaction ran.
fn invocation_logs(log_messages: &[String], index: usize) -> Vec<&str> {
    let mut top_level = 0;
    let mut inside = false;
    let mut lines = vec![];

    for line in log_messages {
        if line.starts_with("Program ") && line.ends_with(" invoke [1]") {
            inside = top_level == index;
            top_level += 1;
        }

        if inside {
            lines.push(line.as_str());
        }
    }

    lines
}

/// Only a failure inside a reimburse instruction can mean the vault ran dry. The
/// same error code from account setup is a payer problem and stays generic.
pub fn classify(record: &TxRecord, batch: &[Instruction], program_id: &Pubkey) -> FailureCause {
    let Some(TransactionError::InstructionError(index, error)) = &record.err else {
        return FailureCause::Other;
    };
    let index = *index as usize;

    let failed_in_reimburse = batch
        .get(index)
        .is_some_and(|ix| Instructions::is_reimburse(ix, program_id));

    if !failed_in_reimburse {
        return FailureCause::Other;
    }

    let insufficient_code = TokenError::InsufficientFunds as u32;
    let custom_error = matches!(error, InstructionError::Custom(code) if *code == insufficient_code);

    let logged = invocation_logs(&record.log_messages, index)
        .iter()
        .any(|line| line.to_lowercase().contains("insufficient funds"));

    if custom_error || logged {
        FailureCause::InsufficientFunds
    } else {
        FailureCause::Other
    }
}

/// Polls for the failed transaction carrying `batch` and classifies it; `None` when
/// it never showed up.
pub async fn diagnose_failure(
    rpc: &impl ChainReader,
    signature: &Signature,
    batch: &[Instruction],
    program_id: &Pubkey,
) -> Option<FailureCause> {
    poll_transaction(rpc, signature)
        .await
        .map(|record| classify(&record, batch, program_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onchain::{
        constants::TOKEN_PROGRAM_ID,
        fake::FakeChain,
        typedefs::{CreateAtaArgs, ReimburseArgs},
    };
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_ten_attempts() {
        let chain = FakeChain::default();
        let started = Instant::now();

        let record = poll_transaction(&chain, &Signature::new_unique()).await;

        assert!(record.is_none());
        assert_eq!(chain.transaction_queries.get(), POLL_ATTEMPTS);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_secs(5) + POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_as_soon_as_found() {
        let signature = Signature::new_unique();
        let mut chain = FakeChain::default();
        chain.set_transaction(signature, TxRecord::default());
        let started = Instant::now();

        let record = poll_transaction(&chain, &signature).await;

        assert_eq!(record, Some(TxRecord::default()));
        assert_eq!(chain.transaction_queries.get(), 1);
        assert!(started.elapsed() < POLL_INTERVAL * 2);
    }

    fn reimburse_ix(program_id: Pubkey) -> Instruction {
        Instructions::reimburse(ReimburseArgs {
            program_id,
            group: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            token_account: Pubkey::new_unique(),
            reimbursement_account: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            claim_mint_token_account: Pubkey::new_unique(),
            claim_mint: Pubkey::new_unique(),
            table: Pubkey::new_unique(),
            index_into_table: 0,
            token_index: 0,
            transfer_claim: false,
        })
        .unwrap()
    }

    fn create_ata_ix() -> Instruction {
        Instructions::create_ata(CreateAtaArgs {
            funding_address: Pubkey::new_unique(),
            associated_account_address: Pubkey::new_unique(),
            wallet_address: Pubkey::new_unique(),
            token_mint_address: Pubkey::new_unique(),
            token_program_id: TOKEN_PROGRAM_ID,
            instruction: 0,
        })
    }

    fn failed_at(index: u8, code: u32, log_messages: &[&str]) -> TxRecord {
        TxRecord {
            err: Some(TransactionError::InstructionError(
                index,
                InstructionError::Custom(code),
            )),
            log_messages: log_messages.iter().map(|line| line.to_string()).collect(),
        }
    }

    #[test]
    fn token_insufficient_funds_in_reimburse_is_recognized() {
        let program_id = Pubkey::new_unique();
        let batch = vec![create_ata_ix(), reimburse_ix(program_id)];

        assert_eq!(
            classify(&failed_at(1, 1, &[]), &batch, &program_id),
            FailureCause::InsufficientFunds
        );

        let logs = [
            "Program ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL invoke [1]",
            "Program ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL success",
            "Program m3roABq4Ta3sGyFRLdY4LH1KN16zBtg586gJ3UxoBzb invoke [1]",
            "Program TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA invoke [2]",
            "Program log: Error: insufficient funds",
        ];
        assert_eq!(
            classify(&failed_at(1, 6000, &logs), &batch, &program_id),
            FailureCause::InsufficientFunds
        );
    }

    #[test]
    fn rent_shortfall_in_account_setup_stays_generic() {
        let program_id = Pubkey::new_unique();
        let batch = vec![create_ata_ix(), reimburse_ix(program_id)];
        let logs = [
            "Program ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL invoke [1]",
            "Program 11111111111111111111111111111111 invoke [2]",
            "Transfer: insufficient lamports 1000, need 2039280",
            "Program log: Error: insufficient funds",
        ];

        assert_eq!(
            classify(&failed_at(0, 1, &logs), &batch, &program_id),
            FailureCause::Other
        );
    }

    #[test]
    fn insufficient_funds_logged_by_another_instruction_is_ignored() {
        let program_id = Pubkey::new_unique();
        let batch = vec![create_ata_ix(), reimburse_ix(program_id)];
        let logs = [
            "Program ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL invoke [1]",
            "Program log: Error: insufficient funds",
            "Program ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL success",
            "Program m3roABq4Ta3sGyFRLdY4LH1KN16zBtg586gJ3UxoBzb invoke [1]",
            "Program log: AnchorError",
        ];

        assert_eq!(
            classify(&failed_at(1, 6000, &logs), &batch, &program_id),
            FailureCause::Other
        );
    }

    #[test]
    fn other_failures_stay_generic() {
        let program_id = Pubkey::new_unique();
        let batch = vec![reimburse_ix(program_id)];

        assert_eq!(
            classify(&failed_at(0, 6000, &["Program log: AnchorError"]), &batch, &program_id),
            FailureCause::Other
        );
        assert_eq!(
            classify(&failed_at(5, 1, &[]), &batch, &program_id),
            FailureCause::Other
        );
        assert_eq!(
            classify(&TxRecord::default(), &batch, &program_id),
            FailureCause::Other
        );
    }

    #[tokio::test(start_paused = true)]
    async fn diagnosis_of_missing_transaction_is_unknown() {
        let chain = FakeChain::default();
        assert_eq!(
            diagnose_failure(&chain, &Signature::new_unique(), &[], &Pubkey::new_unique()).await,
            None
        );
    }
}
