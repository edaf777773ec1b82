use solana_sdk::{
    instruction::Instruction, message::Message, packet::PACKET_DATA_SIZE, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

use crate::onchain::{
    ixs::Instructions,
    tx::{BatchSender, SendFailure},
};

pub const CLAIM_IXS_PER_TX: usize = 4;

/// Splits an ordered instruction list into transactions. Any reimbursement-account
/// creation gets its own leading batch, the rest is chunked in order.
pub fn partition_into_batches(ixs: Vec<Instruction>, program_id: &Pubkey) -> Vec<Vec<Instruction>> {
    let (setup, claims): (Vec<_>, Vec<_>) = ixs
        .into_iter()
        .partition(|ix| Instructions::is_create_reimbursement_account(ix, program_id));

    let mut batches = vec![];

    if !setup.is_empty() {
        batches.push(setup);
    }

    batches.extend(claims.chunks(CLAIM_IXS_PER_TX).map(<[Instruction]>::to_vec));

    batches
}

fn serialized_tx_size(ixs: &[Instruction], payer: &Pubkey) -> eyre::Result<usize> {
    let message = Message::new(ixs, Some(payer));
    let tx = Transaction::new_unsigned(message);
    Ok(bincode::serialized_size(&tx)? as usize)
}

/// Halves any batch whose signed transaction would not fit in a packet.
pub fn fit_to_packet_size(
    batches: Vec<Vec<Instruction>>,
    payer: &Pubkey,
) -> eyre::Result<Vec<Vec<Instruction>>> {
    let mut fitted = vec![];

    for batch in batches {
        if serialized_tx_size(&batch, payer)? <= PACKET_DATA_SIZE {
            fitted.push(batch);
            continue;
        }

        if batch.len() == 1 {
            eyre::bail!("A single instruction does not fit in one transaction");
        }

        let mid = batch.len() / 2;
        let (left, right) = batch.split_at(mid);
        fitted.extend(fit_to_packet_size(
            vec![left.to_vec(), right.to_vec()],
            payer,
        )?);
    }

    Ok(fitted)
}

#[derive(Debug, thiserror::Error)]
#[error("batch {index} failed: {source}")]
pub struct BatchFailure {
    pub index: usize,
    pub source: SendFailure,
}

/// Sends batches strictly one after another; later batches rely on earlier ones
/// having committed. Stops at the first failure.
pub async fn submit_sequentially(
    sender: &impl BatchSender,
    batches: &[Vec<Instruction>],
) -> Result<Vec<Signature>, BatchFailure> {
    let mut signatures = Vec::with_capacity(batches.len());

    for (index, batch) in batches.iter().enumerate() {
        tracing::info!(
            "Sending transaction {}/{} ({} instructions)",
            index + 1,
            batches.len(),
            batch.len()
        );

        let signature = sender
            .send_batch(batch)
            .await
            .map_err(|source| BatchFailure { index, source })?;
        signatures.push(signature);
    }

    Ok(signatures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onchain::{fake::FakeChain, typedefs::CreateReimbursementAccountArgs};

    fn create_account_ix(program_id: Pubkey) -> Instruction {
        Instructions::create_reimbursement_account(CreateReimbursementAccountArgs {
            program_id,
            group: Pubkey::new_unique(),
            reimbursement_account: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            payer: Pubkey::new_unique(),
        })
    }

    fn claim_ix(program_id: Pubkey, tag: u8) -> Instruction {
        Instruction::new_with_bytes(program_id, &[tag; 16], vec![])
    }

    #[test]
    fn setup_gets_its_own_leading_batch() {
        let program_id = Pubkey::new_unique();
        let mut ixs: Vec<_> = (0..6).map(|tag| claim_ix(program_id, tag)).collect();
        // Even when misplaced, creation must not share or follow a claim batch.
        ixs.insert(3, create_account_ix(program_id));

        let batches = partition_into_batches(ixs, &program_id);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 1);
        assert!(Instructions::is_create_reimbursement_account(
            &batches[0][0],
            &program_id
        ));
        assert_eq!(batches[1].len(), CLAIM_IXS_PER_TX);
        assert_eq!(batches[2].len(), 2);
        assert!(batches[1..]
            .iter()
            .flatten()
            .all(|ix| !Instructions::is_create_reimbursement_account(ix, &program_id)));

        let tags: Vec<u8> = batches[1..].iter().flatten().map(|ix| ix.data[0]).collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn no_setup_means_no_leading_batch() {
        let program_id = Pubkey::new_unique();
        let ixs = (0..3).map(|tag| claim_ix(program_id, tag)).collect();

        let batches = partition_into_batches(ixs, &program_id);

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
    }

    #[test]
    fn empty_list_gives_no_batches() {
        assert!(partition_into_batches(vec![], &Pubkey::new_unique()).is_empty());
    }

    #[test]
    fn oversized_batches_are_split() {
        let program_id = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let big = |tag| Instruction::new_with_bytes(program_id, &[tag; 700], vec![]);

        let batches = fit_to_packet_size(vec![vec![big(0), big(1), big(2), big(3)]], &payer).unwrap();

        assert_eq!(batches.len(), 4);
        for batch in &batches {
            assert!(serialized_tx_size(batch, &payer).unwrap() <= PACKET_DATA_SIZE);
        }
    }

    #[tokio::test]
    async fn submission_stops_at_first_failure() {
        let program_id = Pubkey::new_unique();
        let batches = vec![
            vec![claim_ix(program_id, 0)],
            vec![claim_ix(program_id, 1)],
            vec![claim_ix(program_id, 2)],
        ];
        let chain = FakeChain::failing_at(1);

        let failure = submit_sequentially(&chain, &batches).await.unwrap_err();

        assert_eq!(failure.index, 1);
        assert!(failure.source.signature.is_some());
        assert_eq!(chain.sent.borrow().len(), 2);
    }

    #[tokio::test]
    async fn submits_in_order() {
        let program_id = Pubkey::new_unique();
        let batches = vec![vec![claim_ix(program_id, 7)], vec![claim_ix(program_id, 8)]];
        let chain = FakeChain::default();

        let signatures = submit_sequentially(&chain, &batches).await.unwrap();

        assert_eq!(signatures.len(), 2);
        assert_eq!(*chain.sent.borrow(), batches);
    }
}
