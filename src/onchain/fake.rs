use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use solana_sdk::{
    instruction::Instruction, program_option::COption, program_pack::Pack, pubkey::Pubkey,
    signature::Signature,
};

use super::{
    rpc::{ChainReader, TxRecord},
    tx::{BatchSender, SendFailure},
};

/// In-memory chain used by unit tests in place of an RPC node.
#[derive(Default)]
pub struct FakeChain {
    accounts: HashMap<Pubkey, Vec<u8>>,
    token_balances: HashMap<Pubkey, u64>,
    transactions: HashMap<Signature, TxRecord>,
    pub transaction_queries: Cell<usize>,
    pub sent: RefCell<Vec<Vec<Instruction>>>,
    pub fail_batch: Option<usize>,
}

impl FakeChain {
    pub fn failing_at(batch: usize) -> Self {
        Self {
            fail_batch: Some(batch),
            ..Default::default()
        }
    }

    /// Signature reported for the batch configured to fail.
    pub fn failure_signature() -> Signature {
        Signature::from([7u8; 64])
    }

    pub fn set_account(&mut self, pubkey: Pubkey, data: Vec<u8>) {
        self.accounts.insert(pubkey, data);
    }

    pub fn set_mint(&mut self, mint: Pubkey, decimals: u8) {
        let state = spl_token::state::Mint {
            mint_authority: COption::None,
            supply: 0,
            decimals,
            is_initialized: true,
            freeze_authority: COption::None,
        };
        let mut data = vec![0u8; spl_token::state::Mint::LEN];
        spl_token::state::Mint::pack(state, &mut data).unwrap();
        self.accounts.insert(mint, data);
    }

    pub fn set_token_balance(&mut self, token_account: Pubkey, amount: u64) {
        self.token_balances.insert(token_account, amount);
    }

    pub fn set_transaction(&mut self, signature: Signature, record: TxRecord) {
        self.transactions.insert(signature, record);
    }
}

impl ChainReader for FakeChain {
    async fn account_data(&self, pubkey: &Pubkey) -> eyre::Result<Option<Vec<u8>>> {
        Ok(self.accounts.get(pubkey).cloned())
    }

    async fn token_balance(&self, token_account: &Pubkey) -> eyre::Result<u64> {
        self.token_balances
            .get(token_account)
            .copied()
            .ok_or_else(|| eyre::eyre!("could not find token account {token_account}"))
    }

    async fn transaction(&self, signature: &Signature) -> eyre::Result<Option<TxRecord>> {
        self.transaction_queries
            .set(self.transaction_queries.get() + 1);
        Ok(self.transactions.get(signature).cloned())
    }
}

impl BatchSender for FakeChain {
    async fn send_batch(&self, ixs: &[Instruction]) -> Result<Signature, SendFailure> {
        let index = self.sent.borrow().len();
        self.sent.borrow_mut().push(ixs.to_vec());

        if self.fail_batch == Some(index) {
            return Err(SendFailure::new(
                Some(Self::failure_signature()),
                "custom program error: 0x1",
            ));
        }

        Ok(Signature::new_unique())
    }
}
