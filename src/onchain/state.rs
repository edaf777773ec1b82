use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{hash::hash, pubkey::Pubkey};

use super::constants::{MAX_TOKENS, TABLE_HEADER_LEN, TABLE_ROW_LEN};

/// First 8 bytes of `sha256("account:<name>")`, prefixed to every program account.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(format!("account:{name}").as_bytes()).to_bytes()[..8]);
    discriminator
}

/// First 8 bytes of `sha256("global:<name>")`, prefixed to instruction data.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(format!("global:{name}").as_bytes()).to_bytes()[..8]);
    discriminator
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("account data too short: {len} bytes, expected at least {expected}")]
    TooShort { len: usize, expected: usize },
    #[error("account discriminator mismatch for {0}")]
    Discriminator(&'static str),
    #[error("malformed {name}: {source}")]
    Malformed {
        name: &'static str,
        source: std::io::Error,
    },
}

fn decode_program_account<T: BorshDeserialize>(
    name: &'static str,
    data: &[u8],
) -> Result<T, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::TooShort {
            len: data.len(),
            expected: 8,
        });
    }

    if data[..8] != account_discriminator(name) {
        return Err(DecodeError::Discriminator(name));
    }

    // Zero-copy accounts may carry trailing padding, so the body is not required to be consumed.
    T::deserialize(&mut &data[8..]).map_err(|source| DecodeError::Malformed { name, source })
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Group {
    pub group_num: u32,
    pub table: Pubkey,
    pub claim_transfer_destination: Pubkey,
    pub authority: Pubkey,
    pub vaults: [Pubkey; MAX_TOKENS],
    pub claim_mints: [Pubkey; MAX_TOKENS],
    pub mints: [Pubkey; MAX_TOKENS],
    pub reimbursement_started: u8,
    pub bump: u8,
    pub testing: u8,
    pub padding: [u8; 1],
}

impl Group {
    pub const NAME: &'static str = "Group";

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        decode_program_account(Self::NAME, data)
    }

    /// Slot `token_index` as `(mint, claim_mint, vault)`, or `None` when the slot is unused.
    pub fn slot(&self, token_index: usize) -> Option<TokenSlot> {
        if token_index >= MAX_TOKENS || self.mints[token_index] == Pubkey::default() {
            return None;
        }

        Some(TokenSlot {
            mint: self.mints[token_index],
            claim_mint: self.claim_mints[token_index],
            vault: self.vaults[token_index],
        })
    }

    pub fn has_reimbursement_started(&self) -> bool {
        self.reimbursement_started == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSlot {
    pub mint: Pubkey,
    pub claim_mint: Pubkey,
    pub vault: Pubkey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ReimbursementAccount {
    pub reimbursed: u16,
    pub claim_transferred: u16,
    pub padding: [u8; 4],
}

impl ReimbursementAccount {
    pub const NAME: &'static str = "ReimbursementAccount";

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        decode_program_account(Self::NAME, data)
    }

    pub fn is_reimbursed(&self, token_index: usize) -> bool {
        token_index < MAX_TOKENS && self.reimbursed & (1 << token_index) != 0
    }

    pub fn reimbursed_count(&self) -> u32 {
        self.reimbursed.count_ones()
    }

    pub fn claim_transferred_count(&self) -> u32 {
        self.claim_transferred.count_ones()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TableRow {
    pub owner: Pubkey,
    pub balances: [u64; MAX_TOKENS],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLookup {
    Found { row_index: usize, row: TableRow },
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum TableDecodeError {
    #[error("claim table is {0} bytes, shorter than its header")]
    MissingHeader(usize),
    #[error("claim table body of {0} bytes is not a whole number of rows")]
    PartialRow(usize),
    #[error("malformed claim table row {row_index}: {source}")]
    Row {
        row_index: usize,
        source: std::io::Error,
    },
}

/// Finds the row owned by `owner` in raw claim-table account data.
pub fn find_table_row(data: &[u8], owner: &Pubkey) -> Result<TableLookup, TableDecodeError> {
    if data.len() < TABLE_HEADER_LEN {
        return Err(TableDecodeError::MissingHeader(data.len()));
    }

    let body = &data[TABLE_HEADER_LEN..];
    if body.len() % TABLE_ROW_LEN != 0 {
        return Err(TableDecodeError::PartialRow(body.len()));
    }

    for (row_index, chunk) in body.chunks_exact(TABLE_ROW_LEN).enumerate() {
        let row = TableRow::deserialize(&mut &chunk[..])
            .map_err(|source| TableDecodeError::Row { row_index, source })?;

        if row.owner == *owner {
            return Ok(TableLookup::Found { row_index, row });
        }
    }

    Ok(TableLookup::NotFound)
}
