use solana_program::pubkey;
use solana_sdk::pubkey::Pubkey;

pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

pub const RENT_SYSVAR_ID: Pubkey = pubkey!("SysvarRent111111111111111111111111111111111");

pub const WSOL_PUBKEY: Pubkey = pubkey!("So11111111111111111111111111111111111111112");

pub const GROUP_SEED: &[u8] = b"Group";

pub const REIMBURSEMENT_ACCOUNT_SEED: &[u8] = b"ReimbursementAccount";

/// Number of token slots in a group's parallel mint/claim-mint/vault arrays.
pub const MAX_TOKENS: usize = 16;

pub const TABLE_HEADER_LEN: usize = 40;

pub const TABLE_ROW_LEN: usize = 32 + 8 * MAX_TOKENS;

pub const PATH: &str = "m/44'/501'/0'/0'";

pub const CURVE: &str = "ed25519 seed";
