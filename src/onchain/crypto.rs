use bip39::Mnemonic;
use ring::hmac::{self, Key};
use solana_sdk::signature::{keypair_from_seed, Keypair};

use super::constants::{CURVE, PATH};

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Loads a signer from either a BIP-39 mnemonic or a base58-encoded 64-byte secret key.
pub fn get_wallet(secret: &str) -> eyre::Result<Keypair> {
    let secret = secret.trim();

    if let Ok(mnemonic) = Mnemonic::parse(secret) {
        return mnemonic_to_keypair(&mnemonic);
    }

    let decoded_key = solana_sdk::bs58::decode(secret)
        .into_vec()
        .map_err(|_| eyre::eyre!("Secret is neither a mnemonic nor a base58 private key"))?;

    Ok(Keypair::from_bytes(&decoded_key)?)
}

struct Keys {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl Keys {
    fn from_hmac(key: &[u8], data: &[u8]) -> Self {
        let tag = hmac::sign(&Key::new(hmac::HMAC_SHA512, key), data);
        let (il, ir) = tag.as_ref().split_at(32);

        let mut keys = Keys {
            key: [0; 32],
            chain_code: [0; 32],
        };
        keys.key.copy_from_slice(il);
        keys.chain_code.copy_from_slice(ir);
        keys
    }

    fn master(seed: &[u8]) -> Self {
        Self::from_hmac(CURVE.as_bytes(), seed)
    }

    fn child(&self, index: u32) -> Self {
        let mut data = Vec::with_capacity(37);
        data.push(0u8);
        data.extend_from_slice(&self.key);
        data.extend_from_slice(&index.to_be_bytes());

        Self::from_hmac(&self.chain_code, &data)
    }
}

fn parse_segments(path: &str) -> eyre::Result<Vec<u32>> {
    path.split('/')
        .skip(1)
        .map(|segment| {
            segment
                .trim_end_matches('\'')
                .parse::<u32>()
                .map_err(|e| eyre::eyre!("Invalid derivation path segment `{segment}`: {e}"))
        })
        .collect()
}

/// SLIP-10 ed25519 derivation, every segment hardened.
fn derive_key(seed: &[u8], path: &str) -> eyre::Result<[u8; 32]> {
    let keys = parse_segments(path)?
        .into_iter()
        .fold(Keys::master(seed), |parent, segment| {
            parent.child(segment + HARDENED_OFFSET)
        });

    Ok(keys.key)
}

fn mnemonic_to_keypair(mnemonic: &Mnemonic) -> eyre::Result<Keypair> {
    let seed = mnemonic.to_seed("");
    let key = derive_key(&seed, PATH)?;

    keypair_from_seed(&key).map_err(|e| eyre::eyre!("Invalid derived key: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn mnemonic_and_base58_give_same_wallet() {
        let from_mnemonic = get_wallet(MNEMONIC).unwrap();
        let base58 = from_mnemonic.to_base58_string();

        let from_secret = get_wallet(&base58).unwrap();
        assert_eq!(from_mnemonic.pubkey(), from_secret.pubkey());
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = get_wallet(MNEMONIC).unwrap();
        let b = get_wallet(&format!("  {MNEMONIC}\n")).unwrap();
        assert_eq!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn rejects_garbage() {
        assert!(get_wallet("definitely not a key").is_err());
    }

    #[test]
    fn parses_hardened_path() {
        assert_eq!(parse_segments(PATH).unwrap(), vec![44, 501, 0, 0]);
    }
}
