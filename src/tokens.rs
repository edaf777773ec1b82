use solana_program::pubkey;
use solana_sdk::pubkey::Pubkey;

use crate::config::Cluster;

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

pub struct TokenConfig {
    pub symbol: &'static str,
    pub mint: Pubkey,
    pub decimals: u8,
}

const fn token(symbol: &'static str, mint: Pubkey, decimals: u8) -> TokenConfig {
    TokenConfig {
        symbol,
        mint,
        decimals,
    }
}

pub const DEVNET_TOKENS: &[TokenConfig] = &[token(
    "SOL",
    pubkey!("So11111111111111111111111111111111111111112"),
    9,
)];

pub const MAINNET_TOKENS: &[TokenConfig] = &[
    token("RLB", pubkey!("RLBxxFkseAZ4RgJH3Sqn8jXxhmGoz9jWxDNJMh8pL7a"), 2),
    token("RAY", pubkey!("4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R"), 6),
    token("ORCA", pubkey!("orcaEKTdK7LKz57vaAYr9QeNsVEPfiu6QeMU1kektZE"), 6),
    token("mSOL", pubkey!("mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So"), 9),
    token("SOL", pubkey!("So11111111111111111111111111111111111111112"), 9),
    token("BONK", pubkey!("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"), 5),
    token("UXD", pubkey!("7kbnvuGBxxj8AG9qp8Scn56muWGaRaFqxg1FsRp3PaFT"), 6),
    token("jitoSOL", pubkey!("J1toso1uCk3RLmjorhTtrVwY9HJ7X8V9yYac6Y7kGCPn"), 9),
    token("USDC", pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"), 6),
    token("USDT", pubkey!("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB"), 6),
    token("ETH", pubkey!("7vfCXTUXx5WJV5JADk17DUJ4ksgau7utNKj4b963voxs"), 8),
];

pub fn registry(cluster: Cluster) -> &'static [TokenConfig] {
    match cluster {
        Cluster::Mainnet => MAINNET_TOKENS,
        Cluster::Devnet => DEVNET_TOKENS,
    }
}

pub fn lookup(cluster: Cluster, mint: &Pubkey) -> Option<&'static TokenConfig> {
    registry(cluster).iter().find(|token| token.mint == *mint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onchain::constants::WSOL_PUBKEY;

    #[test]
    fn finds_known_mints_per_cluster() {
        let sol = lookup(Cluster::Devnet, &WSOL_PUBKEY).unwrap();
        assert_eq!(sol.symbol, "SOL");
        assert_eq!(sol.decimals, 9);

        let usdc = pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        assert_eq!(lookup(Cluster::Mainnet, &usdc).unwrap().symbol, "USDC");
        assert!(lookup(Cluster::Devnet, &usdc).is_none());
    }
}
