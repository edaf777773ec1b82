pub const SOLANA_EXPLORER_URL: &str = "https://solscan.io/tx/";

pub const SECRETS_FILE_PATH: &str = "data/secrets.txt";

pub const LOGS_DIR: &str = "logs";
