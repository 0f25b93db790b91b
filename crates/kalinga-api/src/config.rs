use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Service settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `KALINGA_ADDR`
    pub addr: SocketAddr,
    /// `KALINGA_DATA_FILE`. Without it the store lives in memory only.
    pub data_file: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let raw_addr = lookup("KALINGA_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| eyre::eyre!("invalid KALINGA_ADDR '{raw_addr}': {e}"))?;
        let data_file = lookup("KALINGA_DATA_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self { addr, data_file })
    }
}
