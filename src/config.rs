use crate::error::ConfigError;
use alloy::primitives::{address, Address};
use dotenvy::dotenv;
use reqwest::Url;
use std::{env, path::PathBuf, time::Duration};
use tracing::{debug, info};

const DEFAULT_RPC_URL: &str = "https://polygon-mainnet.infura.io/v3/";
const DEFAULT_QUOTE_API_URL: &str = "https://api.1inch.exchange/";
const DEFAULT_ABI_PATH: &str = "eth_abi.json";
const DEFAULT_CHAIN_ID: u64 = 137;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const DEFAULT_WALLET: Address = address!("008062acA356B5F93F2F14b71Fd73db91A606d0C");
/// USDT on Polygon
const DEFAULT_QUOTE_TOKEN: Address = address!("c2132d05d31c914a87c6611c10748aeb04b58e8f");
/// SHI3LD, KOGE, PEAR, SING
const DEFAULT_TOKENS: [Address; 4] = [
    address!("f239e69ce434c7fb408b05a0da416b14917d934e"),
    address!("13748d548D95D78a3c83fe3F32604B4796CFfa23"),
    address!("c8bcb58caEf1bE972C0B638B1dD8B0748Fdc8A44"),
    address!("CB898b0eFb084Df14dd8E018dA37B4d0f06aB26D"),
];

#[derive(Clone)]
pub struct Config {
    pub rpc_base_url: String,
    pub project_id: String,
    pub abi_path: PathBuf,
    pub wallet: Address,
    pub tokens: Vec<Address>,
    pub quote_token: Address,
    pub quote_api_url: String,
    pub quote_api_key: Option<String>,
    pub chain_id: u64,
    pub http_timeout: Duration,
}

// Keeps the credentials out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_endpoint", &self.redacted_rpc_endpoint())
            .field("abi_path", &self.abi_path)
            .field("wallet", &self.wallet)
            .field("tokens", &self.tokens)
            .field("quote_token", &self.quote_token)
            .field("quote_api_url", &self.quote_api_url)
            .field("quote_api_key", &self.quote_api_key.as_ref().map(|_| "***"))
            .field("chain_id", &self.chain_id)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl Config {
    /// Full RPC endpoint, credential included.
    pub fn rpc_endpoint(&self) -> String {
        format!("{}{}", self.rpc_base_url, self.project_id)
    }

    pub fn redacted_rpc_endpoint(&self) -> String {
        format!("{}***", self.rpc_base_url)
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let project_id = get("INFURA_PROJECT_ID").ok_or(ConfigError::MissingVar("INFURA_PROJECT_ID"))?;

        let mut rpc_base_url = match get("POLYGON_RPC_URL") {
            Some(v) => parse_url("POLYGON_RPC_URL", v)?,
            None => match get("RPC_HTTP_URL") {
                Some(v) => parse_url("RPC_HTTP_URL", v)?, // alias support
                None => DEFAULT_RPC_URL.to_string(),
            },
        };
        if !rpc_base_url.ends_with('/') {
            rpc_base_url.push('/');
        }

        let abi_path = get("ABI_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ABI_PATH));

        let wallet = match get("WALLET_ADDRESS") {
            Some(v) => parse_address("WALLET_ADDRESS", &v)?,
            None => DEFAULT_WALLET,
        };

        let quote_token = match get("QUOTE_TOKEN_ADDRESS") {
            Some(v) => parse_address("QUOTE_TOKEN_ADDRESS", &v)?,
            None => DEFAULT_QUOTE_TOKEN,
        };

        let tokens = match get("TOKEN_ADDRESSES") {
            Some(v) => parse_token_list(&v)?,
            None => DEFAULT_TOKENS.to_vec(),
        };

        let quote_api_url = match get("ONEINCH_API_URL") {
            Some(v) => parse_url("ONEINCH_API_URL", v)?,
            None => DEFAULT_QUOTE_API_URL.to_string(),
        };
        let quote_api_key = get("ONEINCH_API_KEY");

        let chain_id = match get("CHAIN_ID") {
            Some(v) => parse_number("CHAIN_ID", &v)?,
            None => DEFAULT_CHAIN_ID,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => match parse_number("HTTP_TIMEOUT_SECS", &v)? {
                0 => {
                    return Err(ConfigError::InvalidValue {
                        var: "HTTP_TIMEOUT_SECS",
                        expected: "timeout of at least one second",
                        value: v,
                    })
                }
                secs => Duration::from_secs(secs),
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Config {
            rpc_base_url,
            project_id,
            abi_path,
            wallet,
            tokens,
            quote_token,
            quote_api_url,
            quote_api_key,
            chain_id,
            http_timeout,
        })
    }
}

pub fn load() -> Result<Config, ConfigError> {
    if let Ok(path) = dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let cfg = Config::from_lookup(|key| env::var(key).ok())?;
    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}

fn parse_address(var: &'static str, value: &str) -> Result<Address, ConfigError> {
    value.parse::<Address>().map_err(|_| ConfigError::InvalidAddress {
        var,
        value: value.to_string(),
    })
}

/// Checked here so a bad URL fails before any request goes out; kept as text.
fn parse_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    match value.parse::<Url>() {
        Ok(_) => Ok(value),
        Err(_) => Err(ConfigError::InvalidValue {
            var,
            expected: "URL",
            value,
        }),
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var,
        expected: "non-negative integer",
        value: value.to_string(),
    })
}

/// Comma-separated addresses; order kept, repeats dropped.
fn parse_token_list(value: &str) -> Result<Vec<Address>, ConfigError> {
    let mut tokens: Vec<Address> = Vec::new();
    for part in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let token = parse_address("TOKEN_ADDRESSES", part)?;
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    if tokens.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "TOKEN_ADDRESSES",
            expected: "non-empty address list",
            value: value.to_string(),
        });
    }
    Ok(tokens)
}
