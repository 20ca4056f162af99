//! Process-wide configuration, loaded once at startup.

use std::env;
use std::fmt;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_FLOWS_CACHE_TTL_SECS: u64 = 60;

pub const BTC_ETFS: &[&str] = &[
    "IBIT", "FBTC", "BITB", "ARKB", "BTCO", "EZBC", "BRRR", "HODL", "BTCW", "GBTC", "BTC",
];
pub const ETH_ETFS: &[&str] = &[
    "ETHA", "FETH", "ETHW", "CETH", "ETHV", "QETH", "EZET", "ETHE", "ETH",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Crypto asset an ETF tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Btc,
    Eth,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Btc, Category::Eth];

    /// Case-insensitive; anything other than BTC/ETH is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "BTC" => Some(Category::Btc),
            "ETH" => Some(Category::Eth),
            _ => None,
        }
    }

    /// Tag stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Btc => "BTC",
            Category::Eth => "ETH",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed ticker lists per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtfUniverse {
    btc: Vec<String>,
    eth: Vec<String>,
}

impl EtfUniverse {
    pub fn new(btc: Vec<String>, eth: Vec<String>) -> Self {
        Self { btc, eth }
    }

    pub fn tickers(&self, category: Category) -> &[String] {
        match category {
            Category::Btc => &self.btc,
            Category::Eth => &self.eth,
        }
    }

    /// All tickers, category by category, in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> + '_ {
        Category::ALL.into_iter().flat_map(move |category| {
            self.tickers(category)
                .iter()
                .map(move |ticker| (category, ticker.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.btc.len() + self.eth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EtfUniverse {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|t| t.to_string()).collect();
        Self {
            btc: owned(BTC_ETFS),
            eth: owned(ETH_ETFS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub yahoo_base_url: String,
    pub flows_cache_ttl_secs: u64,
    pub universe: EtfUniverse,
}

impl Config {
    /// Read configuration from the environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let yahoo_base_url =
            lookup("YAHOO_BASE_URL").unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string());

        let flows_cache_ttl_secs = match lookup("FLOWS_CACHE_TTL_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "FLOWS_CACHE_TTL_SECS",
                value: raw,
            })?,
            None => DEFAULT_FLOWS_CACHE_TTL_SECS,
        };

        Ok(Self {
            database_url: normalize_database_url(&database_url),
            bind_addr,
            yahoo_base_url,
            flows_cache_ttl_secs,
            universe: EtfUniverse::default(),
        })
    }
}

/// Rewrite the legacy `postgres://` scheme to `postgresql://`.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{}", rest),
        None => url.to_string(),
    }
}
