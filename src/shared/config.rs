use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::shared::errors::ConfigError;
use crate::shared::types::{Address, Chain, Token, TokenRegistry};

pub const DEFAULT_CONFIG_PATH: &str = "Config.toml";

/// Longest accepted swap deadline: one day
pub const MAX_DEADLINE_SECS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain: Chain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Swap contract address
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub address: Address,
    /// Connect on startup, the way the injected connector reconnects
    #[serde(default)]
    pub auto_connect: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub name: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Price used by the mock contract, in micro-USD
    pub mock_price_micro_usd: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    pub latency_ms: u64,
    pub jitter_ms: u64,
    pub fee_bps: u32,
    pub gas_estimate: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub contract: ContractConfig,
    pub wallet: WalletConfig,
    #[serde(default)]
    pub swap: SwapConfig,
    pub tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub mock: MockConfig,
}

fn default_slippage_bps() -> u32 {
    50
}

fn default_deadline_secs() -> u64 {
    1800
}

fn default_decimals() -> u8 {
    18
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            slippage_bps: default_slippage_bps(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

impl SwapConfig {
    /// Deadline window for simulated swaps, in `1..=MAX_DEADLINE_SECS` seconds
    pub fn deadline_window(&self) -> Result<chrono::Duration, ConfigError> {
        if self.deadline_secs == 0 || self.deadline_secs > MAX_DEADLINE_SECS {
            return Err(ConfigError::Invalid(format!(
                "deadline_secs must be between 1 and {}, got {}",
                MAX_DEADLINE_SECS, self.deadline_secs
            )));
        }
        let secs = i64::try_from(self.deadline_secs)
            .map_err(|_| ConfigError::Invalid(format!("deadline_secs out of range: {}", self.deadline_secs)))?;
        Ok(chrono::Duration::seconds(secs))
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_ms: 150,
            jitter_ms: 100,
            fee_bps: 30,
            gas_estimate: 120_000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig { chain: Chain::Sepolia },
            contract: ContractConfig {
                address: Address([0x5a; 20]),
            },
            wallet: WalletConfig {
                address: Address([0xa1; 20]),
                auto_connect: true,
            },
            swap: SwapConfig::default(),
            tokens: vec![
                TokenConfig {
                    symbol: "eth".to_string(),
                    name: "Ether".to_string(),
                    decimals: 18,
                    mock_price_micro_usd: 1_900_000_000,
                },
                TokenConfig {
                    symbol: "usdt".to_string(),
                    name: "Tether USD".to_string(),
                    decimals: 18,
                    mock_price_micro_usd: 1_000_000,
                },
                TokenConfig {
                    symbol: "usdc".to_string(),
                    name: "USD Coin".to_string(),
                    decimals: 18,
                    mock_price_micro_usd: 1_000_000,
                },
            ],
            mock: MockConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swap.slippage_bps >= 10_000 {
            return Err(ConfigError::Invalid(format!(
                "slippage_bps must be below 10000, got {}",
                self.swap.slippage_bps
            )));
        }
        self.swap.deadline_window()?;
        if self.mock.fee_bps >= 10_000 {
            return Err(ConfigError::Invalid(format!(
                "fee_bps must be below 10000, got {}",
                self.mock.fee_bps
            )));
        }
        if self.tokens.is_empty() {
            return Err(ConfigError::Invalid("no tokens configured".to_string()));
        }
        for token in &self.tokens {
            if token.decimals > 30 {
                return Err(ConfigError::Invalid(format!(
                    "token {} has {} decimals, at most 30 supported",
                    token.symbol, token.decimals
                )));
            }
            if token.mock_price_micro_usd == 0 {
                return Err(ConfigError::Invalid(format!(
                    "token {} has a zero mock price",
                    token.symbol
                )));
            }
        }
        Ok(())
    }

    pub fn token_registry(&self) -> TokenRegistry {
        TokenRegistry::new(
            self.tokens
                .iter()
                .map(|t| Token::new(&t.symbol, &t.name, t.decimals))
                .collect(),
        )
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from `path`, or from `Config.toml` when no path is given.
    /// A missing default file falls back to built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        if !explicit && !path.exists() {
            debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path)?;
        let config = AppConfig::parse_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[network]
chain = "mainnet"

[contract]
address = "0x1111111111111111111111111111111111111111"

[wallet]
address = "0x2222222222222222222222222222222222222222"

[swap]
slippage_bps = 100

[[tokens]]
symbol = "ETH"
name = "Ether"
mock_price_micro_usd = 1900000000

[[tokens]]
symbol = "usdc"
name = "USD Coin"
decimals = 6
mock_price_micro_usd = 1000000

[mock]
latency_ms = 0
jitter_ms = 0
fee_bps = 0
gas_estimate = 100000
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = AppConfig::parse_toml(SAMPLE).unwrap();
        assert_eq!(config.network.chain, Chain::Mainnet);
        assert_eq!(config.swap.slippage_bps, 100);
        assert_eq!(config.swap.deadline_secs, 1800);
        assert!(!config.wallet.auto_connect);

        let registry = config.token_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("eth").unwrap().decimals, 18);
        assert_eq!(registry.get("USDC").unwrap().decimals, 6);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.swap.slippage_bps, 50);
        assert_eq!(config.swap.deadline_secs, 1800);
        assert_eq!(config.token_registry().len(), 3);
    }

    #[test]
    fn test_rejects_invalid_slippage() {
        let bad = SAMPLE.replace("slippage_bps = 100", "slippage_bps = 10000");
        assert!(matches!(AppConfig::parse_toml(&bad), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_deadline() {
        let bad = SAMPLE.replace("slippage_bps = 100", "slippage_bps = 100\ndeadline_secs = 0");
        assert!(matches!(AppConfig::parse_toml(&bad), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_deadline_bounds() {
        let mut config = AppConfig::default();
        config.swap.deadline_secs = u64::MAX / 2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.swap.deadline_secs = MAX_DEADLINE_SECS + 1;
        assert!(config.validate().is_err());

        config.swap.deadline_secs = MAX_DEADLINE_SECS;
        assert!(config.validate().is_ok());
        assert_eq!(config.swap.deadline_window().unwrap(), chrono::Duration::days(1));
        config.swap.deadline_secs = 1;
        assert_eq!(config.swap.deadline_window().unwrap(), chrono::Duration::seconds(1));
    }

    #[test]
    fn test_rejects_bad_address() {
        let bad = SAMPLE.replace("0x1111111111111111111111111111111111111111", "0x11");
        assert!(AppConfig::parse_toml(&bad).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/deswap.toml")));
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }
}
