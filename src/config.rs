use config::{Config as ConfigLoader, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Default decimal scale assumed for tokens without registered metadata
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

fn default_deadline_window_secs() -> u64 {
    20 * 60
}

fn default_reset_delay_secs() -> u64 {
    5
}

/// Network constants loaded from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConstants {
    /// Network name
    pub network_name: String,
    /// Chain ID
    pub chain_id: u64,
    /// Default RPC endpoint
    pub default_rpc: String,
    /// Exchange router (spender) contract address
    pub router_address: String,
}

impl NetworkConstants {
    /// Create a new NetworkConstants with specified values
    pub fn new(
        network_name: String,
        chain_id: u64,
        default_rpc: String,
        router_address: String,
    ) -> Self {
        Self {
            network_name,
            chain_id,
            default_rpc,
            router_address,
        }
    }

    /// Load network constants from the configuration file
    pub fn load(network: &str) -> Result<Self, ConfigError> {
        let config_dir = env::var("ROUTER_DEX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let settings = ConfigLoader::builder()
            // Add the config file
            .add_source(File::with_name(&format!("{}/network", config_dir)))
            .build()?;

        // Extract the network section
        settings.get::<NetworkConstants>(network)
    }
}

/// Token information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Token decimals
    pub decimals: u8,
    /// Token logo URL
    pub logo: Option<String>,
}

/// Exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Network name (e.g., goerli)
    pub network_name: String,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Exchange router contract address, used as the approval spender
    pub router_address: String,
    /// Seconds a submitted swap stays valid (enforced by the contract)
    #[serde(default = "default_deadline_window_secs")]
    pub deadline_window_secs: u64,
    /// Seconds a terminal outcome stays visible before the form resets
    #[serde(default = "default_reset_delay_secs")]
    pub reset_delay_secs: u64,
    /// Known tokens and their metadata, keyed by address
    #[serde(default)]
    pub tokens: HashMap<String, TokenInfo>,
}

impl ExchangeConfig {
    /// Create a new configuration from network constants
    pub fn from_constants(constants: &NetworkConstants) -> Self {
        Self {
            network_name: constants.network_name.clone(),
            chain_id: constants.chain_id,
            rpc_url: constants.default_rpc.clone(),
            router_address: constants.router_address.clone(),
            deadline_window_secs: default_deadline_window_secs(),
            reset_delay_secs: default_reset_delay_secs(),
            tokens: HashMap::new(),
        }
    }

    /// Set the router address
    pub fn with_router(mut self, router_address: String) -> Self {
        self.router_address = router_address;
        self
    }

    /// Set how long a terminal outcome stays visible
    pub fn with_reset_delay_secs(mut self, secs: u64) -> Self {
        self.reset_delay_secs = secs;
        self
    }

    /// Add token information
    pub fn add_token(&mut self, address: String, token_info: TokenInfo) {
        self.tokens.insert(address, token_info);
    }

    /// Decimal scale for a token, falling back to the default when unknown
    pub fn token_decimals(&self, address: &str) -> u8 {
        self.tokens
            .get(address)
            .map(|t| t.decimals)
            .unwrap_or(DEFAULT_TOKEN_DECIMALS)
    }

    /// Deadline window as a duration
    pub fn deadline_window(&self) -> Duration {
        Duration::from_secs(self.deadline_window_secs)
    }

    /// Reset delay as a duration
    pub fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.reset_delay_secs)
    }

    /// Load configuration from a file
    pub fn load(path: &PathBuf) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config: ExchangeConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &PathBuf) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("router-dex");
        path.push("config.toml");
        path
    }
}
