//! Token configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use nbt_types::{AccountId, NetworkId, TokenParams};
use nbt_utils::LogFormat;

use crate::TokenError;

/// Configuration for a token ledger instance.
///
/// Can be loaded from a TOML file via [`TokenConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Which network the token is deployed on.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// RPC endpoint override. Falls back to the network default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Account that owns the token at creation.
    #[serde(default = "default_owner")]
    pub owner: AccountId,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Token metadata and supply cap.
    #[serde(default)]
    pub token: TokenParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Dev
}

/// First account of the local development chain.
fn default_owner() -> AccountId {
    AccountId::new([
        0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72, 0x79,
        0xcf, 0xff, 0xb9, 0x22, 0x66,
    ])
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

// ── Impl ───────────────────────────────────────────────────────────────

impl TokenConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, TokenError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TokenError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TokenError> {
        let config: Self = toml::from_str(s).map_err(|e| TokenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TokenError> {
        toml::to_string_pretty(self).map_err(|e| TokenError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), TokenError> {
        self.token.validate().map_err(TokenError::Config)?;
        if self.owner.is_zero() {
            return Err(TokenError::Config("owner must not be the null account".into()));
        }
        Ok(())
    }

    /// The configured RPC endpoint, or the network's default.
    pub fn effective_rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            rpc_url: None,
            owner: default_owner(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            token: TokenParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbt_types::TOKEN_UNIT;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = TokenConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = TokenConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = TokenConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.network, NetworkId::Dev);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.token.cap, 1_000_000_000 * TOKEN_UNIT);
        assert_eq!(
            config.owner.to_string(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            network = "testnet"
            log_format = "json"
            owner = "0x41A232DB03cE4514bdd5Ce3412Bd7fC1eC31f8DA"

            [token]
            symbol = "TST"
            cap = "1000000"
        "#;
        let config = TokenConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.network, NetworkId::Testnet);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.token.symbol, "TST");
        assert_eq!(config.token.name, "NanoByte Token");
        assert_eq!(config.token.cap, 1_000_000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn integer_cap_accepted() {
        let config = TokenConfig::from_toml_str("[token]\ncap = 5000\n").unwrap();
        assert_eq!(config.token.cap, 5_000);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            TokenConfig::from_toml_str("[token]\ncap = \"0\"\n"),
            Err(TokenError::Config(_))
        ));
        assert!(TokenConfig::from_toml_str("network = \"moon\"").is_err());
        assert!(TokenConfig::from_toml_str(
            "owner = \"0x0000000000000000000000000000000000000000\""
        )
        .is_err());
    }

    #[test]
    fn rpc_url_falls_back_to_network() {
        let mut config = TokenConfig {
            network: NetworkId::Mainnet,
            ..TokenConfig::default()
        };
        assert_eq!(config.effective_rpc_url(), NetworkId::Mainnet.default_rpc_url());
        config.rpc_url = Some("http://localhost:8545".into());
        assert_eq!(config.effective_rpc_url(), "http://localhost:8545");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let config = TokenConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = TokenConfig::from_toml_file(Path::new("/nonexistent/nbt.toml"));
        assert!(matches!(result, Err(TokenError::Config(_))));
    }
}
