//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use gomarket_cart::CartConfig;
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order, from the working directory up.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["gomarket.toml", ".gomarket.toml", "gomarket.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart behavior.
    #[serde(default)]
    pub cart: CartConfig,

    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the storage document (default: the user data directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Generate a default gomarket.toml config file.
pub fn generate_default_config() -> String {
    r#"# GoMarketplace cart configuration

[cart]
storage_key = "@GoMarketplace:products"
legacy_keys = ["@GoMarketplace:cart"]
# "remove" drops a line item when decrement reaches zero, "keep" leaves it at 0
zero_quantity = "remove"

[storage]
# path = "./storage.json"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_cart::ZeroQuantity;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.cart, CartConfig::default());
        assert_eq!(config.storage.path, None);
    }

    #[test]
    fn test_save_and_load_toml_and_json() {
        let dir = tempdir().unwrap();
        let mut config = CliConfig::default();
        config.cart.zero_quantity = ZeroQuantity::Keep;
        config.storage.path = Some("cart.json".to_string());

        for name in ["gomarket.toml", "gomarket.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(CliConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gomarket.toml");
        std::fs::write(&path, "[cart\n").unwrap();

        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML config"));
    }
}
