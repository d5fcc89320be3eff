//! Cart configuration.

use gomarket_storage::store_key;
use serde::{Deserialize, Serialize};

/// Namespace prefix shared by every GoMarketplace storage key.
pub const STORAGE_NAMESPACE: &str = "@GoMarketplace";

/// What `decrement` does to a line item whose quantity reaches zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroQuantity {
    /// Drop the line item from the cart.
    #[default]
    Remove,
    /// Keep the line item at quantity zero.
    Keep,
}

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Key every snapshot is written to and hydrated from.
    pub storage_key: String,

    /// Keys read, in order, when `storage_key` holds nothing.
    ///
    /// Older builds wrote increments and decrements to `@GoMarketplace:cart`.
    pub legacy_keys: Vec<String>,

    /// Zero-quantity policy for `decrement`.
    pub zero_quantity: ZeroQuantity,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: store_key!(STORAGE_NAMESPACE, "products"),
            legacy_keys: vec![store_key!(STORAGE_NAMESPACE, "cart")],
            zero_quantity: ZeroQuantity::default(),
        }
    }
}

impl CartConfig {
    /// Set the snapshot key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the legacy fallback keys.
    pub fn with_legacy_keys(mut self, keys: Vec<String>) -> Self {
        self.legacy_keys = keys;
        self
    }

    /// Set the zero-quantity policy.
    pub fn with_zero_quantity(mut self, policy: ZeroQuantity) -> Self {
        self.zero_quantity = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "@GoMarketplace:products");
        assert_eq!(config.legacy_keys, vec!["@GoMarketplace:cart".to_string()]);
        assert_eq!(config.zero_quantity, ZeroQuantity::Remove);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CartConfig = serde_json::from_str(r#"{"zero_quantity": "keep"}"#).unwrap();
        assert_eq!(config.zero_quantity, ZeroQuantity::Keep);
        assert_eq!(config.storage_key, "@GoMarketplace:products");
    }
}
