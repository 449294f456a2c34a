//! Bridge adapter addresses.

use alloy_primitives::Address;
use serde::Deserialize;
use std::collections::HashMap;

use crate::application::orders::BridgeRegistry;
use crate::domain::LiquiditySource;
use crate::error::ConfigError;

/// `[bridges]` section: source name to adapter address.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BridgeConfig {
    adapters: HashMap<String, String>,
}

impl BridgeConfig {
    /// Parsed registry of adapter addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown source, the
    /// native source, or a malformed address.
    pub fn registry(&self) -> Result<BridgeRegistry, ConfigError> {
        let mut adapters = HashMap::with_capacity(self.adapters.len());
        for (name, address) in &self.adapters {
            let source = name
                .parse::<LiquiditySource>()
                .map_err(|reason| ConfigError::InvalidValue {
                    field: "bridges",
                    reason,
                })?;
            if source.is_native() {
                return Err(ConfigError::InvalidValue {
                    field: "bridges",
                    reason: "native orders settle without a bridge".to_string(),
                });
            }
            let address = address
                .parse::<Address>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "bridges",
                    reason: format!("{name}: {e}"),
                })?;
            adapters.insert(source, address);
        }
        Ok(BridgeRegistry::new(adapters))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
