//! Resolver configuration.

use crate::confirmation::REQUEST_CONFIRMATION_FUNCTION_CALL_NAME;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings for confirmation resolution, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Function name identifying confirmation responses.
    #[serde(default = "default_function_name")]
    pub function_name: String,
}

fn default_function_name() -> String {
    REQUEST_CONFIRMATION_FUNCTION_CALL_NAME.to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            function_name: default_function_name(),
        }
    }
}

impl ResolverConfig {
    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.function_name.trim().is_empty() {
            return Err(Error::Config("function_name must not be empty".into()));
        }
        Ok(())
    }
}
