//! Module: config
//! Responsibility: runtime limits and switches for registries and key planning.
//! Does not own: enforcement (see `registry`).

use crate::{
    MAX_KEY_FIELDS,
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Default cap on one index row key. Matches the usual row-key ceiling of
/// wide-column stores (`i16::MAX`).
pub const DEFAULT_MAX_KEY_BYTES: usize = 32_767;

/// Default cap on an encoded maintainer registry blob.
pub const DEFAULT_MAX_REGISTRY_BYTES: usize = 4 * 1024 * 1024;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config value '{field}' is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, err.to_string())
    }
}

///
/// IndexConfig
///
/// Limits applied by a `MaintainerRegistry`, loadable from TOML:
///
/// ```toml
/// max_key_bytes = 4096
/// max_registry_bytes = 1048576
/// max_key_fields = 16
/// debug = true
/// ```
///
/// Omitted keys take their defaults; unknown keys are rejected.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub max_key_bytes: usize,
    pub max_registry_bytes: usize,
    pub max_key_fields: usize,
    pub debug: bool,
}

impl IndexConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Check that every limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_key_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_key_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_registry_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_registry_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_key_fields == 0 || self.max_key_fields > MAX_KEY_FIELDS {
            return Err(ConfigError::Invalid {
                field: "max_key_fields",
                reason: format!("must be within 1..={MAX_KEY_FIELDS}"),
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_key_bytes: DEFAULT_MAX_KEY_BYTES,
            max_registry_bytes: DEFAULT_MAX_REGISTRY_BYTES,
            max_key_fields: MAX_KEY_FIELDS,
            debug: false,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = IndexConfig::from_toml_str("").expect("empty toml should parse");

        assert_eq!(config, IndexConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_keys_only() {
        let config = IndexConfig::from_toml_str("max_key_bytes = 128\ndebug = true\n")
            .expect("toml should parse");

        assert_eq!(config.max_key_bytes, 128);
        assert!(config.debug);
        assert_eq!(config.max_registry_bytes, DEFAULT_MAX_REGISTRY_BYTES);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = IndexConfig::from_toml_str("max_keys = 3").expect_err("unknown key");

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_range_limits_are_rejected() {
        let err = IndexConfig::from_toml_str("max_key_fields = 64").expect_err("too many fields");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_key_fields",
                ..
            }
        ));

        IndexConfig::from_toml_str("max_key_bytes = 0").expect_err("zero key bytes");
    }

    #[test]
    fn config_error_maps_to_config_origin() {
        let err: InternalError = ConfigError::Parse("bad".into()).into();

        assert_eq!(err.origin, ErrorOrigin::Config);
        assert_eq!(err.class, ErrorClass::Unsupported);
    }
}
