//! Policy for opening received envelopes.
//!
//! # Example
//!
//! ```
//! use secretly_envelope::config::{OpenConfig, OpenConfigBuilder};
//!
//! // Use defaults: signature required, 16 MiB limit
//! let config = OpenConfig::default();
//!
//! // Or use the builder for customization
//! let config = OpenConfigBuilder::new()
//!     .with_max_envelope_size(64 * 1024)
//!     .allow_unsigned()
//!     .build();
//! assert!(config.validate().is_ok());
//! ```

use secretly_crypto::PublicKey;
use serde::{Deserialize, Serialize};

use crate::limits::{DEFAULT_MAX_ENVELOPE_SIZE, MIN_ENVELOPE_SIZE};

/// How strictly received envelopes are checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenConfig {
    /// Wire blobs larger than this are rejected before decoding.
    #[serde(default = "default_max_envelope_size")]
    pub max_envelope_size: usize,

    /// Reject envelopes that carry no signature.
    #[serde(default = "default_require_signature")]
    pub require_signature: bool,

    /// When set, the recovered sender must be exactly this key.
    #[serde(default, with = "public_key_serde")]
    pub expected_sender: Option<PublicKey>,
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self {
            max_envelope_size: DEFAULT_MAX_ENVELOPE_SIZE,
            require_signature: true,
            expected_sender: None,
        }
    }
}

impl OpenConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> OpenConfigBuilder {
        OpenConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_envelope_size < MIN_ENVELOPE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "max_envelope_size".into(),
                reason: format!("must be at least {} bytes", MIN_ENVELOPE_SIZE),
            });
        }

        if self.expected_sender.is_some() && !self.require_signature {
            return Err(ConfigError::InvalidValue {
                field: "expected_sender".into(),
                reason: "an expected sender requires signatures to be required".into(),
            });
        }

        Ok(())
    }
}

/// Builder for [`OpenConfig`].
#[derive(Clone, Debug, Default)]
pub struct OpenConfigBuilder {
    config: OpenConfig,
}

impl OpenConfigBuilder {
    /// Create a builder starting from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum accepted wire size.
    pub fn with_max_envelope_size(mut self, max: usize) -> Self {
        self.config.max_envelope_size = max;
        self
    }

    /// Require a signature (default).
    pub fn require_signature(mut self) -> Self {
        self.config.require_signature = true;
        self
    }

    /// Accept envelopes without a signature.
    pub fn allow_unsigned(mut self) -> Self {
        self.config.require_signature = false;
        self
    }

    /// Pin the sender to a key known out-of-band.
    pub fn with_expected_sender(mut self, sender: PublicKey) -> Self {
        self.config.expected_sender = Some(sender);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenConfig {
        self.config
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// The reason it's invalid.
        reason: String,
    },
}

fn default_max_envelope_size() -> usize {
    DEFAULT_MAX_ENVELOPE_SIZE
}

fn default_require_signature() -> bool {
    true
}

/// Serde support for an optional public key as hex.
mod public_key_serde {
    use secretly_crypto::PublicKey;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(key: &Option<PublicKey>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match key {
            Some(key) => serializer.serialize_some(&key.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PublicKey>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex: Option<String> = Option::deserialize(deserializer)?;
        hex.map(|s| PublicKey::from_hex(&s).map_err(D::Error::custom))
            .transpose()
    }
}
