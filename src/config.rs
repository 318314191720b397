//! Provider options.
//!
//! The provider itself takes no user configuration (its config schema is
//! empty). These options tune the process-level behaviour a host or test
//! harness may care about.
//!
//! ```
//! use hemmer_provider_simple::{IdStrategy, ProviderOptions, SimpleProvider};
//!
//! let provider = SimpleProvider::with_options(
//!     ProviderOptions::new().with_id_strategy(IdStrategy::Sequential),
//! );
//! # let _ = provider;
//! ```

use crate::types::PROTOCOL_VERSION;

/// How identifiers are synthesized for resources applied without an `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// RFC 3339 UTC timestamp with nanoseconds, suffixed with a sequence
    /// number, e.g. `2026-10-18T09:51:00.123456789Z-7`.
    #[default]
    Timestamp,
    /// `simple-<sequence>`. Deterministic for a fresh provider.
    Sequential,
}

/// Options for constructing a [`SimpleProvider`](crate::SimpleProvider).
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Protocol version the provider negotiates with its host.
    /// Default: [`PROTOCOL_VERSION`].
    pub protocol_version: u32,
    /// Identifier synthesis strategy used by apply.
    /// Default: [`IdStrategy::Timestamp`].
    pub id_strategy: IdStrategy,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            id_strategy: IdStrategy::default(),
        }
    }
}

impl ProviderOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the negotiated protocol version.
    pub fn with_protocol_version(mut self, version: u32) -> Self {
        self.protocol_version = version;
        self
    }

    /// Set the identifier synthesis strategy.
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ProviderOptions::default();
        assert_eq!(options.protocol_version, 5);
        assert_eq!(options.id_strategy, IdStrategy::Timestamp);
    }

    #[test]
    fn test_builders() {
        let options = ProviderOptions::new()
            .with_protocol_version(6)
            .with_id_strategy(IdStrategy::Sequential);
        assert_eq!(options.protocol_version, 6);
        assert_eq!(options.id_strategy, IdStrategy::Sequential);
    }
}
