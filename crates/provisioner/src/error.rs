//! Error types for ledger construction and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing ledgers or loading a host capacity
/// description.
///
/// Capacity shortfalls during allocation are never represented here; an
/// allocation that cannot be satisfied returns `false` and the caller
/// decides what to do next. Lookups for unknown VMs or out-of-range virtual
/// units return `None` instead of an error.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("invalid processing unit capacity {value}: must be finite and positive")]
    InvalidUnitCapacity { value: f64 },

    #[error("host declares no processing units")]
    NoProcessingUnits,

    #[error("host memory capacity must be positive")]
    ZeroMemoryCapacity,

    #[error("failed to read host capacity config {path:?}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse host capacity config: {0}")]
    ParseConfig(#[from] serde_yaml::Error),
}
