//! Host capacity configuration.
//!
//! A host capacity description names the rate of every physical processing
//! unit and the memory of the host, and selects the provisioning policy the
//! built ledgers follow. Descriptions are usually loaded from YAML files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::{BestEffortComputeProvisioner, ComputeProvisioner};
use crate::error::ProvisionError;
use crate::memory::{BestEffortMemoryProvisioner, MemoryProvisioner};

/// Provisioning policy applied by the ledgers built for a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisionPolicy {
    /// Grant a request in full immediately or reject it outright.
    #[default]
    BestEffort,
}

/// Host capacity description corresponding to YAML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostCapacityConfig {
    /// Rate capacity of each physical processing unit
    #[serde(rename = "processingUnits")]
    pub processing_units: Vec<f64>,
    /// Memory capacity of the host
    #[serde(rename = "memoryCapacity")]
    pub memory_capacity: u64,
    /// Provisioning policy for every ledger of this host
    #[serde(default)]
    pub policy: ProvisionPolicy,
}

impl HostCapacityConfig {
    /// Parses and validates a host capacity description from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProvisionError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a host capacity description from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ProvisionError> {
        let path = path.as_ref();
        tracing::info!("loading host capacity config from {:?}", path);
        let yaml = std::fs::read_to_string(path).map_err(|source| ProvisionError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks the declared capacities without building anything.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        if self.processing_units.is_empty() {
            return Err(ProvisionError::NoProcessingUnits);
        }
        for &rate in &self.processing_units {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ProvisionError::InvalidUnitCapacity { value: rate });
            }
        }
        if self.memory_capacity == 0 {
            return Err(ProvisionError::ZeroMemoryCapacity);
        }
        Ok(())
    }

    /// Builds one compute ledger per declared processing unit.
    pub fn build_compute(&self) -> Result<Vec<Box<dyn ComputeProvisioner>>, ProvisionError> {
        self.validate()?;
        let mut units: Vec<Box<dyn ComputeProvisioner>> =
            Vec::with_capacity(self.processing_units.len());
        for &rate in &self.processing_units {
            units.push(match self.policy {
                ProvisionPolicy::BestEffort => {
                    Box::new(BestEffortComputeProvisioner::new(rate)?)
                }
            });
        }
        Ok(units)
    }

    /// Builds the host's memory ledger.
    pub fn build_memory(&self) -> Result<Box<dyn MemoryProvisioner>, ProvisionError> {
        self.validate()?;
        Ok(match self.policy {
            ProvisionPolicy::BestEffort => {
                Box::new(BestEffortMemoryProvisioner::new(self.memory_capacity))
            }
        })
    }
}
