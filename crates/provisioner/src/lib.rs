//! Capacity ledgers for hosts backing tenant virtual machines.
//!
//! This library tracks how much of a physical resource (the compute rate of
//! a processing unit, the memory of a host) has been handed out to VMs, and
//! guarantees that grants never exceed physical capacity. A placement policy
//! or scheduler calls `allocate` before admitting a VM and `deallocate` when
//! evicting or migrating it. A rejected request is an ordinary outcome the
//! caller acts on, not an error.
//!
//! # Features
//!
//! - Best-effort provisioning: a request is granted in full immediately or
//!   rejected outright, with no partial grants and no queuing
//! - Per-virtual-unit compute allocation, including atomic wholesale
//!   replacement of a VM's allocation sequence
//! - Memory allocation clamped to the VM's declared maximum, with a
//!   side-effect-free feasibility probe
//! - Host capacity descriptions loaded from YAML, building one ledger per
//!   physical processing unit
//!
//! # Examples
//!
//! ```
//! use provisioner::{BestEffortComputeProvisioner, ComputeProvisioner};
//! use vm_types::VmUid;
//!
//! # fn main() -> Result<(), provisioner::ProvisionError> {
//! let mut pe = BestEffortComputeProvisioner::new(1000.0)?;
//! let vm = VmUid::new(1, 7);
//!
//! assert!(pe.allocate(&vm, 400.0));
//! assert_eq!(pe.available(), 600.0);
//!
//! // More than what is left: rejected, nothing changes.
//! assert!(!pe.allocate(&vm, 700.0));
//! assert_eq!(pe.available(), 600.0);
//!
//! pe.deallocate(&vm);
//! assert_eq!(pe.available(), 1000.0);
//! # Ok(())
//! # }
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod memory;

pub use compute::BestEffortComputeProvisioner;
pub use compute::ComputeProvisioner;
pub use config::HostCapacityConfig;
pub use config::ProvisionPolicy;
pub use error::ProvisionError;
pub use memory::BestEffortMemoryProvisioner;
pub use memory::MemoryProvisioner;
