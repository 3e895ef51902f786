//! Shared VM identity types
//!
//! This crate contains the type definitions shared between the capacity
//! ledgers and their callers, most importantly the stable consumer identity
//! a host uses to key allocation records.

use serde::Deserialize;
use serde::Serialize;

/// Stable identifier for a tenant virtual machine.
///
/// VM ids are only unique within the broker that owns the VM, so the
/// composite of both ids is what identifies a VM for the lifetime of a
/// ledger. Ledgers use this as their allocation table key and never look
/// further into the VM itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VmUid {
    /// Id of the broker that owns the VM
    pub broker_id: u32,
    /// Id of the VM within its broker
    pub vm_id: u32,
}

impl VmUid {
    pub fn new(broker_id: u32, vm_id: u32) -> Self {
        Self { broker_id, vm_id }
    }
}

impl std::fmt::Display for VmUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.broker_id, self.vm_id)
    }
}
