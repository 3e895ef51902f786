//! Best-effort compute provisioning.

use std::collections::HashMap;

use vm_types::VmUid;

use super::ComputeProvisioner;
use crate::error::ProvisionError;

/// Best-effort ledger for one physical processing unit.
///
/// If the requested rate is still available it is granted to a virtual
/// unit, otherwise the request fails and the caller decides whether to try
/// another unit. No preemption, no overbooking. Each processing unit of a
/// host gets its own instance.
#[derive(Debug)]
pub struct BestEffortComputeProvisioner {
    /// Fixed capacity of the processing unit
    total: f64,
    /// Capacity not yet allocated to any virtual unit
    available: f64,
    /// Per-VM sequences of virtual unit rates
    table: HashMap<VmUid, Vec<f64>>,
}

impl BestEffortComputeProvisioner {
    /// Creates a ledger for a processing unit with the given rate capacity.
    pub fn new(total: f64) -> Result<Self, ProvisionError> {
        if !total.is_finite() || total <= 0.0 {
            return Err(ProvisionError::InvalidUnitCapacity { value: total });
        }
        Ok(Self {
            total,
            available: total,
            table: HashMap::new(),
        })
    }
}

impl ComputeProvisioner for BestEffortComputeProvisioner {
    fn allocate(&mut self, vm: &VmUid, rate: f64) -> bool {
        if !rate.is_finite() || rate < 0.0 {
            tracing::warn!("ignoring invalid rate request {} for vm {}", rate, vm);
            return false;
        }
        if rate > self.available {
            tracing::debug!(
                "rejecting {} rate units for vm {}: only {} available",
                rate,
                vm,
                self.available
            );
            return false;
        }

        self.table.entry(*vm).or_default().push(rate);
        self.available -= rate;
        tracing::trace!(
            "allocated {} rate units to vm {}, {} left",
            rate,
            vm,
            self.available
        );
        true
    }

    fn allocate_all(&mut self, vm: &VmUid, rates: Vec<f64>) -> bool {
        if rates.iter().any(|rate| !rate.is_finite() || *rate < 0.0) {
            tracing::warn!("ignoring invalid rate sequence {:?} for vm {}", rates, vm);
            return false;
        }

        let requested: f64 = rates.iter().sum();
        let held = self.allocated_total(vm);
        if requested > self.available + held {
            tracing::debug!(
                "rejecting replacement of {} rate units for vm {}: only {} reclaimable",
                requested,
                vm,
                self.available + held
            );
            return false;
        }

        self.available += held - requested;
        if rates.is_empty() {
            self.table.remove(vm);
        } else {
            self.table.insert(*vm, rates);
        }
        tracing::trace!(
            "replaced allocation of vm {} with {} rate units, {} left",
            vm,
            requested,
            self.available
        );
        true
    }

    fn deallocate(&mut self, vm: &VmUid) {
        if let Some(units) = self.table.remove(vm) {
            self.available += units.iter().sum::<f64>();
            tracing::trace!(
                "reclaimed {} virtual units from vm {}, {} available",
                units.len(),
                vm,
                self.available
            );
        }
    }

    fn deallocate_all(&mut self) {
        self.available = self.total;
        self.table.clear();
    }

    fn allocated_total(&self, vm: &VmUid) -> f64 {
        self.table
            .get(vm)
            .map(|units| units.iter().sum())
            .unwrap_or(0.0)
    }

    fn allocated_units(&self, vm: &VmUid) -> Option<&[f64]> {
        self.table.get(vm).map(Vec::as_slice)
    }

    fn allocated_unit(&self, vm: &VmUid, unit: usize) -> Option<f64> {
        self.table.get(vm).and_then(|units| units.get(unit)).copied()
    }

    fn available(&self) -> f64 {
        self.available
    }

    fn total(&self) -> f64 {
        self.total
    }
}
