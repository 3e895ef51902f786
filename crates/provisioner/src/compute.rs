//! Compute capacity provisioning.
//!
//! One provisioner instance tracks a single physical processing unit and
//! hands slices of its rate to the virtual processing units backed by it. A
//! VM may claim several virtual units from the same physical unit, so the
//! allocation record per VM is an ordered sequence of rates rather than a
//! single scalar.

use vm_types::VmUid;

pub mod best_effort;

pub use best_effort::BestEffortComputeProvisioner;

/// Capability interface for compute rate provisioning.
///
/// Every implementation maintains `available + sum of all recorded
/// allocations == total` after each operation. Mutating calls must come
/// from the single logical owner of the physical unit; there is no
/// internal synchronization.
pub trait ComputeProvisioner: Send {
    /// Allocates `rate` as one additional virtual unit for `vm`.
    ///
    /// Returns `false` without changing any state when the remaining
    /// capacity cannot cover the request. Repeated calls accumulate virtual
    /// units; earlier allocations for the same VM are never reclaimed here.
    fn allocate(&mut self, vm: &VmUid, rate: f64) -> bool;

    /// Replaces all of `vm`'s virtual unit allocations in one step.
    ///
    /// Feasibility is judged with the VM's current allocation already
    /// reclaimed, so shrinking a VM always succeeds. Either the whole
    /// sequence is applied or nothing changes.
    fn allocate_all(&mut self, vm: &VmUid, rates: Vec<f64>) -> bool;

    /// Reclaims every virtual unit held by `vm`. No-op for unknown VMs.
    fn deallocate(&mut self, vm: &VmUid);

    /// Reclaims the allocations of all VMs and restores full capacity.
    fn deallocate_all(&mut self);

    /// Sum of `vm`'s virtual unit rates, 0.0 when none are recorded.
    fn allocated_total(&self, vm: &VmUid) -> f64;

    /// The per-virtual-unit rates recorded for `vm`, `None` when absent.
    fn allocated_units(&self, vm: &VmUid) -> Option<&[f64]>;

    /// The rate of the virtual unit at position `unit` in `vm`'s sequence.
    ///
    /// Returns `None` when the VM is unknown or the index is out of range,
    /// keeping "no such allocation" distinguishable from a recorded rate of
    /// zero.
    fn allocated_unit(&self, vm: &VmUid, unit: usize) -> Option<f64>;

    /// Capacity not yet allocated to any virtual unit.
    fn available(&self) -> f64;

    /// Fixed capacity of the backing processing unit.
    fn total(&self) -> f64;

    /// Capacity currently allocated across all VMs.
    fn used(&self) -> f64 {
        self.total() - self.available()
    }

    /// Fraction of the unit's capacity currently allocated, in `[0, 1]`.
    fn utilization(&self) -> f64 {
        if self.total() == 0.0 {
            0.0
        } else {
            self.used() / self.total()
        }
    }
}
