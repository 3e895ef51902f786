//! Best-effort memory provisioning.

use std::collections::HashMap;

use vm_types::VmUid;

use super::MemoryProvisioner;

/// Best-effort ledger for a host's memory.
///
/// If the clamped request fits into what is available it is granted,
/// otherwise it fails and the caller decides whether to place the VM
/// elsewhere. No preemption, no overbooking. Each host gets its own
/// instance.
#[derive(Debug)]
pub struct BestEffortMemoryProvisioner {
    /// Fixed memory capacity of the host
    total: u64,
    /// Capacity not yet allocated to any VM
    available: u64,
    /// Current scalar allocation per VM
    table: HashMap<VmUid, u64>,
}

impl BestEffortMemoryProvisioner {
    /// Creates a ledger for a host with the given memory capacity.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            available: total,
            table: HashMap::new(),
        }
    }
}

impl MemoryProvisioner for BestEffortMemoryProvisioner {
    fn allocate(&mut self, vm: &VmUid, requested: u64, vm_max: u64) -> bool {
        let amount = requested.min(vm_max);
        if amount < requested {
            tracing::debug!(
                "clamping request of {} for vm {} to its declared maximum {}",
                requested,
                vm,
                vm_max
            );
        }

        self.deallocate(vm);

        if amount > self.available {
            tracing::debug!(
                "rejecting {} memory units for vm {}: only {} available",
                amount,
                vm,
                self.available
            );
            return false;
        }

        self.available -= amount;
        self.table.insert(*vm, amount);
        tracing::trace!(
            "allocated {} memory units to vm {}, {} left",
            amount,
            vm,
            self.available
        );
        true
    }

    fn deallocate(&mut self, vm: &VmUid) {
        if let Some(freed) = self.table.remove(vm) {
            self.available += freed;
            tracing::trace!(
                "reclaimed {} memory units from vm {}, {} available",
                freed,
                vm,
                self.available
            );
        }
    }

    fn deallocate_all(&mut self) {
        self.available = self.total;
        self.table.clear();
    }

    fn allocated(&self, vm: &VmUid) -> u64 {
        self.allocation_of(vm).unwrap_or(0)
    }

    fn allocation_of(&self, vm: &VmUid) -> Option<u64> {
        self.table.get(vm).copied()
    }

    fn probe_feasible(&mut self, vm: &VmUid, amount: u64) -> bool {
        let prior = self.allocation_of(vm);
        let feasible = self.allocate(vm, amount, amount);
        self.deallocate(vm);
        if let Some(prior) = prior {
            self.allocate(vm, prior, prior);
        }
        feasible
    }

    fn available(&self) -> u64 {
        self.available
    }

    fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;
    use test_log::test;

    use super::*;

    fn vm(id: u32) -> VmUid {
        VmUid::new(1, id)
    }

    fn recorded_total(provisioner: &BestEffortMemoryProvisioner) -> u64 {
        provisioner.table.values().sum()
    }

    #[test]
    fn grants_and_reclaims() {
        let mut ram = BestEffortMemoryProvisioner::new(4096);

        assert!(ram.allocate(&vm(1), 1024, 2048));
        assert_eq!(ram.allocated(&vm(1)), 1024);
        assert_eq!(ram.available(), 3072);

        ram.deallocate(&vm(1));
        assert_eq!(ram.allocated(&vm(1)), 0);
        assert_eq!(ram.available(), 4096);
    }

    #[test]
    fn clamps_to_the_vm_declared_maximum() {
        let mut ram = BestEffortMemoryProvisioner::new(2048);

        assert!(ram.allocate(&vm(1), 4096, 2048));

        assert_eq!(ram.allocated(&vm(1)), 2048);
        assert_eq!(ram.available(), 0);
    }

    #[test]
    fn reallocation_reclaims_the_prior_grant_first() {
        let mut ram = BestEffortMemoryProvisioner::new(2048);
        assert!(ram.allocate(&vm(1), 1536, 2048));
        assert_eq!(ram.available(), 512);

        // 512 free is not enough for 2000, but reclaiming its own 1536 is.
        assert!(ram.allocate(&vm(1), 2000, 2048));

        assert_eq!(ram.allocated(&vm(1)), 2000);
        assert_eq!(ram.available(), 48);
    }

    #[test]
    fn failed_reallocation_leaves_the_vm_with_nothing() {
        let mut ram = BestEffortMemoryProvisioner::new(2048);
        assert!(ram.allocate(&vm(1), 1024, 4096));
        assert!(ram.allocate(&vm(2), 1024, 4096));

        // vm 1's 1024 is reclaimed, then 3000 still does not fit.
        assert!(!ram.allocate(&vm(1), 3000, 4096));

        assert_eq!(ram.allocation_of(&vm(1)), None);
        assert_eq!(ram.available(), 1024);
        assert_eq!(ram.allocated(&vm(2)), 1024);
    }

    #[test]
    fn rejection_for_a_new_vm_changes_nothing() {
        let mut ram = BestEffortMemoryProvisioner::new(1024);
        assert!(ram.allocate(&vm(1), 1000, 1000));

        assert!(!ram.allocate(&vm(2), 100, 100));

        assert_eq!(ram.available(), 24);
        assert_eq!(ram.allocation_of(&vm(2)), None);
    }

    #[test]
    fn probe_reports_without_durable_change() {
        let mut ram = BestEffortMemoryProvisioner::new(2048);
        assert!(ram.allocate(&vm(1), 1500, 2048));

        assert!(ram.probe_feasible(&vm(2), 500));
        assert!(!ram.probe_feasible(&vm(2), 600));

        assert_eq!(ram.available(), 548);
        assert_eq!(ram.allocated(&vm(1)), 1500);
        assert_eq!(ram.allocation_of(&vm(2)), None);
    }

    #[test]
    fn probe_restores_the_probing_vm_allocation() {
        let mut ram = BestEffortMemoryProvisioner::new(2048);
        assert!(ram.allocate(&vm(1), 1500, 2048));

        // Feasibility counts the VM's own reclaimable grant.
        assert!(ram.probe_feasible(&vm(1), 2000));
        assert!(!ram.probe_feasible(&vm(1), 2049));

        assert_eq!(ram.allocated(&vm(1)), 1500);
        assert_eq!(ram.available(), 548);
    }

    #[test]
    fn probe_on_a_full_ledger() {
        let mut ram = BestEffortMemoryProvisioner::new(2048);
        assert!(ram.allocate(&vm(1), 4096, 2048));
        assert_eq!(ram.available(), 0);

        assert!(!ram.probe_feasible(&vm(2), 100));

        assert_eq!(ram.available(), 0);
        assert_eq!(ram.allocated(&vm(1)), 2048);
    }

    #[test]
    fn lookup_distinguishes_absent_from_zero() {
        let mut ram = BestEffortMemoryProvisioner::new(1024);
        assert!(ram.allocate(&vm(1), 0, 0));

        assert_eq!(ram.allocation_of(&vm(1)), Some(0));
        assert_eq!(ram.allocation_of(&vm(2)), None);
        assert_eq!(ram.allocated(&vm(1)), 0);
        assert_eq!(ram.allocated(&vm(2)), 0);
    }

    #[test]
    fn deallocate_all_restores_full_capacity() {
        let mut ram = BestEffortMemoryProvisioner::new(4096);
        assert!(ram.allocate(&vm(1), 1024, 2048));
        assert!(ram.allocate(&vm(2), 2048, 2048));

        ram.deallocate_all();

        assert_eq!(ram.available(), 4096);
        assert_eq!(ram.allocation_of(&vm(1)), None);
        assert_eq!(ram.allocation_of(&vm(2)), None);
    }

    #[test]
    fn capacity_is_conserved_across_mixed_operations() {
        let mut ram = BestEffortMemoryProvisioner::new(4096);

        assert!(ram.allocate(&vm(1), 1024, 2048));
        assert!(ram.allocate(&vm(2), 2048, 2048));
        assert!(!ram.allocate(&vm(3), 2048, 2048));
        assert!(ram.probe_feasible(&vm(3), 512));
        ram.deallocate(&vm(1));
        assert!(ram.allocate(&vm(3), 1536, 4096));

        assert_eq!(recorded_total(&ram) + ram.available(), 4096);
        assert_eq!(ram.used(), 3584);
        assert_eq!(ram.utilization(), 0.875);
    }
}
