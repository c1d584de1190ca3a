//! @ai:module:intent Resident memory sampling of the current process
//! @ai:module:layer infrastructure
//! @ai:module:public_api MemoryProbe
//! @ai:module:stateless false

use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// @ai:intent Samples the benchmark process RSS via sysinfo
pub struct MemoryProbe {
    pid: Pid,
    system: Mutex<System>,
}

impl MemoryProbe {
    /// @ai:intent Create a probe for the current process
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            pid: Pid::from_u32(std::process::id()),
            system: Mutex::new(System::new()),
        }
    }

    /// @ai:intent Current resident memory in bytes
    /// @ai:post 0 when the process cannot be read
    /// @ai:effects io
    pub fn resident_bytes(&self) -> u64 {
        let Ok(mut system) = self.system.lock() else {
            return 0;
        };
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        system.process(self.pid).map_or(0, |p| p.memory())
    }

    /// @ai:intent Growth between two samples, floored at zero
    /// @ai:example (100, 250) -> 150
    /// @ai:example (250, 100) -> 0
    /// @ai:effects pure
    pub fn delta(before: u64, after: u64) -> u64 {
        after.saturating_sub(before)
    }
}

impl Default for MemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_saturates() {
        assert_eq!(MemoryProbe::delta(100, 250), 150);
        assert_eq!(MemoryProbe::delta(250, 100), 0);
    }

    #[test]
    fn test_reads_own_process() {
        assert!(MemoryProbe::new().resident_bytes() > 0);
    }
}
