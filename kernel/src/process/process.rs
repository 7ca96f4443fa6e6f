//! Process identity and job-control links
//!
//! Only the parts of a process the terminal layer touches live here: its
//! id, its process-group link and its pending signal set.

use alloc::string::String;
use alloc::sync::Arc;
use spin::{Mutex, MutexGuard};

use super::group::ProcessGroup;
use super::session::Session;
use crate::errno::EPERM;
use crate::signal::PendingSignals;

/// Process ID type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(u64);

impl ProcessId {
    pub const fn new(id: u64) -> Self {
        ProcessId(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// State guarded by the process lock
pub struct ProcessLinks {
    pgroup: Arc<ProcessGroup>,
}

impl ProcessLinks {
    /// The process group this process currently belongs to
    pub fn pgroup(&self) -> &Arc<ProcessGroup> {
        &self.pgroup
    }
}

/// A process as seen by the terminal layer
pub struct Process {
    pid: ProcessId,

    /// Process name (for debugging)
    name: String,

    /// Process lock. Taken before any process-group lock.
    links: Mutex<ProcessLinks>,

    /// Signals posted to this process and not yet consumed
    pub signals: PendingSignals,
}

impl Process {
    /// Create a process and enrol it in `pgroup`
    pub fn new(pid: ProcessId, name: &str, pgroup: &Arc<ProcessGroup>) -> Arc<Self> {
        let process = Arc::new(Self {
            pid,
            name: String::from(name),
            links: Mutex::new(ProcessLinks {
                pgroup: Arc::clone(pgroup),
            }),
            signals: PendingSignals::new(),
        });
        pgroup.add_member(&process);
        process
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire the process lock
    pub fn lock(&self) -> MutexGuard<'_, ProcessLinks> {
        self.links.lock()
    }

    /// Current process group
    pub fn pgroup(&self) -> Arc<ProcessGroup> {
        Arc::clone(&self.links.lock().pgroup)
    }

    /// Session of the current process group
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(self.pgroup().session())
    }

    /// Move this process into another group of the same session
    ///
    /// Lock order: process, then old group, then new group (never both
    /// groups at once).
    pub fn setpgid(self: &Arc<Self>, target: &Arc<ProcessGroup>) -> Result<(), i32> {
        let mut links = self.links.lock();
        if !Arc::ptr_eq(links.pgroup.session(), target.session()) {
            return Err(EPERM);
        }
        if Arc::ptr_eq(&links.pgroup, target) {
            return Ok(());
        }

        links.pgroup.remove_member(self.pid);
        target.add_member(self);
        links.pgroup = Arc::clone(target);
        Ok(())
    }
}

impl core::fmt::Debug for Process {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid.as_u64())
            .field("name", &self.name)
            .finish()
    }
}
