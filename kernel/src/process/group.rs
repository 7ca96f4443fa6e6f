//! Process groups
//!
//! A process group is the unit job-control signals are sent to. The group
//! does not own its members: it keeps weak links and prunes dead ones when
//! membership changes.

use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use spin::{Mutex, MutexGuard};

use super::process::{Process, ProcessId};
use super::session::Session;

pub struct ProcessGroup {
    pgid: ProcessId,
    session: Arc<Session>,

    /// Group lock. Always taken after the process lock.
    members: Mutex<Vec<Weak<Process>>>,
}

impl ProcessGroup {
    /// Create a group and register it with its session
    pub fn new(pgid: ProcessId, session: &Arc<Session>) -> Arc<Self> {
        let group = Arc::new(Self {
            pgid,
            session: Arc::clone(session),
            members: Mutex::new(Vec::new()),
        });
        session.add_group(&group);
        group
    }

    pub fn pgid(&self) -> ProcessId {
        self.pgid
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Acquire the group lock
    pub fn lock(&self) -> MutexGuard<'_, Vec<Weak<Process>>> {
        self.members.lock()
    }

    /// Number of live members
    pub fn member_count(&self) -> usize {
        self.members
            .lock()
            .iter()
            .filter(|m| m.strong_count() > 0)
            .count()
    }

    pub(super) fn add_member(&self, process: &Arc<Process>) {
        let mut members = self.members.lock();
        members.retain(|m| m.strong_count() > 0);
        members.push(Arc::downgrade(process));
    }

    pub(super) fn remove_member(&self, pid: ProcessId) {
        self.members
            .lock()
            .retain(|m| m.upgrade().map_or(false, |p| p.pid() != pid));
    }
}

impl core::fmt::Debug for ProcessGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProcessGroup")
            .field("pgid", &self.pgid.as_u64())
            .field("sid", &self.session.sid().as_u64())
            .finish()
    }
}
