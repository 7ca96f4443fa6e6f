//! Sessions
//!
//! A session is a collection of process groups sharing one controlling
//! terminal. The terminal layer uses it to resolve a numeric pgid and to
//! refuse foreground changes that cross session boundaries.

use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use spin::Mutex;

use super::group::ProcessGroup;
use super::process::ProcessId;

pub struct Session {
    sid: ProcessId,
    groups: Mutex<Vec<Weak<ProcessGroup>>>,
}

impl Session {
    pub fn new(sid: ProcessId) -> Arc<Self> {
        Arc::new(Self {
            sid,
            groups: Mutex::new(Vec::new()),
        })
    }

    pub fn sid(&self) -> ProcessId {
        self.sid
    }

    /// Look up a live process group of this session by id
    pub fn find_group(&self, pgid: ProcessId) -> Option<Arc<ProcessGroup>> {
        self.groups
            .lock()
            .iter()
            .filter_map(|g| g.upgrade())
            .find(|g| g.pgid() == pgid)
    }

    pub(super) fn add_group(&self, group: &Arc<ProcessGroup>) {
        let mut groups = self.groups.lock();
        groups.retain(|g| g.strong_count() > 0);
        groups.push(Arc::downgrade(group));
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session").field("sid", &self.sid.as_u64()).finish()
    }
}
