//! PTY (Pseudo-Terminal) subsystem
//!
//! Numbered master/slave pairs, each backed by one [`crate::tty::Tty`].

pub mod pair;

pub use pair::{PtyBuffer, PtyPair};

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use conquer_once::spin::OnceCell;
use spin::Mutex;

use crate::errno::{ENOMEM, ENOSPC};
use crate::process::Process;

/// Maximum number of PTY pairs
pub const MAX_PTYS: u32 = 256;

/// Global PTY allocator
static PTY_ALLOCATOR: OnceCell<Mutex<PtyAllocator>> = OnceCell::uninit();

/// Table of live pairs; numbers are reused after release
pub struct PtyAllocator {
    max: u32,
    pairs: BTreeMap<u32, Arc<PtyPair>>,
}

impl PtyAllocator {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            pairs: BTreeMap::new(),
        }
    }

    /// Allocate the lowest free number
    pub fn allocate(&mut self, creator: &Process) -> Result<Arc<PtyPair>, i32> {
        let pty_num = (0..self.max)
            .find(|n| !self.pairs.contains_key(n))
            .ok_or(ENOSPC)?;

        let pair = Arc::new(PtyPair::new(pty_num, creator)?);
        self.pairs.insert(pty_num, pair.clone());
        log::info!("PTY{}: allocated by pid {}", pty_num, creator.pid().as_u64());
        Ok(pair)
    }

    pub fn get(&self, pty_num: u32) -> Option<Arc<PtyPair>> {
        self.pairs.get(&pty_num).cloned()
    }

    pub fn release(&mut self, pty_num: u32) -> Option<Arc<PtyPair>> {
        let pair = self.pairs.remove(&pty_num);
        if pair.is_some() {
            log::info!("PTY{}: released", pty_num);
        }
        pair
    }

    pub fn list_active(&self) -> Vec<u32> {
        self.pairs.keys().copied().collect()
    }
}

/// Initialize the PTY subsystem
pub fn init() {
    if PTY_ALLOCATOR
        .try_init_once(|| Mutex::new(PtyAllocator::new(MAX_PTYS)))
        .is_ok()
    {
        log::info!("PTY subsystem initialized");
    }
}

/// Allocate a new PTY pair
pub fn allocate(creator: &Process) -> Result<Arc<PtyPair>, i32> {
    PTY_ALLOCATOR
        .try_get()
        .map_err(|_| ENOMEM)?
        .lock()
        .allocate(creator)
}

/// Get an existing PTY pair by number
pub fn get(pty_num: u32) -> Option<Arc<PtyPair>> {
    PTY_ALLOCATOR.try_get().ok()?.lock().get(pty_num)
}

/// Release a PTY pair
///
/// The pair is destroyed once the last outstanding reference is dropped.
pub fn release(pty_num: u32) {
    if let Ok(alloc) = PTY_ALLOCATOR.try_get() {
        alloc.lock().release(pty_num);
    }
}

/// List all active (allocated) PTY numbers
pub fn list_active() -> Vec<u32> {
    match PTY_ALLOCATOR.try_get() {
        Ok(alloc) => alloc.lock().list_active(),
        Err(_) => Vec::new(),
    }
}
