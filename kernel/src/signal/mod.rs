//! Signal posting for terminal job control
//!
//! The tty layer only ever *generates* signals; delivery to userspace
//! handlers belongs to the process subsystem. This module provides:
//! - Signal constants (SIGINT, SIGQUIT, SIGTSTP, SIGWINCH)
//! - A per-process pending set that can be posted to without a lock
//! - Process-group posting with the fixed process -> group lock order

pub mod constants;

use core::sync::atomic::{AtomicU64, Ordering};

use crate::process::{Process, ProcessGroup};
use constants::{is_valid_signal, sig_mask, signal_name};

/// Pending signal set for one process
///
/// Standard signals do not queue: posting an already-pending signal leaves
/// the mask unchanged. `posted` counts every post so callers can observe
/// each occurrence.
#[derive(Debug, Default)]
pub struct PendingSignals {
    pending: AtomicU64,
    posted: AtomicU64,
}

impl PendingSignals {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU64::new(0),
            posted: AtomicU64::new(0),
        }
    }

    /// Mark a signal as pending
    #[inline]
    pub fn set_pending(&self, sig: u32) {
        if is_valid_signal(sig) {
            self.pending.fetch_or(sig_mask(sig), Ordering::AcqRel);
            self.posted.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Check if a signal is pending
    #[inline]
    pub fn is_pending(&self, sig: u32) -> bool {
        (self.pending.load(Ordering::Acquire) & sig_mask(sig)) != 0
    }

    /// Clear a pending signal, returning whether it was set
    pub fn take(&self, sig: u32) -> bool {
        let mask = sig_mask(sig);
        (self.pending.fetch_and(!mask, Ordering::AcqRel) & mask) != 0
    }

    /// Raw pending mask
    #[inline]
    pub fn mask(&self) -> u64 {
        self.pending.load(Ordering::Acquire)
    }

    /// Total number of signals posted to this process
    #[inline]
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Acquire)
    }
}

/// Post `sig` to every live member of `pgrp`
///
/// Takes the caller's process lock, then the group lock. Every path that
/// needs both must take them in this order. Members are marked through
/// their atomic pending set, so no member process lock is taken and the
/// caller may itself belong to `pgrp`.
///
/// Returns the number of processes the signal was posted to.
pub fn signal_pgrp_send(caller: &Process, pgrp: &ProcessGroup, sig: u32) -> usize {
    let proc_guard = caller.lock();
    let members = pgrp.lock();

    let mut count = 0;
    for member in members.iter().filter_map(|m| m.upgrade()) {
        member.signals.set_pending(sig);
        count += 1;
    }

    drop(proc_guard);
    drop(members);

    log::debug!(
        "signal: {} posted to {} member(s) of pgrp {} by pid {}",
        signal_name(sig),
        count,
        pgrp.pgid().as_u64(),
        caller.pid().as_u64()
    );

    count
}
