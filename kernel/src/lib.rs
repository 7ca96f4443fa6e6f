//! Terminal line discipline for a Unix-like kernel
//!
//! The [`tty`] module holds the engine: canonical line editing, echo,
//! output post-processing, the ioctl control surface and pseudo-terminal
//! pairs. [`process`] and [`signal`] provide the slice of job control the
//! engine needs to post signals to a foreground process group.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod errno;
pub mod process;
pub mod signal;
pub mod tty;

/// Initialize the TTY subsystem
pub fn init() {
    tty::init();
}
