//! Process model used by the terminal layer
//!
//! Processes, process groups and sessions carry only what job control
//! needs: identity, group/session membership, the process and group locks,
//! and a pending-signal set. Creation, scheduling and teardown of real
//! processes happen elsewhere; this is the surface the tty talks to.

pub mod group;
pub mod process;
pub mod session;

pub use group::ProcessGroup;
pub use process::{Process, ProcessId, ProcessLinks};
pub use session::Session;
