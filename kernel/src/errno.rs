//! POSIX errno values
//!
//! Error codes returned by the tty layer. Values match Linux so they can be
//! handed back to userspace unchanged.

/// Operation not permitted
pub const EPERM: i32 = 1;

/// I/O error
pub const EIO: i32 = 5;

/// Resource temporarily unavailable (would block)
pub const EAGAIN: i32 = 11;

/// Cannot allocate memory
pub const ENOMEM: i32 = 12;

/// Bad address
pub const EFAULT: i32 = 14;

/// Invalid argument
pub const EINVAL: i32 = 22;

/// Not a typewriter (inappropriate ioctl for device)
pub const ENOTTY: i32 = 25;

/// No space left on device
pub const ENOSPC: i32 = 28;

/// Operation not supported
pub const EOPNOTSUPP: i32 = 95;
