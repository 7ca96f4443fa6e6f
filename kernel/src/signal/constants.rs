//! Signal numbers and constants following Linux x86_64 conventions
//!
//! Only the signals a terminal can generate are named here.

pub const SIGINT: u32 = 2;
pub const SIGQUIT: u32 = 3;
pub const SIGTSTP: u32 = 20;
pub const SIGWINCH: u32 = 28;

/// Maximum signal number supported
pub const NSIG: u32 = 64;

/// Convert signal number to bit mask
///
/// Returns 0 for invalid signal numbers (0 or > NSIG)
#[inline]
pub const fn sig_mask(sig: u32) -> u64 {
    if sig == 0 || sig > NSIG {
        0
    } else {
        1u64 << (sig - 1)
    }
}

/// Check if a signal number is valid
#[inline]
pub const fn is_valid_signal(sig: u32) -> bool {
    sig > 0 && sig <= NSIG
}

/// Get signal name for debugging
pub fn signal_name(sig: u32) -> &'static str {
    match sig {
        SIGINT => "SIGINT",
        SIGQUIT => "SIGQUIT",
        SIGTSTP => "SIGTSTP",
        SIGWINCH => "SIGWINCH",
        _ => "UNKNOWN",
    }
}
