//! TTY ioctl request codes and handlers
//!
//! This module implements ioctl operations for TTY devices, including:
//! - TCGETS/TCSETS*: Get/set terminal attributes (termios)
//! - TIOCGPGRP/TIOCSPGRP: Get/set foreground process group
//! - TIOCGWINSZ/TIOCSWINSZ: Get/set window size
//! - TCFLSH/FIONREAD: Input queue control
//!
//! The argument is the caller's buffer, already copied in from (and later
//! copied back out to) user memory. Records use the Linux layout in native
//! byte order. A buffer shorter than the record is EFAULT.

use super::device::Tty;
use super::termios::{Termios, TERMIOS_SIZE};
use crate::errno::{EFAULT, EINVAL, EOPNOTSUPP};
use crate::process::Process;

// =============================================================================
// ioctl Request Codes (matching Linux values)
// =============================================================================

/// Get termios structure
pub const TCGETS: u64 = 0x5401;

/// Set termios structure immediately
pub const TCSETS: u64 = 0x5402;

/// Set termios structure after draining output
pub const TCSETSW: u64 = 0x5403;

/// Set termios structure after flushing input and draining output
pub const TCSETSF: u64 = 0x5404;

/// Send a break
pub const TCSBRK: u64 = 0x5409;

/// Suspend or restart output
pub const TCXONC: u64 = 0x540A;

/// Flush queued input and/or output
pub const TCFLSH: u64 = 0x540B;

/// Get foreground process group
pub const TIOCGPGRP: u64 = 0x540F;

/// Set foreground process group
pub const TIOCSPGRP: u64 = 0x5410;

/// Get window size
pub const TIOCGWINSZ: u64 = 0x5413;

/// Set window size
pub const TIOCSWINSZ: u64 = 0x5414;

/// Bytes available to read
pub const FIONREAD: u64 = 0x541B;

/// TCFLSH selectors
pub const TCIFLUSH: i32 = 0;
pub const TCOFLUSH: i32 = 1;
pub const TCIOFLUSH: i32 = 2;

// =============================================================================
// Window Size Structure
// =============================================================================

/// Size of a serialized [`Winsize`]
pub const WINSIZE_SIZE: usize = 8;

/// Terminal window size
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Winsize {
    /// Number of rows
    pub ws_row: u16,
    /// Number of columns
    pub ws_col: u16,
    /// Horizontal size in pixels
    pub ws_xpixel: u16,
    /// Vertical size in pixels
    pub ws_ypixel: u16,
}

impl Winsize {
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self {
            ws_row: rows,
            ws_col: cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; WINSIZE_SIZE] {
        let mut out = [0u8; WINSIZE_SIZE];
        out[0..2].copy_from_slice(&self.ws_row.to_ne_bytes());
        out[2..4].copy_from_slice(&self.ws_col.to_ne_bytes());
        out[4..6].copy_from_slice(&self.ws_xpixel.to_ne_bytes());
        out[6..8].copy_from_slice(&self.ws_ypixel.to_ne_bytes());
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        let field = |at: usize| buf.get(at..at + 2).map(|b| u16::from_ne_bytes([b[0], b[1]]));
        Some(Self {
            ws_row: field(0)?,
            ws_col: field(2)?,
            ws_xpixel: field(4)?,
            ws_ypixel: field(6)?,
        })
    }
}

// =============================================================================
// Argument helpers
// =============================================================================

fn read_i32(arg: &[u8]) -> Result<i32, i32> {
    let bytes = arg.get(..4).ok_or(EFAULT)?;
    Ok(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn write_i32(arg: &mut [u8], value: i32) -> Result<(), i32> {
    arg.get_mut(..4)
        .ok_or(EFAULT)?
        .copy_from_slice(&value.to_ne_bytes());
    Ok(())
}

fn read_termios(arg: &[u8]) -> Result<Termios, i32> {
    Termios::from_bytes(arg).ok_or(EFAULT)
}

// =============================================================================
// ioctl Handler Functions
// =============================================================================

/// Handle TCGETS - get termios attributes
pub fn handle_tcgets(tty: &Tty, arg: &mut [u8]) -> Result<(), i32> {
    let out = arg.get_mut(..TERMIOS_SIZE).ok_or(EFAULT)?;
    out.copy_from_slice(&tty.termios().to_bytes());
    Ok(())
}

/// Handle TCSETS - set termios attributes immediately
pub fn handle_tcsets(tty: &Tty, arg: &[u8]) -> Result<(), i32> {
    let termios = read_termios(arg)?;
    tty.set_termios(&termios);
    log::debug!(
        "TTY: TCSETS applied - iflag={:#x} oflag={:#x} lflag={:#x}",
        termios.c_iflag,
        termios.c_oflag,
        termios.c_lflag
    );
    Ok(())
}

/// Handle TCSETSW - set termios after draining output
///
/// Output is never queued, so there is nothing to drain.
pub fn handle_tcsetsw(tty: &Tty, arg: &[u8]) -> Result<(), i32> {
    handle_tcsets(tty, arg)
}

/// Handle TCSETSF - discard the pending line, then set termios
pub fn handle_tcsetsf(tty: &Tty, arg: &[u8]) -> Result<(), i32> {
    let termios = read_termios(arg)?;
    tty.set_termios_flush(&termios);
    log::debug!("TTY: TCSETSF applied - lflag={:#x}", termios.c_lflag);
    Ok(())
}

/// Handle TCFLSH - discard queued input
///
/// Only the cook buffer is queued; TCOFLUSH is accepted and does nothing.
pub fn handle_tcflsh(tty: &Tty, arg: &[u8]) -> Result<(), i32> {
    match read_i32(arg)? {
        TCIFLUSH | TCIOFLUSH => {
            tty.flush_input();
            Ok(())
        }
        TCOFLUSH => Ok(()),
        _ => Err(EINVAL),
    }
}

/// Handle TIOCGPGRP - get foreground process group
///
/// Reports 0 when the foreground group has exited, and `EINVAL` when its
/// id does not fit the 32-bit field.
pub fn handle_tiocgpgrp(tty: &Tty, arg: &mut [u8]) -> Result<(), i32> {
    let pgrp = match tty.foreground_pgrp() {
        Some(pgid) => i32::try_from(pgid.as_u64()).map_err(|_| EINVAL)?,
        None => 0,
    };
    write_i32(arg, pgrp)
}

/// Handle TIOCSPGRP - set foreground process group
pub fn handle_tiocspgrp(tty: &Tty, caller: &Process, arg: &[u8]) -> Result<(), i32> {
    let pgrp = read_i32(arg)?;
    tty.set_foreground_pgrp(caller, pgrp)
}

/// Handle TIOCGWINSZ - get window size
pub fn handle_tiocgwinsz(tty: &Tty, arg: &mut [u8]) -> Result<(), i32> {
    let out = arg.get_mut(..WINSIZE_SIZE).ok_or(EFAULT)?;
    out.copy_from_slice(&tty.winsize().to_bytes());
    Ok(())
}

/// Handle TIOCSWINSZ - set window size
pub fn handle_tiocswinsz(tty: &Tty, caller: &Process, arg: &[u8]) -> Result<(), i32> {
    let winsize = Winsize::from_bytes(arg).ok_or(EFAULT)?;
    if tty.set_winsize(caller, &winsize) {
        log::debug!("TTY: window resized to {}x{}", winsize.ws_col, winsize.ws_row);
    }
    Ok(())
}

/// Handle FIONREAD - bytes waiting in the cook buffer
pub fn handle_fionread(tty: &Tty, arg: &mut [u8]) -> Result<(), i32> {
    let pending = i32::try_from(tty.pending_len()).unwrap_or(i32::MAX);
    write_i32(arg, pending)
}

/// Dispatch a TTY ioctl request to the appropriate handler
///
/// # Arguments
/// * `tty` - The TTY device
/// * `caller` - Process issuing the request
/// * `request` - The ioctl request code
/// * `arg` - The argument buffer
///
/// # Returns
/// * `Ok(0)` on success
/// * `Err(errno)` on failure; unknown requests are `EINVAL`
pub fn tty_ioctl(tty: &Tty, caller: &Process, request: u64, arg: &mut [u8]) -> Result<i32, i32> {
    log::debug!(
        "TTY: ioctl {:#x} from pid {} ({} byte arg)",
        request,
        caller.pid().as_u64(),
        arg.len()
    );

    match request {
        TCGETS => handle_tcgets(tty, arg)?,
        TCSETS => handle_tcsets(tty, arg)?,
        TCSETSW => handle_tcsetsw(tty, arg)?,
        TCSETSF => handle_tcsetsf(tty, arg)?,
        TCFLSH => handle_tcflsh(tty, arg)?,
        TIOCGPGRP => handle_tiocgpgrp(tty, arg)?,
        TIOCSPGRP => handle_tiocspgrp(tty, caller, arg)?,
        TIOCGWINSZ => handle_tiocgwinsz(tty, arg)?,
        TIOCSWINSZ => handle_tiocswinsz(tty, caller, arg)?,
        FIONREAD => handle_fionread(tty, arg)?,
        TCSBRK | TCXONC => {
            log::warn!("TTY: unsupported ioctl request {:#x}", request);
            return Err(EOPNOTSUPP);
        }
        _ => {
            log::warn!("TTY: unknown ioctl request {:#x}", request);
            return Err(EINVAL);
        }
    }

    Ok(0)
}
