//! TTY subsystem
//!
//! Provides POSIX terminal semantics including:
//! - Line discipline (canonical vs raw mode)
//! - Signal generation (SIGINT, SIGQUIT, SIGTSTP, SIGWINCH)
//! - Terminal attributes (termios) and window size
//! - Echo, line editing and output post-processing
//! - Pseudo-terminal pairs

pub mod device;
pub mod ioctl;
pub mod line_discipline;
pub mod output;
pub mod pty;
pub mod sink;
pub mod termios;

pub use device::{DriverData, Tty};
pub use ioctl::{tty_ioctl, Winsize};
pub use line_discipline::LineDiscipline;
pub use sink::{NullSink, TtyIo};
pub use termios::Termios;

/// Cook buffer capacity used when a driver asks for the default
pub const TTY_BUF_SIZE: usize = 4096;

/// Initial window geometry
pub const DEFAULT_ROWS: u16 = 24;
pub const DEFAULT_COLS: u16 = 80;

/// Initialize the TTY subsystem
pub fn init() {
    pty::init();
    log::info!("TTY subsystem initialized");
}
