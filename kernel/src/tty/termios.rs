//! POSIX termios structure and constants
//!
//! This module provides the terminal I/O mode record: input, output and
//! local flags plus the control-character table. Flag bits and `c_cc`
//! indices use the Linux values, and the record encodes to the 60-byte
//! `struct termios` layout userspace expects from TCGETS/TCSETS.

use core::default::Default;

/// Number of control characters in the c_cc array
pub const NCCS: usize = 32;

/// Size in bytes of the encoded record (`#[repr(C)]` layout, padding included)
pub const TERMIOS_SIZE: usize = 60;

/// A `c_cc` entry holding this value is disabled and matches no input byte
pub const POSIX_VDISABLE: u8 = 0;

// =============================================================================
// Input Flags (c_iflag)
// =============================================================================

/// Enable input parity checking
pub const INPCK: u32 = 0o000020;

/// Strip character to 7 bits
pub const ISTRIP: u32 = 0o000040;

/// Map NL to CR on input
pub const INLCR: u32 = 0o000100;

/// Ignore CR on input
pub const IGNCR: u32 = 0o000200;

/// Map CR to NL on input (unless IGNCR is set)
pub const ICRNL: u32 = 0o000400;

/// Enable XON/XOFF flow control on output
pub const IXON: u32 = 0o002000;

/// Any character will restart after stop
pub const IXANY: u32 = 0o004000;

/// Enable XON/XOFF flow control on input
pub const IXOFF: u32 = 0o010000;

// =============================================================================
// Output Flags (c_oflag)
// =============================================================================

/// Enable output processing
pub const OPOST: u32 = 0o000001;

/// Map NL to CR-NL on output
pub const ONLCR: u32 = 0o000004;

/// Map CR to NL on output
pub const OCRNL: u32 = 0o000010;

/// Don't output CR at column 0
pub const ONOCR: u32 = 0o000020;

/// NL performs the CR function
pub const ONLRET: u32 = 0o000040;

// =============================================================================
// Local Flags (c_lflag)
// =============================================================================

/// Enable signals (INTR, QUIT, SUSP)
pub const ISIG: u32 = 0o000001;

/// Canonical mode (line-by-line input)
pub const ICANON: u32 = 0o000002;

/// Enable echo
pub const ECHO: u32 = 0o000010;

/// Echo ERASE as backspace-space-backspace
pub const ECHOE: u32 = 0o000020;

/// Echo a newline after KILL
pub const ECHOK: u32 = 0o000040;

/// Echo NL even if ECHO is not set
pub const ECHONL: u32 = 0o000100;

/// Enable implementation-defined input processing
pub const IEXTEN: u32 = 0o100000;

// =============================================================================
// Control Character Indices (c_cc)
// =============================================================================

/// Interrupt character (SIGINT) - typically Ctrl+C
pub const VINTR: usize = 0;

/// Quit character (SIGQUIT) - typically Ctrl+\
pub const VQUIT: usize = 1;

/// Erase character - typically Ctrl+H
pub const VERASE: usize = 2;

/// Kill line character - typically Ctrl+U
pub const VKILL: usize = 3;

/// End of file character - typically Ctrl+D
pub const VEOF: usize = 4;

/// Timeout in deciseconds for non-canonical read
pub const VTIME: usize = 5;

/// Minimum number of characters for non-canonical read
pub const VMIN: usize = 6;

/// Start character for XON/XOFF - typically Ctrl+Q
pub const VSTART: usize = 8;

/// Stop character for XON/XOFF - typically Ctrl+S
pub const VSTOP: usize = 9;

/// Suspend character (SIGTSTP) - typically Ctrl+Z
pub const VSUSP: usize = 10;

/// Additional end-of-line character
pub const VEOL: usize = 11;

// =============================================================================
// Default Control Character Values
// =============================================================================

/// Control-key value for an ASCII letter or symbol, e.g. `ctrl(b'C') == 0x03`
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1F
}

// =============================================================================
// Termios Structure
// =============================================================================

/// Terminal I/O settings structure
///
/// This structure contains all the configuration for a terminal device,
/// laid out like the Linux `struct termios`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Termios {
    /// Input mode flags
    pub c_iflag: u32,

    /// Output mode flags
    pub c_oflag: u32,

    /// Control mode flags
    pub c_cflag: u32,

    /// Local mode flags
    pub c_lflag: u32,

    /// Line discipline (typically 0 for N_TTY)
    pub c_line: u8,

    /// Control characters array
    pub c_cc: [u8; NCCS],

    /// Input baud rate
    pub c_ispeed: u32,

    /// Output baud rate
    pub c_ospeed: u32,
}

impl Default for Termios {
    /// Create termios with the session defaults
    ///
    /// - CR mapped to NL on input, XON/XOFF start recognised
    /// - Output processing on, NL mapped to CR-NL
    /// - Signals, canonical mode, echo, echo-erase and echo-kill
    /// - VMIN=1, VTIME=0 and the conventional control characters
    fn default() -> Self {
        let mut c_cc = [0u8; NCCS];

        c_cc[VMIN] = 1;
        c_cc[VTIME] = 0;
        c_cc[VEOF] = ctrl(b'D');
        c_cc[VEOL] = ctrl(b'L');
        c_cc[VINTR] = ctrl(b'C');
        c_cc[VKILL] = ctrl(b'U');
        c_cc[VSUSP] = ctrl(b'Z');
        c_cc[VERASE] = ctrl(b'H');
        c_cc[VSTART] = ctrl(b'Q');
        c_cc[VQUIT] = ctrl(b'\\');

        Self {
            c_iflag: ICRNL | IXON,
            c_oflag: OPOST | ONLCR,
            c_cflag: 0,
            c_lflag: ISIG | ICANON | ECHO | ECHOE | ECHOK,
            c_line: 0,
            c_cc,
            // Not really relevant for virtual terminals
            c_ispeed: 38400,
            c_ospeed: 38400,
        }
    }
}

impl Termios {
    /// Create a new termios with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode to the native `struct termios` byte layout
    ///
    /// Offsets: flags at 0/4/8/12, `c_line` at 16, `c_cc` at 17..49,
    /// three padding bytes, speeds at 52 and 56. Padding is always written
    /// as zero and ignored by [`Termios::from_bytes`], so a decoded record
    /// re-encodes byte-identically except for those three bytes.
    pub fn to_bytes(&self) -> [u8; TERMIOS_SIZE] {
        let mut out = [0u8; TERMIOS_SIZE];
        out[0..4].copy_from_slice(&self.c_iflag.to_ne_bytes());
        out[4..8].copy_from_slice(&self.c_oflag.to_ne_bytes());
        out[8..12].copy_from_slice(&self.c_cflag.to_ne_bytes());
        out[12..16].copy_from_slice(&self.c_lflag.to_ne_bytes());
        out[16] = self.c_line;
        out[17..17 + NCCS].copy_from_slice(&self.c_cc);
        out[52..56].copy_from_slice(&self.c_ispeed.to_ne_bytes());
        out[56..60].copy_from_slice(&self.c_ospeed.to_ne_bytes());
        out
    }

    /// Decode from the native `struct termios` byte layout
    ///
    /// Returns `None` if `bytes` is shorter than [`TERMIOS_SIZE`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < TERMIOS_SIZE {
            return None;
        }
        let word = |at: usize| u32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        let mut c_cc = [0u8; NCCS];
        c_cc.copy_from_slice(&bytes[17..17 + NCCS]);

        Some(Self {
            c_iflag: word(0),
            c_oflag: word(4),
            c_cflag: word(8),
            c_lflag: word(12),
            c_line: bytes[16],
            c_cc,
            c_ispeed: word(52),
            c_ospeed: word(56),
        })
    }

    /// Check if canonical (line) mode is enabled
    ///
    /// In canonical mode, input is processed line-by-line and line editing
    /// characters (ERASE, KILL, etc.) are interpreted.
    #[inline]
    pub fn is_canonical(&self) -> bool {
        (self.c_lflag & ICANON) != 0
    }

    /// Set or clear canonical (line) mode
    #[inline]
    pub fn set_canonical(&mut self, enable: bool) {
        if enable {
            self.c_lflag |= ICANON;
        } else {
            self.c_lflag &= !ICANON;
        }
    }

    /// Check if echo is enabled
    #[inline]
    pub fn is_echo(&self) -> bool {
        (self.c_lflag & ECHO) != 0
    }

    #[inline]
    pub fn is_echoe(&self) -> bool {
        (self.c_lflag & ECHOE) != 0
    }

    #[inline]
    pub fn is_echok(&self) -> bool {
        (self.c_lflag & ECHOK) != 0
    }

    #[inline]
    pub fn is_echonl(&self) -> bool {
        (self.c_lflag & ECHONL) != 0
    }

    /// Check if signal generation is enabled
    ///
    /// When enabled, control characters like Ctrl+C generate signals
    /// (SIGINT, SIGQUIT, SIGTSTP).
    #[inline]
    pub fn is_sig(&self) -> bool {
        (self.c_lflag & ISIG) != 0
    }

    /// Check if output processing is enabled
    #[inline]
    pub fn is_opost(&self) -> bool {
        (self.c_oflag & OPOST) != 0
    }

    /// Check if NL should be mapped to CR-NL on output
    #[inline]
    pub fn is_onlcr(&self) -> bool {
        (self.c_oflag & ONLCR) != 0
    }

    #[inline]
    pub fn is_ocrnl(&self) -> bool {
        (self.c_oflag & OCRNL) != 0
    }

    #[inline]
    pub fn is_onocr(&self) -> bool {
        (self.c_oflag & ONOCR) != 0
    }

    #[inline]
    pub fn is_onlret(&self) -> bool {
        (self.c_oflag & ONLRET) != 0
    }

    /// Check if CR should be mapped to NL on input
    #[inline]
    pub fn is_icrnl(&self) -> bool {
        (self.c_iflag & ICRNL) != 0
    }

    #[inline]
    pub fn is_igncr(&self) -> bool {
        (self.c_iflag & IGNCR) != 0
    }

    #[inline]
    pub fn is_inlcr(&self) -> bool {
        (self.c_iflag & INLCR) != 0
    }

    #[inline]
    pub fn is_istrip(&self) -> bool {
        (self.c_iflag & ISTRIP) != 0
    }

    /// Check if XON/XOFF output flow control is enabled
    #[inline]
    pub fn is_ixon(&self) -> bool {
        (self.c_iflag & IXON) != 0
    }

    /// Get the interrupt character (usually Ctrl+C)
    #[inline]
    pub fn intr_char(&self) -> u8 {
        self.c_cc[VINTR]
    }

    /// Get the quit character (usually Ctrl+\)
    #[inline]
    pub fn quit_char(&self) -> u8 {
        self.c_cc[VQUIT]
    }

    /// Get the suspend character (usually Ctrl+Z)
    #[inline]
    pub fn susp_char(&self) -> u8 {
        self.c_cc[VSUSP]
    }

    /// Get the EOF character (usually Ctrl+D)
    #[inline]
    pub fn eof_char(&self) -> u8 {
        self.c_cc[VEOF]
    }

    /// Get the additional end-of-line character
    #[inline]
    pub fn eol_char(&self) -> u8 {
        self.c_cc[VEOL]
    }

    /// Get the erase character (usually Ctrl+H)
    #[inline]
    pub fn erase_char(&self) -> u8 {
        self.c_cc[VERASE]
    }

    /// Get the kill (line erase) character (usually Ctrl+U)
    #[inline]
    pub fn kill_char(&self) -> u8 {
        self.c_cc[VKILL]
    }

    /// Get the start (XON) character (usually Ctrl+Q)
    #[inline]
    pub fn start_char(&self) -> u8 {
        self.c_cc[VSTART]
    }

    /// Get the VMIN value (minimum characters for non-canonical read)
    #[inline]
    pub fn vmin(&self) -> u8 {
        self.c_cc[VMIN]
    }

    /// Get the VTIME value (timeout in deciseconds for non-canonical read)
    #[inline]
    pub fn vtime(&self) -> u8 {
        self.c_cc[VTIME]
    }

    /// True if `c` is the byte currently assigned to control slot `index`
    ///
    /// A disabled slot (`POSIX_VDISABLE`) never matches.
    #[inline]
    pub fn matches(&self, index: usize, c: u8) -> bool {
        let cc = self.c_cc[index];
        cc != POSIX_VDISABLE && cc == c
    }

    /// Set raw mode (disable canonical processing, echo, and signals)
    ///
    /// This is commonly used by applications that want to handle all
    /// input processing themselves (e.g., text editors, shells with
    /// line editing).
    pub fn set_raw(&mut self) {
        self.c_lflag &= !(ICANON | ECHO | ECHOE | ECHOK | ECHONL | ISIG | IEXTEN);
        self.c_iflag &= !(INPCK | ISTRIP | INLCR | IGNCR | ICRNL | IXON | IXANY | IXOFF);

        // Character-at-a-time input
        self.c_cc[VMIN] = 1;
        self.c_cc[VTIME] = 0;
    }

    /// Reset to cooked (default) mode
    pub fn set_cooked(&mut self) {
        *self = Self::default();
    }
}
