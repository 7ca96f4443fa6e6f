//! TTY Line Discipline Implementation
//!
//! The line discipline holds the mode record and the cook buffer of one
//! terminal and decides what each input byte means. It implements:
//!
//! - **Canonical mode**: bytes accumulate in the cook buffer until a line
//!   terminator, with erase and kill editing
//! - **Signal characters**: INTR, QUIT and SUSP are reported to the caller,
//!   which delivers them to the foreground process group
//! - **Echo**: control bytes echo as `^X`, erase as backspace-space-backspace
//! - **Output column** tracking for the output path
//!
//! The line discipline never calls a sink and never takes another lock. It
//! reports what happened through [`InputEvent`] and the echo callback, and
//! the owning [`Tty`](super::Tty) performs the I/O once its lock is dropped.

use alloc::vec::Vec;

use super::output::{opost, Opost};
use super::termios::{Termios, VEOF, VEOL, VERASE, VINTR, VKILL, VQUIT, VSTART, VSUSP};
use crate::errno::ENOMEM;
use crate::signal::constants::{SIGINT, SIGQUIT, SIGTSTP};

/// Backspace, always accepted as erase in addition to VERASE
const BS: u8 = 0x08;

/// Echoed for ERASE to retract one column
pub const ERASE_ECHO: &[u8; 3] = b"\x08 \x08";

/// Classification of one canonical-mode input byte, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Eof,
    Eol,
    Erase,
    Interrupt,
    Kill,
    Quit,
    Start,
    Suspend,
    Newline,
    Literal,
}

/// Result of feeding one byte to the line discipline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The byte was absorbed (buffered, edited or ignored)
    Consumed,

    /// A signal character was typed; its echo has already been emitted
    Signal(u32),

    /// A line was completed and the cook buffer reset. An empty line is an
    /// end-of-file marker.
    Line(Vec<u8>),
}

/// Line discipline for TTY devices
pub struct LineDiscipline {
    /// Terminal attributes controlling behavior
    termios: Termios,

    /// Cook buffer. Its length is the fixed capacity; `pos` is the write
    /// position and stays below the capacity between calls.
    cook: Vec<u8>,
    pos: usize,

    /// Current output column, used by ONOCR
    column: usize,

    /// Literal bytes dropped because the cook buffer was full
    overruns: u64,
}

impl LineDiscipline {
    /// Create a line discipline with a cook buffer of `capacity` bytes
    ///
    /// Fails with `ENOMEM` if the buffer cannot be allocated.
    pub fn new(termios: Termios, capacity: usize) -> Result<Self, i32> {
        let capacity = capacity.max(1);
        let mut cook = Vec::new();
        cook.try_reserve_exact(capacity).map_err(|_| ENOMEM)?;
        cook.resize(capacity, 0);

        Ok(Self {
            termios,
            cook,
            pos: 0,
            column: 0,
            overruns: 0,
        })
    }

    /// Get a reference to the current termios settings
    pub fn termios(&self) -> &Termios {
        &self.termios
    }

    /// Get a mutable reference to the termios settings
    pub fn termios_mut(&mut self) -> &mut Termios {
        &mut self.termios
    }

    /// Set new termios settings
    pub fn set_termios(&mut self, termios: Termios) {
        self.termios = termios;
    }

    /// Bytes of the line being edited
    pub fn pending(&self) -> &[u8] {
        &self.cook[..self.pos]
    }

    /// Current cook buffer write position
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Cook buffer capacity
    pub fn capacity(&self) -> usize {
        self.cook.len()
    }

    /// Current output column
    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of input bytes dropped on a full cook buffer
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Discard the line being edited
    pub fn flush_input(&mut self) {
        self.cook[..self.pos].fill(0);
        self.pos = 0;
    }

    /// Put back a partial line that could not be delivered
    ///
    /// `line` replaces the cook buffer contents. It must fit below the
    /// reserved terminator slot, which holds for any prefix taken from a
    /// line this buffer produced.
    pub fn restore_line(&mut self, line: &[u8]) {
        let len = line.len().min(self.cook.len() - 1);
        self.flush_input();
        self.cook[..len].copy_from_slice(&line[..len]);
        self.pos = len;
    }

    /// Classify a canonical-mode byte against the control-character table
    ///
    /// Control characters are checked before newline handling. Signal
    /// characters only count while ISIG is set and START only while IXON is
    /// set; otherwise those bytes fall through to the later classes.
    pub fn classify(&self, c: u8) -> CharClass {
        let t = &self.termios;

        if t.matches(VEOF, c) {
            CharClass::Eof
        } else if t.matches(VEOL, c) {
            CharClass::Eol
        } else if t.matches(VERASE, c) || c == BS {
            CharClass::Erase
        } else if t.is_sig() && t.matches(VINTR, c) {
            CharClass::Interrupt
        } else if t.matches(VKILL, c) {
            CharClass::Kill
        } else if t.is_sig() && t.matches(VQUIT, c) {
            CharClass::Quit
        } else if t.is_ixon() && t.matches(VSTART, c) {
            CharClass::Start
        } else if t.is_sig() && t.matches(VSUSP, c) {
            CharClass::Suspend
        } else if c == b'\n' || (c == b'\r' && t.is_icrnl()) {
            CharClass::Newline
        } else {
            CharClass::Literal
        }
    }

    /// Process one canonical-mode input byte
    ///
    /// # Arguments
    /// * `c` - The input byte
    /// * `echo_fn` - Receives every echo byte, before output processing
    pub fn input_byte(&mut self, c: u8, echo_fn: &mut dyn FnMut(u8)) -> InputEvent {
        let c = if self.termios.is_istrip() { c & 0x7F } else { c };
        if c == b'\r' && self.termios.is_igncr() {
            return InputEvent::Consumed;
        }
        let c = if c == b'\n' && self.termios.is_inlcr() { b'\r' } else { c };

        let class = self.classify(c);
        log::trace!("ldisc: byte {:#04x} -> {:?} (pos {})", c, class, self.pos);

        match class {
            CharClass::Eof => {
                self.echo_char(c, echo_fn);
                InputEvent::Line(self.take_line())
            }
            CharClass::Eol => {
                self.push_terminator(c);
                self.echo_char(c, echo_fn);
                InputEvent::Line(self.take_line())
            }
            CharClass::Erase => {
                self.handle_erase(echo_fn);
                InputEvent::Consumed
            }
            CharClass::Interrupt => self.handle_signal(c, SIGINT, echo_fn),
            CharClass::Kill => {
                self.handle_kill(echo_fn);
                InputEvent::Consumed
            }
            CharClass::Quit => self.handle_signal(c, SIGQUIT, echo_fn),
            CharClass::Start => InputEvent::Consumed,
            CharClass::Suspend => self.handle_signal(c, SIGTSTP, echo_fn),
            CharClass::Newline => {
                self.push_terminator(b'\n');
                if self.termios.is_echo() || self.termios.is_echonl() {
                    echo_fn(b'\n');
                }
                InputEvent::Line(self.take_line())
            }
            CharClass::Literal => {
                if self.push_literal(c) {
                    self.echo_char(c, echo_fn);
                }
                InputEvent::Consumed
            }
        }
    }

    /// Run one output byte through the c_oflag mappings
    pub fn output_byte(&mut self, c: u8) -> Opost {
        opost(&self.termios, &mut self.column, c)
    }

    /// Handle ERASE character (VERASE or backspace)
    fn handle_erase(&mut self, echo_fn: &mut dyn FnMut(u8)) {
        if self.pos == 0 {
            return;
        }
        self.pos -= 1;
        self.cook[self.pos] = 0;

        if self.termios.is_echoe() {
            ERASE_ECHO.iter().for_each(|&b| echo_fn(b));
        }
    }

    /// Handle KILL character (Ctrl+U) - erase entire line
    fn handle_kill(&mut self, echo_fn: &mut dyn FnMut(u8)) {
        if self.pos == 0 {
            return;
        }

        if self.termios.is_echok() {
            echo_fn(b'\n');
        } else if self.termios.is_echoe() {
            for _ in 0..self.pos {
                ERASE_ECHO.iter().for_each(|&b| echo_fn(b));
            }
        }

        self.flush_input();
    }

    /// Echo `^X` and a newline for a signal character, then report it
    ///
    /// This echo ignores ECHO: the user always sees the interrupt.
    fn handle_signal(&mut self, c: u8, sig: u32, echo_fn: &mut dyn FnMut(u8)) -> InputEvent {
        echo_visible(c, echo_fn);
        echo_fn(b'\n');
        InputEvent::Signal(sig)
    }

    /// Echo a byte if ECHO is set
    fn echo_char(&self, c: u8, echo_fn: &mut dyn FnMut(u8)) {
        if self.termios.is_echo() {
            echo_visible(c, echo_fn);
        }
    }

    /// Append a literal, keeping one slot free for the line terminator
    fn push_literal(&mut self, c: u8) -> bool {
        if self.pos + 1 < self.cook.len() {
            self.cook[self.pos] = c;
            self.pos += 1;
            true
        } else {
            self.overruns += 1;
            log::warn!(
                "ldisc: cook buffer full ({} bytes), dropping {:#04x}",
                self.cook.len(),
                c
            );
            false
        }
    }

    /// Append a line terminator; the reserved slot guarantees room
    fn push_terminator(&mut self, c: u8) {
        self.cook[self.pos] = c;
        self.pos += 1;
    }

    /// Copy out the completed line and reset the write position
    fn take_line(&mut self) -> Vec<u8> {
        let line = self.cook[..self.pos].to_vec();
        self.flush_input();
        line
    }
}

/// Emit `c` the way a terminal shows it: control bytes as `^X`
fn echo_visible(c: u8, echo_fn: &mut dyn FnMut(u8)) {
    if c < b' ' {
        echo_fn(b'^');
        echo_fn(c + b'@');
    } else {
        echo_fn(c);
    }
}
