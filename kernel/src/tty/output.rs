//! Output post-processing (c_oflag)
//!
//! Translates one byte written by the application into the bytes that
//! reach the device, tracking the output column for ONOCR.

use super::termios::Termios;

/// Bytes produced for one output byte (at most two)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opost {
    buf: [u8; 2],
    len: usize,
}

impl Opost {
    const fn none() -> Self {
        Self { buf: [0; 2], len: 0 }
    }

    const fn one(c: u8) -> Self {
        Self { buf: [c, 0], len: 1 }
    }

    const fn two(a: u8, b: u8) -> Self {
        Self { buf: [a, b], len: 2 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Apply the output flags of `termios` to `c`
///
/// Callers check OPOST first; this only looks at the individual mapping
/// flags. CR handling tests OCRNL before ONOCR.
pub fn opost(termios: &Termios, column: &mut usize, c: u8) -> Opost {
    match c {
        b'\n' if termios.is_onlcr() => {
            *column = 0;
            Opost::two(b'\r', b'\n')
        }
        b'\n' => {
            if termios.is_onlret() {
                *column = 0;
            }
            Opost::one(b'\n')
        }
        b'\r' if termios.is_ocrnl() => {
            if termios.is_onlret() {
                *column = 0;
            }
            Opost::one(b'\n')
        }
        b'\r' if termios.is_onocr() && *column == 0 => Opost::none(),
        b'\r' => {
            *column = 0;
            Opost::one(b'\r')
        }
        b'\t' => {
            *column = (*column | 7) + 1;
            Opost::one(c)
        }
        0x08 => {
            *column = column.saturating_sub(1);
            Opost::one(c)
        }
        _ => {
            if (0x20..0x7F).contains(&c) {
                *column += 1;
            }
            Opost::one(c)
        }
    }
}
