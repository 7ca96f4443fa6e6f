//! Output sinks for a TTY
//!
//! A TTY writes in two directions: completed input toward the application
//! ("slave" side) and echo/output toward the physical device ("master"
//! side). Each direction is a [`TtyIo`] supplied by whichever driver
//! creates the TTY, so the same engine can sit under a console, a
//! pseudo-terminal pair or a loopback used in tests.

/// Byte sink with a single capability: accept a buffer
pub trait TtyIo: Send + Sync {
    /// Write `buf`, returning the number of bytes consumed or an errno
    ///
    /// A zero-length write is an end-of-file marker (canonical EOF on an
    /// empty line). Sinks that have no use for it return `Ok(0)`.
    fn write(&self, buf: &[u8]) -> Result<usize, i32>;

    /// Bytes the next write is guaranteed to accept, if the sink is bounded
    ///
    /// Queried with the tty lock held, so it must not block or call back
    /// into the tty. Unbounded sinks keep the default.
    fn room(&self) -> Option<usize> {
        None
    }
}

impl<F> TtyIo for F
where
    F: Fn(&[u8]) -> Result<usize, i32> + Send + Sync,
{
    fn write(&self, buf: &[u8]) -> Result<usize, i32> {
        self(buf)
    }
}

/// Sink that accepts and discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TtyIo for NullSink {
    fn write(&self, buf: &[u8]) -> Result<usize, i32> {
        Ok(buf.len())
    }
}
