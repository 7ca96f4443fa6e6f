//! PTY pair (master/slave) implementation
//!
//! A pair is one [`Tty`] whose two sinks are in-memory queues: the
//! application sink feeds `master_to_slave` (read by the slave side) and the
//! device sink feeds `slave_to_master` (read by the master side).

use alloc::string::String;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};
use crossbeam_queue::ArrayQueue;

use crate::errno::EAGAIN;
use crate::process::Process;
use crate::tty::device::Tty;
use crate::tty::ioctl::tty_ioctl;
use crate::tty::sink::TtyIo;

/// Queue size for PTY data transfer
pub const PTY_BUFFER_SIZE: usize = 4096;

/// Byte queue between the two sides of a pair
pub struct PtyBuffer {
    data: ArrayQueue<u8>,
    /// Set by a zero-length write, cleared by the read that reports it
    eof: AtomicBool,
}

impl PtyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: ArrayQueue::new(capacity.max(1)),
            eof: AtomicBool::new(false),
        }
    }

    /// Read queued bytes
    ///
    /// An empty queue returns `Ok(0)` once after an end-of-file marker and
    /// `Err(EAGAIN)` otherwise.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, i32> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut read = 0;
        for byte in buf.iter_mut() {
            match self.data.pop() {
                Some(b) => {
                    *byte = b;
                    read += 1;
                }
                None => break,
            }
        }

        if read > 0 {
            return Ok(read);
        }
        if self.eof.swap(false, Ordering::AcqRel) {
            return Ok(0);
        }
        Err(EAGAIN)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn available(&self) -> usize {
        self.data.len()
    }
}

impl TtyIo for PtyBuffer {
    fn write(&self, buf: &[u8]) -> Result<usize, i32> {
        if buf.is_empty() {
            self.eof.store(true, Ordering::Release);
            return Ok(0);
        }

        let mut written = 0;
        for &byte in buf {
            if self.data.push(byte).is_err() {
                break; // Queue full
            }
            written += 1;
        }

        if written == 0 {
            return Err(EAGAIN);
        }
        Ok(written)
    }

    fn room(&self) -> Option<usize> {
        Some(self.data.capacity() - self.data.len())
    }
}

/// A PTY pair (master + slave)
pub struct PtyPair {
    /// PTY number (0, 1, 2, ...)
    pub pty_num: u32,

    /// Line discipline and job-control state shared by both sides
    tty: Tty,

    /// Data from master to slave (master writes, slave reads)
    master_to_slave: Arc<PtyBuffer>,

    /// Data from slave to master (slave writes and echo, master reads)
    slave_to_master: Arc<PtyBuffer>,

    /// Locked state (true until unlock() called)
    locked: AtomicBool,
}

impl PtyPair {
    /// Create a pair whose foreground group is `creator`'s group
    pub fn new(pty_num: u32, creator: &Process) -> Result<Self, i32> {
        let master_to_slave = Arc::new(PtyBuffer::new(PTY_BUFFER_SIZE));
        let slave_to_master = Arc::new(PtyBuffer::new(PTY_BUFFER_SIZE));

        let tty = Tty::new(
            creator,
            0,
            slave_to_master.clone(),
            master_to_slave.clone(),
            None,
        )?;

        Ok(Self {
            pty_num,
            tty,
            master_to_slave,
            slave_to_master,
            locked: AtomicBool::new(true), // Locked until unlockpt()
        })
    }

    /// Write keyboard input on the master side
    ///
    /// The tty completes at most one line per call, so the remainder is
    /// resubmitted until everything is consumed. If the slave queue fills
    /// after some progress, the bytes consumed so far are reported.
    pub fn master_write(&self, caller: &Process, data: &[u8]) -> Result<usize, i32> {
        let mut done = 0;
        while done < data.len() {
            match self.tty.master_write(caller, &data[done..]) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(errno) if done > 0 => {
                    log::debug!("PTY{}: master write stopped after {} bytes: errno {}", self.pty_num, done, errno);
                    break;
                }
                Err(errno) => return Err(errno),
            }
        }
        Ok(done)
    }

    /// Read data from master (slave output and echo)
    pub fn master_read(&self, buf: &mut [u8]) -> Result<usize, i32> {
        self.slave_to_master.read(buf)
    }

    /// Write application output on the slave side
    pub fn slave_write(&self, data: &[u8]) -> Result<usize, i32> {
        self.tty.slave_write(data)
    }

    /// Read input delivered to the slave side
    pub fn slave_read(&self, buf: &mut [u8]) -> Result<usize, i32> {
        self.master_to_slave.read(buf)
    }

    /// Terminal control request on either side
    pub fn ioctl(&self, caller: &Process, request: u64, arg: &mut [u8]) -> Result<i32, i32> {
        tty_ioctl(&self.tty, caller, request, arg)
    }

    pub fn tty(&self) -> &Tty {
        &self.tty
    }

    /// Bytes waiting for the master side
    pub fn master_available(&self) -> usize {
        self.slave_to_master.available()
    }

    /// Bytes waiting for the slave side
    pub fn slave_available(&self) -> usize {
        self.master_to_slave.available()
    }

    /// Check if PTY is unlocked (slave can be opened)
    pub fn is_unlocked(&self) -> bool {
        !self.locked.load(Ordering::SeqCst)
    }

    /// Unlock the PTY (called by unlockpt)
    pub fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    /// Get the slave device path
    pub fn slave_path(&self) -> String {
        alloc::format!("/dev/pts/{}", self.pty_num)
    }
}
