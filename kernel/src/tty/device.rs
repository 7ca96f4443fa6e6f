//! TTY device
//!
//! A [`Tty`] ties one line discipline to the two sinks its driver supplied
//! and to the job-control state of the session that created it. It
//! provides:
//!
//! - The input path (`master_write`): canonical editing or raw pass-through
//! - The output path (`slave_write`): c_oflag post-processing
//! - Signal delivery to the foreground process group
//! - Whole-record access to termios, window size and the foreground group
//!
//! All mutable state sits behind one lock. The lock is released before any
//! sink is called and before a signal is posted, so a sink may safely call
//! back into the tty and signal delivery can take the process and
//! process-group locks without nesting them inside it. The one exception is
//! `master_write`, which holds a separate input lock for the whole call: a
//! sink must not feed input back into the same tty.

use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::any::Any;
use spin::Mutex;

use super::ioctl::Winsize;
use super::line_discipline::{InputEvent, LineDiscipline};
use super::sink::TtyIo;
use super::termios::Termios;
use super::{DEFAULT_COLS, DEFAULT_ROWS, TTY_BUF_SIZE};
use crate::errno::{EAGAIN, EINVAL, EIO, ENOTTY, EPERM};
use crate::process::{Process, ProcessGroup, ProcessId, Session};
use crate::signal::constants::SIGWINCH;
use crate::signal::signal_pgrp_send;

/// Driver-private data attached to a tty at creation
pub type DriverData = Arc<dyn Any + Send + Sync>;

/// State guarded by the tty lock
struct TtyState {
    /// Mode record and cook buffer
    ldisc: LineDiscipline,

    /// Window geometry
    winsize: Winsize,

    /// Foreground process group. Not owned: the group may exit.
    foreground: Weak<ProcessGroup>,

    /// Session the tty was created in
    session: Weak<Session>,
}

/// One terminal instance
pub struct Tty {
    state: Mutex<TtyState>,

    /// Held for a whole `master_write` call. Taken before `state`, never
    /// while holding it.
    input: Mutex<()>,

    /// Toward the physical device (echo and processed output)
    master: Arc<dyn TtyIo>,

    /// Toward the application (completed lines, raw input)
    slave: Arc<dyn TtyIo>,

    driver_data: Option<DriverData>,
}

impl Tty {
    /// Create a tty with default modes
    ///
    /// # Arguments
    /// * `creator` - Process whose group becomes the foreground group
    /// * `buf_size` - Cook buffer capacity, or 0 for [`TTY_BUF_SIZE`]
    /// * `master` - Sink toward the physical device
    /// * `slave` - Sink toward the application
    /// * `driver_data` - Opaque driver context, returned by [`Tty::driver_data`]
    ///
    /// # Returns
    /// * `Err(ENOMEM)` - The cook buffer could not be allocated
    pub fn new(
        creator: &Process,
        buf_size: usize,
        master: Arc<dyn TtyIo>,
        slave: Arc<dyn TtyIo>,
        driver_data: Option<DriverData>,
    ) -> Result<Self, i32> {
        let buf_size = if buf_size == 0 { TTY_BUF_SIZE } else { buf_size };
        let ldisc = LineDiscipline::new(Termios::default(), buf_size)?;

        let pgroup = creator.pgroup();
        log::info!(
            "TTY: created (buf {} bytes, fg pgrp {}, by pid {})",
            buf_size,
            pgroup.pgid().as_u64(),
            creator.pid().as_u64()
        );

        Ok(Self {
            state: Mutex::new(TtyState {
                ldisc,
                winsize: Winsize::new(DEFAULT_ROWS, DEFAULT_COLS),
                foreground: Arc::downgrade(&pgroup),
                session: Arc::downgrade(pgroup.session()),
            }),
            input: Mutex::new(()),
            master,
            slave,
            driver_data,
        })
    }

    /// Tear the tty down, releasing the cook buffer
    ///
    /// Taking `self` by value means no other reference can observe the tty
    /// during or after destruction.
    pub fn destroy(self) {
        log::info!("TTY: destroyed");
        drop(self);
    }

    /// Feed bytes arriving from the keyboard side
    ///
    /// In raw mode the buffer goes to the application sink unchanged and its
    /// result is returned verbatim. In canonical mode bytes are edited into
    /// the cook buffer; when a line completes it is flushed to the
    /// application sink and the call returns the number of bytes consumed
    /// up to and including the terminator. The rest of `buf` is left for
    /// the caller to resubmit, so each call completes at most one line.
    ///
    /// Calls are serialized: a second writer waits until the first returns,
    /// so bytes of concurrent calls never mix in one line.
    ///
    /// If the application sink reports less room than the completed line,
    /// the line is put back without its terminator, nothing is echoed for
    /// the terminator, and the call returns the bytes consumed before it
    /// (`Err(EAGAIN)` if that is none). A sink that accepts only part of a
    /// line without announcing it fails the call with `EIO`.
    ///
    /// # Arguments
    /// * `caller` - Process on whose behalf input is fed (used for signal
    ///   delivery locking)
    /// * `buf` - Input bytes
    pub fn master_write(&self, caller: &Process, buf: &[u8]) -> Result<usize, i32> {
        let _input = self.input.lock();

        let canonical = self.state.lock().ldisc.termios().is_canonical();
        if !canonical {
            return self.slave.write(buf);
        }

        let mut echo = Vec::new();
        for (i, &c) in buf.iter().enumerate() {
            echo.clear();
            let event = {
                let mut state = self.state.lock();
                let before = state.ldisc.pos();
                let event = state.ldisc.input_byte(c, &mut |e| echo.push(e));

                if let InputEvent::Line(line) = &event {
                    if self.slave.room().is_some_and(|room| room < line.len()) {
                        state.ldisc.restore_line(&line[..before]);
                        drop(state);
                        log::debug!(
                            "TTY: application sink full, holding {} byte line",
                            line.len()
                        );
                        return if i > 0 { Ok(i) } else { Err(EAGAIN) };
                    }
                }
                event
            };

            match event {
                InputEvent::Consumed => self.echo(&echo),
                InputEvent::Signal(sig) => {
                    self.signal_foreground(caller, sig);
                    self.echo(&echo);
                }
                InputEvent::Line(line) => {
                    self.echo(&echo);
                    let written = self.slave.write(&line)?;
                    if written < line.len() {
                        log::warn!(
                            "TTY: application sink took {} of {} line bytes",
                            written,
                            line.len()
                        );
                        return Err(EIO);
                    }
                    return Ok(i + 1);
                }
            }
        }

        Ok(buf.len())
    }

    /// Write bytes produced by the application toward the device
    ///
    /// Returns the number of input bytes processed, which can be fewer than
    /// the bytes the device receives (NL may expand to CR NL).
    pub fn slave_write(&self, buf: &[u8]) -> Result<usize, i32> {
        let opost = self.state.lock().ldisc.termios().is_opost();
        if !opost {
            return self.master.write(buf);
        }

        for &c in buf {
            let out = self.state.lock().ldisc.output_byte(c);
            if !out.is_empty() {
                self.master.write(out.as_bytes())?;
            }
        }

        Ok(buf.len())
    }

    /// Echo through the output path; failures are logged and dropped
    fn echo(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if let Err(errno) = self.slave_write(bytes) {
            log::debug!("TTY: echo of {} byte(s) failed: errno {}", bytes.len(), errno);
        }
    }

    /// Send a signal to the foreground process group
    ///
    /// Returns the number of processes signalled (0 if the foreground group
    /// has exited).
    pub fn signal_foreground(&self, caller: &Process, sig: u32) -> usize {
        let foreground = self.state.lock().foreground.upgrade();

        match foreground {
            Some(pgrp) => signal_pgrp_send(caller, &pgrp, sig),
            None => {
                log::debug!("TTY: signal {} but no foreground pgrp", sig);
                0
            }
        }
    }

    /// Get the current termios settings
    pub fn termios(&self) -> Termios {
        *self.state.lock().ldisc.termios()
    }

    /// Replace the termios settings
    pub fn set_termios(&self, termios: &Termios) {
        self.state.lock().ldisc.set_termios(*termios);
    }

    /// Discard pending input, then replace the termios settings
    ///
    /// Both happen under one lock acquisition.
    pub fn set_termios_flush(&self, termios: &Termios) {
        let mut state = self.state.lock();
        state.ldisc.flush_input();
        state.ldisc.set_termios(*termios);
    }

    /// Discard the line being edited
    pub fn flush_input(&self) {
        self.state.lock().ldisc.flush_input();
    }

    /// Copy of the line being edited
    pub fn pending_input(&self) -> Vec<u8> {
        self.state.lock().ldisc.pending().to_vec()
    }

    /// Number of bytes in the cook buffer
    pub fn pending_len(&self) -> usize {
        self.state.lock().ldisc.pos()
    }

    /// Cook buffer capacity
    pub fn buffer_capacity(&self) -> usize {
        self.state.lock().ldisc.capacity()
    }

    /// Input bytes dropped because the cook buffer was full
    pub fn overruns(&self) -> u64 {
        self.state.lock().ldisc.overruns()
    }

    /// Get the window size
    pub fn winsize(&self) -> Winsize {
        self.state.lock().winsize
    }

    /// Set the window size
    ///
    /// SIGWINCH goes to the foreground group if the geometry changed.
    /// Returns whether it changed.
    pub fn set_winsize(&self, caller: &Process, winsize: &Winsize) -> bool {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.winsize != *winsize;
            state.winsize = *winsize;
            changed
        };

        if changed {
            self.signal_foreground(caller, SIGWINCH);
        }
        changed
    }

    /// Get the foreground process group id, if the group still exists
    pub fn foreground_pgrp(&self) -> Option<ProcessId> {
        self.state.lock().foreground.upgrade().map(|g| g.pgid())
    }

    /// Make `pgid` the foreground process group
    ///
    /// # Returns
    /// * `Err(EINVAL)` - `pgid` is negative
    /// * `Err(ENOTTY)` - `caller` is not in this tty's session
    /// * `Err(EPERM)` - no group `pgid` exists in this tty's session
    pub fn set_foreground_pgrp(&self, caller: &Process, pgid: i32) -> Result<(), i32> {
        if pgid < 0 {
            return Err(EINVAL);
        }

        let session = self.session().ok_or(ENOTTY)?;
        if !Arc::ptr_eq(&caller.session(), &session) {
            return Err(ENOTTY);
        }
        let group = session.find_group(ProcessId::new(pgid as u64)).ok_or(EPERM)?;
        self.set_foreground(caller, &group)
    }

    /// Make `group` the foreground process group
    ///
    /// Both `caller` and `group` must belong to the session the tty was
    /// created in.
    pub fn set_foreground(&self, caller: &Process, group: &Arc<ProcessGroup>) -> Result<(), i32> {
        let session = self.session().ok_or(ENOTTY)?;
        if !Arc::ptr_eq(&caller.session(), &session) {
            return Err(ENOTTY);
        }
        if !Arc::ptr_eq(group.session(), &session) {
            return Err(EPERM);
        }

        self.state.lock().foreground = Arc::downgrade(group);
        log::debug!(
            "TTY: foreground pgrp set to {} by pid {}",
            group.pgid().as_u64(),
            caller.pid().as_u64()
        );
        Ok(())
    }

    /// Session the tty belongs to, if it still exists
    pub fn session(&self) -> Option<Arc<Session>> {
        self.state.lock().session.upgrade()
    }

    /// Driver context supplied at creation
    pub fn driver_data(&self) -> Option<&DriverData> {
        self.driver_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errno::ENOMEM;
    use crate::signal::constants::{SIGINT, SIGQUIT, SIGTSTP};
    use crate::tty::sink::NullSink;
    use crate::tty::termios::{ECHO, ICANON, OPOST};

    /// Sink that records everything written to it
    #[derive(Default)]
    struct Capture {
        bytes: Mutex<Vec<u8>>,
        writes: Mutex<Vec<Vec<u8>>>,
    }

    impl Capture {
        fn bytes(&self) -> Vec<u8> {
            self.bytes.lock().clone()
        }

        fn writes(&self) -> Vec<Vec<u8>> {
            self.writes.lock().clone()
        }
    }

    impl TtyIo for Capture {
        fn write(&self, buf: &[u8]) -> Result<usize, i32> {
            self.bytes.lock().extend_from_slice(buf);
            self.writes.lock().push(buf.to_vec());
            Ok(buf.len())
        }
    }

    struct Fixture {
        _session: Arc<Session>,
        group: Arc<ProcessGroup>,
        shell: Arc<Process>,
        device: Arc<Capture>,
        app: Arc<Capture>,
        tty: Tty,
    }

    fn fixture() -> Fixture {
        let session = Session::new(ProcessId::new(1));
        let group = ProcessGroup::new(ProcessId::new(1), &session);
        let shell = Process::new(ProcessId::new(1), "sh", &group);
        let device = Arc::new(Capture::default());
        let app = Arc::new(Capture::default());
        let tty = Tty::new(&shell, 0, device.clone(), app.clone(), None).unwrap();
        Fixture {
            _session: session,
            group,
            shell,
            device,
            app,
            tty,
        }
    }

    #[test]
    fn test_new_applies_defaults() {
        let f = fixture();
        assert_eq!(f.tty.termios(), Termios::default());
        assert_eq!(f.tty.winsize(), Winsize::new(24, 80));
        assert_eq!(f.tty.buffer_capacity(), TTY_BUF_SIZE);
        assert_eq!(f.tty.foreground_pgrp(), Some(ProcessId::new(1)));
        assert_eq!(f.tty.pending_len(), 0);
        assert!(f.tty.driver_data().is_none());
    }

    #[test]
    fn test_new_honours_buffer_size() {
        let f = fixture();
        let tty = Tty::new(&f.shell, 16, Arc::new(NullSink), Arc::new(NullSink), None).unwrap();
        assert_eq!(tty.buffer_capacity(), 16);
    }

    #[test]
    fn test_new_out_of_memory() {
        let f = fixture();
        let result = Tty::new(&f.shell, usize::MAX, Arc::new(NullSink), Arc::new(NullSink), None);
        assert!(matches!(result, Err(ENOMEM)));
    }

    #[test]
    fn test_driver_data_round_trip() {
        let f = fixture();
        let data: DriverData = Arc::new(7u32);
        let tty = Tty::new(&f.shell, 0, Arc::new(NullSink), Arc::new(NullSink), Some(data)).unwrap();
        let stored = tty.driver_data().unwrap();
        assert_eq!(stored.downcast_ref::<u32>(), Some(&7));
        tty.destroy();
    }

    #[test]
    fn test_line_completion() {
        let f = fixture();
        assert_eq!(f.tty.master_write(&f.shell, b"hi\n"), Ok(3));
        assert_eq!(f.app.writes(), vec![b"hi\n".to_vec()]);
        assert_eq!(f.tty.pending_len(), 0);
    }

    #[test]
    fn test_partial_line_accumulates() {
        let f = fixture();
        assert_eq!(f.tty.master_write(&f.shell, b"ab"), Ok(2));
        assert_eq!(f.tty.master_write(&f.shell, b"cd"), Ok(2));
        assert!(f.app.writes().is_empty());
        assert_eq!(f.tty.pending_input(), b"abcd");
    }

    #[test]
    fn test_stops_after_first_line() {
        let f = fixture();
        assert_eq!(f.tty.master_write(&f.shell, b"one\ntwo\n"), Ok(4));
        assert_eq!(f.app.writes(), vec![b"one\n".to_vec()]);
        assert_eq!(f.tty.pending_len(), 0);

        assert_eq!(f.tty.master_write(&f.shell, b"two\n"), Ok(4));
        assert_eq!(f.app.writes().len(), 2);
    }

    #[test]
    fn test_echo_goes_through_output_processing() {
        let f = fixture();
        f.tty.master_write(&f.shell, b"hi\n").unwrap();
        // Default ONLCR turns the echoed NL into CR NL
        assert_eq!(f.device.bytes(), b"hi\r\n");
    }

    #[test]
    fn test_echo_without_output_processing() {
        let f = fixture();
        let mut termios = f.tty.termios();
        termios.c_oflag &= !OPOST;
        f.tty.set_termios(&termios);

        f.tty.master_write(&f.shell, b"hi\n").unwrap();
        assert_eq!(f.device.bytes(), b"hi\n");
    }

    #[test]
    fn test_no_echo() {
        let f = fixture();
        let mut termios = f.tty.termios();
        termios.c_lflag &= !ECHO;
        f.tty.set_termios(&termios);

        f.tty.master_write(&f.shell, b"pw\n").unwrap();
        assert!(f.device.bytes().is_empty());
        assert_eq!(f.app.bytes(), b"pw\n");
    }

    #[test]
    fn test_erase_then_complete() {
        let f = fixture();
        f.tty.master_write(&f.shell, b"ab").unwrap();
        f.tty.master_write(&f.shell, &[0x08]).unwrap();
        f.tty.master_write(&f.shell, b"c\n").unwrap();
        assert_eq!(f.app.writes(), vec![b"ac\n".to_vec()]);
        assert_eq!(f.device.bytes(), b"ab\x08 \x08c\r\n");
    }

    #[test]
    fn test_interrupt_signals_foreground() {
        let f = fixture();
        let member = Process::new(ProcessId::new(2), "cat", &f.group);

        f.tty.master_write(&f.shell, b"xy").unwrap();
        assert_eq!(f.tty.master_write(&f.shell, &[0x03]), Ok(1));

        assert!(f.shell.signals.is_pending(SIGINT));
        assert!(member.signals.is_pending(SIGINT));
        assert_eq!(member.signals.posted(), 1);
        assert_eq!(f.device.bytes(), b"xy^C\r\n");
        assert_eq!(f.tty.pending_input(), b"xy");
    }

    #[test]
    fn test_quit_and_suspend_signal_foreground() {
        let f = fixture();
        f.tty.master_write(&f.shell, &[0x1C, 0x1A]).unwrap();
        assert!(f.shell.signals.is_pending(SIGQUIT));
        assert!(f.shell.signals.is_pending(SIGTSTP));
        assert_eq!(f.device.bytes(), b"^\\\r\n^Z\r\n");
    }

    #[test]
    fn test_interrupt_with_exited_foreground() {
        let f = fixture();
        let session = f.tty.session().unwrap();
        let job = ProcessGroup::new(ProcessId::new(9), &session);
        f.tty.set_foreground(&f.shell, &job).unwrap();
        drop(job);

        assert_eq!(f.tty.foreground_pgrp(), None);
        assert_eq!(f.tty.signal_foreground(&f.shell, SIGINT), 0);
        // Echo still happens
        f.tty.master_write(&f.shell, &[0x03]).unwrap();
        assert_eq!(f.device.bytes(), b"^C\r\n");
    }

    #[test]
    fn test_eof_on_empty_line_writes_marker() {
        let f = fixture();
        assert_eq!(f.tty.master_write(&f.shell, &[0x04, b'x']), Ok(1));
        assert_eq!(f.app.writes(), vec![Vec::new()]);
    }

    #[test]
    fn test_raw_mode_passthrough() {
        let f = fixture();
        let mut termios = f.tty.termios();
        termios.c_lflag &= !ICANON;
        f.tty.set_termios(&termios);

        assert_eq!(f.tty.master_write(&f.shell, b"a\x03\nb"), Ok(4));
        assert_eq!(f.app.writes(), vec![b"a\x03\nb".to_vec()]);
        assert!(f.device.bytes().is_empty());
        assert!(!f.shell.signals.is_pending(SIGINT));
    }

    #[test]
    #[test]
    fn test_raw_mode_returns_sink_result() {
        let f = fixture();
        let short = |buf: &[u8]| -> Result<usize, i32> { Ok(buf.len() / 2) };
        let tty = Tty::new(&f.shell, 0, Arc::new(NullSink), Arc::new(short), None).unwrap();
        let mut termios = tty.termios();
        termios.set_raw();
        tty.set_termios(&termios);

        assert_eq!(tty.master_write(&f.shell, b"abcd"), Ok(2));
    }

    #[test]
    fn test_flush_error_propagates() {
        let f = fixture();
        let failing = |_: &[u8]| -> Result<usize, i32> { Err(EIO) };
        let tty = Tty::new(&f.shell, 0, Arc::new(NullSink), Arc::new(failing), None).unwrap();

        assert_eq!(tty.master_write(&f.shell, b"ok"), Ok(2));
        assert_eq!(tty.master_write(&f.shell, b"\n"), Err(EIO));
        assert_eq!(tty.pending_len(), 0);
    }

    /// Application sink with a fixed amount of space left
    struct Bounded {
        space: Mutex<usize>,
        inner: Capture,
    }

    impl Bounded {
        fn new(space: usize) -> Self {
            Self {
                space: Mutex::new(space),
                inner: Capture::default(),
            }
        }
    }

    impl TtyIo for Bounded {
        fn write(&self, buf: &[u8]) -> Result<usize, i32> {
            let mut space = self.space.lock();
            let n = buf.len().min(*space);
            *space -= n;
            self.inner.write(&buf[..n])
        }

        fn room(&self) -> Option<usize> {
            Some(*self.space.lock())
        }
    }

    #[test]
    fn test_full_sink_holds_line() {
        let f = fixture();
        let app = Arc::new(Bounded::new(4));
        let device = Arc::new(Capture::default());
        let tty = Tty::new(&f.shell, 0, device.clone(), app.clone(), None).unwrap();

        // Terminator stays unconsumed and unechoed
        assert_eq!(tty.master_write(&f.shell, b"hello\n"), Ok(5));
        assert_eq!(tty.pending_input(), b"hello");
        assert_eq!(device.bytes(), b"hello");
        assert!(app.inner.bytes().is_empty());

        assert_eq!(tty.master_write(&f.shell, b"\n"), Err(EAGAIN));
        assert_eq!(tty.pending_input(), b"hello");

        *app.space.lock() = 64;
        assert_eq!(tty.master_write(&f.shell, b"\n"), Ok(1));
        assert_eq!(app.inner.bytes(), b"hello\n");
        assert_eq!(tty.pending_len(), 0);
        assert_eq!(device.bytes(), b"hello\r\n");
    }

    #[test]
    fn test_full_sink_holds_end_of_file_line() {
        let f = fixture();
        let app = Arc::new(Bounded::new(2));
        let tty = Tty::new(&f.shell, 0, Arc::new(NullSink), app.clone(), None).unwrap();

        assert_eq!(tty.master_write(&f.shell, b"abc\x04"), Ok(3));
        assert_eq!(tty.pending_input(), b"abc");

        *app.space.lock() = 8;
        assert_eq!(tty.master_write(&f.shell, b"\x04"), Ok(1));
        assert_eq!(app.inner.bytes(), b"abc");
    }

    #[test]
    fn test_short_flush_is_an_error() {
        let f = fixture();
        let short = |buf: &[u8]| -> Result<usize, i32> { Ok(buf.len().min(4)) };
        let tty = Tty::new(&f.shell, 0, Arc::new(NullSink), Arc::new(short), None).unwrap();

        assert_eq!(tty.master_write(&f.shell, b"hello world\n"), Err(EIO));
    }

    #[test]
    fn test_echo_error_is_not_fatal() {
        let f = fixture();
        let failing = |_: &[u8]| -> Result<usize, i32> { Err(EIO) };
        let app = Arc::new(Capture::default());
        let tty = Tty::new(&f.shell, 0, Arc::new(failing), app.clone(), None).unwrap();

        assert_eq!(tty.master_write(&f.shell, b"hi\n"), Ok(3));
        assert_eq!(app.bytes(), b"hi\n");
    }

    #[test]
    fn test_slave_write_onlcr() {
        let f = fixture();
        assert_eq!(f.tty.slave_write(b"\n"), Ok(1));
        assert_eq!(f.device.bytes(), b"\r\n");
    }

    #[test]
    fn test_slave_write_without_opost() {
        let f = fixture();
        let mut termios = f.tty.termios();
        termios.c_oflag &= !OPOST;
        f.tty.set_termios(&termios);

        assert_eq!(f.tty.slave_write(b"a\nb"), Ok(3));
        assert_eq!(f.device.writes(), vec![b"a\nb".to_vec()]);
    }

    #[test]
    fn test_slave_write_single_byte_writes() {
        let f = fixture();
        let mut termios = f.tty.termios();
        termios.c_oflag = OPOST;
        f.tty.set_termios(&termios);

        assert_eq!(f.tty.slave_write(b"ab\n"), Ok(3));
        assert_eq!(
            f.device.writes(),
            vec![b"a".to_vec(), b"b".to_vec(), b"\n".to_vec()]
        );
    }

    #[test]
    fn test_slave_write_error_propagates() {
        let f = fixture();
        let failing = |_: &[u8]| -> Result<usize, i32> { Err(EIO) };
        let tty = Tty::new(&f.shell, 0, Arc::new(failing), Arc::new(NullSink), None).unwrap();
        assert_eq!(tty.slave_write(b"x"), Err(EIO));
    }

    #[test]
    fn test_set_termios_flush_discards_line() {
        let f = fixture();
        f.tty.master_write(&f.shell, b"junk").unwrap();

        let mut termios = f.tty.termios();
        termios.c_lflag &= !ECHO;
        f.tty.set_termios_flush(&termios);

        assert_eq!(f.tty.pending_len(), 0);
        assert!(!f.tty.termios().is_echo());
    }

    #[test]
    fn test_set_winsize_sends_sigwinch_on_change() {
        let f = fixture();
        assert!(f.tty.set_winsize(&f.shell, &Winsize::new(50, 132)));
        assert!(f.shell.signals.take(SIGWINCH));
        assert_eq!(f.tty.winsize(), Winsize::new(50, 132));

        assert!(!f.tty.set_winsize(&f.shell, &Winsize::new(50, 132)));
        assert!(!f.shell.signals.is_pending(SIGWINCH));
    }

    #[test]
    fn test_set_foreground_pgrp() {
        let f = fixture();
        let session = f.tty.session().unwrap();
        let job = ProcessGroup::new(ProcessId::new(7), &session);
        let worker = Process::new(ProcessId::new(7), "job", &job);

        assert_eq!(f.tty.set_foreground_pgrp(&f.shell, 7), Ok(()));
        assert_eq!(f.tty.foreground_pgrp(), Some(ProcessId::new(7)));

        f.tty.master_write(&f.shell, &[0x03]).unwrap();
        assert!(worker.signals.is_pending(SIGINT));
        assert!(!f.shell.signals.is_pending(SIGINT));
    }

    #[test]
    fn test_set_foreground_pgrp_errors() {
        let f = fixture();
        assert_eq!(f.tty.set_foreground_pgrp(&f.shell, -1), Err(EINVAL));
        assert_eq!(f.tty.set_foreground_pgrp(&f.shell, 99), Err(EPERM));

        let other_session = Session::new(ProcessId::new(50));
        let other_group = ProcessGroup::new(ProcessId::new(50), &other_session);
        let outsider = Process::new(ProcessId::new(50), "outsider", &other_group);
        assert_eq!(f.tty.set_foreground_pgrp(&outsider, 1), Err(ENOTTY));
        assert_eq!(f.tty.set_foreground(&f.shell, &other_group), Err(EPERM));

        // Unchanged after the failures
        assert_eq!(f.tty.foreground_pgrp(), Some(ProcessId::new(1)));
    }

    #[test]
    fn test_overruns_reported() {
        let f = fixture();
        let tty = Tty::new(&f.shell, 3, Arc::new(NullSink), f.app.clone(), None).unwrap();
        assert_eq!(tty.master_write(&f.shell, b"abcd"), Ok(4));
        assert_eq!(tty.overruns(), 2);
        assert_eq!(tty.master_write(&f.shell, b"\n"), Ok(1));
        assert_eq!(f.app.writes(), vec![b"ab\n".to_vec()]);
    }
}
