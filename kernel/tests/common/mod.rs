#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use kernel_tty::process::{Process, ProcessGroup, ProcessId, Session};
use kernel_tty::tty::{Tty, TtyIo};

/// Sink that records every write it receives
#[derive(Default)]
pub struct Capture {
    writes: Mutex<Vec<Vec<u8>>>,
}

impl Capture {
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.lock().unwrap().concat()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }
}

impl TtyIo for Capture {
    fn write(&self, buf: &[u8]) -> Result<usize, i32> {
        self.writes.lock().unwrap().push(buf.to_vec());
        Ok(buf.len())
    }
}

/// A login session with one foreground job and a tty on top of it
pub struct Terminal {
    pub session: Arc<Session>,
    pub group: Arc<ProcessGroup>,
    pub shell: Arc<Process>,
    pub device: Arc<Capture>,
    pub app: Arc<Capture>,
    pub tty: Tty,
}

pub fn terminal() -> Terminal {
    let session = Session::new(ProcessId::new(1));
    let group = ProcessGroup::new(ProcessId::new(1), &session);
    let shell = Process::new(ProcessId::new(1), "sh", &group);
    let device = Arc::new(Capture::default());
    let app = Arc::new(Capture::default());
    let tty = Tty::new(&shell, 0, device.clone(), app.clone(), None).unwrap();

    Terminal {
        session,
        group,
        shell,
        device,
        app,
        tty,
    }
}
