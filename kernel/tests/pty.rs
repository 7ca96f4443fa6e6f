use std::sync::Arc;
use std::thread;

use kernel_tty::errno::EAGAIN;
use kernel_tty::process::{Process, ProcessGroup, ProcessId, Session};
use kernel_tty::signal::constants::SIGWINCH;
use kernel_tty::tty::ioctl::{Winsize, TIOCGPGRP, TIOCSPGRP, TIOCSWINSZ};
use kernel_tty::tty::pty;

fn login() -> (Arc<Session>, Arc<ProcessGroup>, Arc<Process>) {
    let session = Session::new(ProcessId::new(500));
    let group = ProcessGroup::new(ProcessId::new(500), &session);
    let shell = Process::new(ProcessId::new(500), "bash", &group);
    (session, group, shell)
}

fn read_all(read: impl Fn(&mut [u8]) -> Result<usize, i32>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = [0u8; 128];
    while let Ok(n) = read(&mut buf) {
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    out
}

#[test]
fn shell_session_over_pty() {
    kernel_tty::init();
    let (session, _group, shell) = login();

    let pair = pty::allocate(&shell).unwrap();
    pair.unlock();
    assert!(pty::list_active().contains(&pair.pty_num));

    // Terminal emulator types a command
    assert_eq!(pair.master_write(&shell, b"echo hi\n"), Ok(8));
    assert_eq!(read_all(|b| pair.slave_read(b)), b"echo hi\n");
    assert_eq!(read_all(|b| pair.master_read(b)), b"echo hi\r\n");

    // Shell answers
    pair.slave_write(b"hi\n").unwrap();
    assert_eq!(read_all(|b| pair.master_read(b)), b"hi\r\n");

    // Job control: hand the terminal to a new job
    let job = ProcessGroup::new(ProcessId::new(501), &session);
    let leader = Process::new(ProcessId::new(501), "top", &job);
    let mut arg = 501i32.to_ne_bytes();
    pair.ioctl(&shell, TIOCSPGRP, &mut arg).unwrap();
    let mut out = [0u8; 4];
    pair.ioctl(&shell, TIOCGPGRP, &mut out).unwrap();
    assert_eq!(i32::from_ne_bytes(out), 501);

    // Window resize goes to the new foreground job only
    let mut ws = Winsize::new(30, 100).to_bytes();
    pair.ioctl(&shell, TIOCSWINSZ, &mut ws).unwrap();
    assert!(leader.signals.is_pending(SIGWINCH));
    assert!(!shell.signals.is_pending(SIGWINCH));

    assert!(Arc::ptr_eq(&pty::get(pair.pty_num).unwrap(), &pair));
    pty::release(pair.pty_num);
}

#[test]
fn end_of_file_on_empty_line() {
    kernel_tty::init();
    let (_session, _group, shell) = login();
    let pair = pty::allocate(&shell).unwrap();

    pair.master_write(&shell, b"\x04").unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(pair.slave_read(&mut buf), Ok(0));
    assert_eq!(pair.slave_read(&mut buf), Err(EAGAIN));

    pty::release(pair.pty_num);
}

#[test]
fn reader_and_writer_threads() {
    kernel_tty::init();
    let (_session, _group, shell) = login();
    let pair = pty::allocate(&shell).unwrap();

    let writer = {
        let pair = Arc::clone(&pair);
        let shell = Arc::clone(&shell);
        thread::spawn(move || {
            for i in 0..20 {
                let line = format!("line {}\n", i);
                assert_eq!(pair.master_write(&shell, line.as_bytes()), Ok(line.len()));
            }
        })
    };
    writer.join().unwrap();

    let received = read_all(|b| pair.slave_read(b));
    let text = String::from_utf8(received).unwrap();
    assert_eq!(text.lines().count(), 20);
    assert!(text.starts_with("line 0\nline 1\n"));

    pty::release(pair.pty_num);
}
