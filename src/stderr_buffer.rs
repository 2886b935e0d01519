use std::io;
use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log output is stored instead of
/// printed to stderr.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Write a message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn write_message(msg: String) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Stderr sink for the tracing subscriber that honors the buffer.
pub struct BufferedStderr;

/// `MakeWriter` entry point: `fmt().with_writer(stderr_buffer::writer)`.
pub fn writer() -> BufferedStderr {
    BufferedStderr
}

impl io::Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // The fmt layer writes one formatted event per call
        let text = String::from_utf8_lossy(buf);
        let msg = text.trim_end_matches('\n');
        if !msg.is_empty() {
            write_message(msg.to_string());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
