// circuit_bridge/tests/logging.rs
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use circuit_bridge::{circuit_bridge_make_circuit, circuit_bridge_prove_circuit, Status};
use tempfile::TempDir;
use tracing_subscriber::fmt::{MakeWriter, Subscriber};

#[derive(Clone)]
struct SharedBufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

struct BufferGuard {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for SharedBufferWriter {
    type Writer = BufferGuard;

    fn make_writer(&'a self) -> Self::Writer {
        BufferGuard {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl Write for BufferGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buffer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log buffer poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Subscriber::builder()
        .with_writer(SharedBufferWriter {
            buffer: Arc::clone(&buffer),
        })
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn exported_entries_log_the_bridged_call() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");
    let path = missing.to_str().unwrap().to_string();

    let logs = capture(|| {
        let raw = unsafe { circuit_bridge_make_circuit(path.as_ptr(), path.len()) };
        assert!(!unsafe { Status::from_raw(raw) }.is_success());
        let raw = unsafe { circuit_bridge_prove_circuit(path.as_ptr(), path.len()) };
        assert!(!unsafe { Status::from_raw(raw) }.is_success());
    });

    assert!(logs.contains("make_circuit"), "{logs}");
    assert!(logs.contains("prove_circuit"), "{logs}");
    assert!(logs.contains(&path), "{logs}");
    assert!(logs.contains("bridged call failed"), "{logs}");
}
