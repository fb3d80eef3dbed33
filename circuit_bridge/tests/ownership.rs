// circuit_bridge/tests/ownership.rs
//
// Failure payloads are released exactly once by the caller. Kept in its own
// test binary so the heap profiler only sees this test.

use circuit_bridge::{circuit_bridge_make_circuit, circuit_bridge_status_free};
use tempfile::TempDir;

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn live_bytes() -> usize {
    dhat::HeapStats::get().curr_bytes
}

#[test]
fn failure_payloads_do_not_leak() {
    let _profiler = dhat::Profiler::builder().testing().build();

    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    let path = missing.to_str().unwrap().to_string();

    // first call resolves configuration and registers tracing callsites
    let raw = unsafe { circuit_bridge_make_circuit(path.as_ptr(), path.len()) };
    unsafe { circuit_bridge_status_free(raw) };

    let baseline = live_bytes();

    let raw = unsafe { circuit_bridge_make_circuit(path.as_ptr(), path.len()) };
    assert!(!raw.ptr.is_null());
    // the payload is the only allocation still alive after the call
    assert_eq!(live_bytes(), baseline + raw.len);
    unsafe { circuit_bridge_status_free(raw) };
    assert_eq!(live_bytes(), baseline);

    for _ in 0..64 {
        let raw = unsafe { circuit_bridge_make_circuit(path.as_ptr(), path.len()) };
        unsafe { circuit_bridge_status_free(raw) };
    }
    assert_eq!(live_bytes(), baseline);
}
