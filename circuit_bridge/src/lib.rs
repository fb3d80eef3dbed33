// circuit_bridge/src/lib.rs
pub mod adapter;
pub mod circuit;
pub mod config;
pub mod error;
pub mod field;
pub mod prove;
pub mod status;
pub mod telemetry;

pub use crate::adapter::{bridge_make_circuit, bridge_prove_circuit, trycatch, CircuitBuilder, NativeCircuitBuilder};
pub use crate::circuit::{make_circuit, ArithmeticCircuit, CircuitDescription, Gate, GateSpec};
pub use crate::config::BridgeConfig;
pub use crate::error::{BridgeError, BridgeResult};
pub use crate::status::{PtrLen, Status};

use std::slice;
use std::str;
use std::sync::OnceLock;

static BUILDER: OnceLock<NativeCircuitBuilder> = OnceLock::new();

/// The builder behind the exported entry points, configured once per process
/// from [`config::CONFIG_ENV`].
pub fn native_builder() -> BridgeResult<&'static NativeCircuitBuilder> {
    if let Some(builder) = BUILDER.get() {
        return Ok(builder);
    }
    let config = BridgeConfig::from_env()?;
    Ok(BUILDER.get_or_init(|| NativeCircuitBuilder::new(config)))
}

/// # Safety
/// `ptr` must be null or point to `len` readable bytes for the duration of the call.
unsafe fn borrowed_path<'a>(ptr: *const u8, len: usize) -> BridgeResult<&'a str> {
    if ptr.is_null() {
        if len == 0 {
            return Ok("");
        }
        return Err(BridgeError::NullPath(len));
    }
    Ok(str::from_utf8(slice::from_raw_parts(ptr, len))?)
}

/// # Safety
/// Same contract as [`circuit_bridge_make_circuit`].
unsafe fn call_native(
    path_ptr: *const u8,
    path_len: usize,
    call: fn(&NativeCircuitBuilder, &str) -> PtrLen,
) -> PtrLen {
    let resolved = borrowed_path(path_ptr, path_len).and_then(|path| Ok((native_builder()?, path)));
    match resolved {
        Ok((builder, path)) => call(builder, path),
        Err(err) => trycatch(|| Err(err)),
    }
}

/// Builds the circuit described by the file at the borrowed path.
///
/// Returns a null payload on success. A failure payload must be released with
/// [`circuit_bridge_status_free`].
///
/// # Safety
/// `path_ptr` must be null or point to `path_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn circuit_bridge_make_circuit(path_ptr: *const u8, path_len: usize) -> PtrLen {
    call_native(path_ptr, path_len, bridge_make_circuit::<NativeCircuitBuilder>)
}

/// Builds the circuit, then proves and verifies it with Groth16.
///
/// # Safety
/// Same contract as [`circuit_bridge_make_circuit`].
#[no_mangle]
pub unsafe extern "C" fn circuit_bridge_prove_circuit(path_ptr: *const u8, path_len: usize) -> PtrLen {
    call_native(path_ptr, path_len, bridge_prove_circuit)
}

/// Releases a payload returned by this library. Success payloads are ignored.
///
/// # Safety
/// `status` must come from this library and must not have been released before.
#[no_mangle]
pub unsafe extern "C" fn circuit_bridge_status_free(status: PtrLen) {
    drop(Status::from_raw(status));
}

#[no_mangle]
pub extern "C" fn circuit_bridge_init_logging() {
    telemetry::init_tracing();
}
