// circuit_bridge/src/adapter.rs
//
// Turns fallible Rust calls into status payloads at the C boundary.
//
// `Err` values become failure payloads carrying their `Display` text. A panic
// is not a recoverable failure: it is logged and the process aborts before
// anything unwinds into the caller.

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::process;

use tracing::{debug, error, warn};

use crate::circuit;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::prove;
use crate::status::{PtrLen, Status};

/// The collaborator behind `make_circuit`.
pub trait CircuitBuilder {
    type Error: Display;

    fn make_circuit(&self, path: &str) -> Result<(), Self::Error>;
}

/// Builds circuits from JSON descriptions on disk.
#[derive(Clone, Debug, Default)]
pub struct NativeCircuitBuilder {
    config: BridgeConfig,
}

impl NativeCircuitBuilder {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn prove_circuit(&self, path: &str) -> Result<(), BridgeError> {
        let circuit = circuit::make_circuit(path, &self.config)?;
        prove::prove_and_verify(&circuit)
    }
}

impl CircuitBuilder for NativeCircuitBuilder {
    type Error = BridgeError;

    fn make_circuit(&self, path: &str) -> Result<(), BridgeError> {
        circuit::make_circuit(path, &self.config).map(|_| ())
    }
}

/// Runs `func` and reports its outcome as a payload owned by the caller.
pub fn trycatch<F, E>(func: F) -> PtrLen
where
    F: FnOnce() -> Result<(), E>,
    E: Display,
{
    let status = match panic::catch_unwind(AssertUnwindSafe(func)) {
        Ok(Ok(())) => Status::Success,
        Ok(Err(err)) => {
            let message = err.to_string();
            warn!(error = %message, "bridged call failed");
            Status::Failure(message)
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(panic = %reason, "panic reached the C boundary, aborting");
            process::abort();
        }
    };
    status.into_raw()
}

pub fn bridge_make_circuit<B: CircuitBuilder>(builder: &B, path: &str) -> PtrLen {
    debug!(path, "make_circuit");
    trycatch(|| builder.make_circuit(path))
}

pub fn bridge_prove_circuit(builder: &NativeCircuitBuilder, path: &str) -> PtrLen {
    debug!(path, "prove_circuit");
    trycatch(|| builder.prove_circuit(path))
}
