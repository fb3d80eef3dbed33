// circuit_py/src/calls.rs
//
// Python side of the bridge. Each call hands the path to the C entry point as
// a borrowed pointer/length pair, consumes the returned payload exactly once,
// and raises RuntimeError with the payload text on failure.
//
// circuit_summary returns a dict with:
//   - "name": str
//   - "gates": int
//   - "constraints": int
//   - "public": list of (wire, decimal value) tuples, in input order
//   - "digest": hex sha256 of the description file

use circuit_bridge::field::to_decimal;
use circuit_bridge::{
    circuit_bridge_make_circuit, circuit_bridge_prove_circuit, native_builder, PtrLen, Status,
};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyTuple};

type Entry = unsafe extern "C" fn(*const u8, usize) -> PtrLen;

fn call_entry(py: Python, entry: Entry, path: &str) -> PyResult<()> {
    let status = py.allow_threads(|| {
        // the payload is reclaimed immediately, so it never outlives this closure
        let raw = unsafe { entry(path.as_ptr(), path.len()) };
        unsafe { Status::from_raw(raw) }
    });
    match status {
        Status::Success => Ok(()),
        Status::Failure(message) => Err(PyRuntimeError::new_err(message)),
    }
}

pub fn make_circuit(py: Python, path: &str) -> PyResult<()> {
    call_entry(py, circuit_bridge_make_circuit, path)
}

pub fn prove_circuit(py: Python, path: &str) -> PyResult<()> {
    call_entry(py, circuit_bridge_prove_circuit, path)
}

pub fn circuit_summary(py: Python, path: &str) -> PyResult<PyObject> {
    let builder = native_builder().map_err(|err| PyRuntimeError::new_err(err.to_string()))?;
    let circuit = py
        .allow_threads(|| circuit_bridge::make_circuit(path, builder.config()))
        .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;

    let public = PyList::empty(py);
    for (wire, value) in circuit.public_wires() {
        public.append(PyTuple::new(py, [wire.to_object(py), to_decimal(&value).to_object(py)]))?;
    }

    let summary = PyDict::new(py);
    summary.set_item("name", circuit.name())?;
    summary.set_item("gates", circuit.gates().len())?;
    summary.set_item("constraints", circuit.num_constraints())?;
    summary.set_item("public", public)?;
    summary.set_item("digest", circuit.digest_hex())?;
    Ok(summary.to_object(py))
}
