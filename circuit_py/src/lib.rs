// circuit_py/src/lib.rs
use pyo3::prelude::*;

mod calls;

#[pymodule]
fn circuit_py(_py: Python, m: &PyModule) -> PyResult<()> {
    circuit_bridge::telemetry::init_tracing();
    m.add_function(wrap_pyfunction!(make_circuit, m)?)?;
    m.add_function(wrap_pyfunction!(prove_circuit, m)?)?;
    m.add_function(wrap_pyfunction!(circuit_summary, m)?)?;
    Ok(())
}

/// make_circuit(path) -> None, raises RuntimeError with the bridge message on failure
#[pyfunction]
fn make_circuit(py: Python, path: &str) -> PyResult<()> {
    calls::make_circuit(py, path)
}

/// prove_circuit(path) -> None
#[pyfunction]
fn prove_circuit(py: Python, path: &str) -> PyResult<()> {
    calls::prove_circuit(py, path)
}

/// circuit_summary(path) -> dict
#[pyfunction]
fn circuit_summary(py: Python, path: &str) -> PyResult<PyObject> {
    calls::circuit_summary(py, path)
}
