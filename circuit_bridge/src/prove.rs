// circuit_bridge/src/prove.rs
use bellman::groth16::{create_random_proof, generate_random_parameters, prepare_verifying_key, verify_proof};
use bls12_381::Bls12;
use rand::thread_rng;
use tracing::{debug, info};

use crate::circuit::ArithmeticCircuit;
use crate::error::{BridgeError, BridgeResult};

/// Groth16 setup, proof and verification against the circuit's public wires.
pub fn prove_and_verify(circuit: &ArithmeticCircuit) -> BridgeResult<()> {
    let rng = &mut thread_rng();

    let params = generate_random_parameters::<Bls12, _, _>(circuit, rng)?;
    let pvk = prepare_verifying_key(&params.vk);
    debug!(circuit = circuit.name(), "groth16 parameters generated");

    let proof = create_random_proof(circuit, &params, rng)?;

    verify_proof(&pvk, &proof, &circuit.public_inputs()).map_err(|_| BridgeError::Verification)?;
    info!(circuit = circuit.name(), "proof verified");
    Ok(())
}
