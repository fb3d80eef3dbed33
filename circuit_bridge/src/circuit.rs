// circuit_bridge/src/circuit.rs
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bellman::gadgets::num::AllocatedNum;
use bellman::gadgets::test::TestConstraintSystem;
use bellman::{Circuit, ConstraintSystem, SynthesisError};
use bls12_381::Scalar;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::field::FieldValue;

/// JSON circuit description as read from disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitDescription {
    pub name: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, FieldValue>,
    pub gates: Vec<GateSpec>,
    #[serde(default)]
    pub public: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GateSpec {
    Add {
        left: String,
        right: String,
        out: String,
    },
    Sub {
        left: String,
        right: String,
        out: String,
    },
    Mul {
        left: String,
        right: String,
        out: String,
    },
    AssertEq {
        wire: String,
        value: FieldValue,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
}

impl Op {
    fn apply(self, left: Scalar, right: Scalar) -> Scalar {
        match self {
            Op::Add => left + right,
            Op::Sub => left - right,
            Op::Mul => left * right,
        }
    }
}

/// Gate with wires resolved to indices.
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    Binary {
        op: Op,
        left: usize,
        right: usize,
        out: usize,
    },
    AssertEq {
        wire: usize,
        value: Scalar,
    },
}

#[derive(Default)]
struct WireTable<'a> {
    index: HashMap<&'a str, usize>,
    names: Vec<String>,
}

impl<'a> WireTable<'a> {
    fn define(&mut self, name: &'a str) -> BridgeResult<usize> {
        if name.is_empty() {
            return Err(BridgeError::EmptyWireName);
        }
        if self.index.contains_key(name) {
            return Err(BridgeError::DuplicateWire(name.to_string()));
        }
        let id = self.names.len();
        self.index.insert(name, id);
        self.names.push(name.to_string());
        Ok(id)
    }

    fn lookup(&self, name: &str) -> BridgeResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| BridgeError::UndefinedWire(name.to_string()))
    }
}

/// In-memory circuit handed to the prover: resolved gates plus the full witness.
#[derive(Clone, Debug)]
pub struct ArithmeticCircuit {
    name: String,
    wire_names: Vec<String>,
    values: Vec<Scalar>,
    input_count: usize,
    gates: Vec<Gate>,
    public: Vec<usize>,
    digest: [u8; 32],
}

impl ArithmeticCircuit {
    pub fn from_description(
        description: &CircuitDescription,
        config: &BridgeConfig,
        digest: [u8; 32],
    ) -> BridgeResult<Self> {
        if description.gates.is_empty() {
            return Err(BridgeError::EmptyCircuit);
        }
        if description.gates.len() > config.max_gates {
            return Err(BridgeError::TooManyGates {
                count: description.gates.len(),
                limit: config.max_gates,
            });
        }

        let mut wires = WireTable::default();
        let mut values = Vec::with_capacity(description.inputs.len() + description.gates.len());
        for (name, value) in &description.inputs {
            wires.define(name)?;
            values.push(value.to_scalar()?);
        }
        let input_count = values.len();

        let mut gates = Vec::with_capacity(description.gates.len());
        for spec in &description.gates {
            let (op, left, right, out) = match spec {
                GateSpec::Add { left, right, out } => (Op::Add, left, right, out),
                GateSpec::Sub { left, right, out } => (Op::Sub, left, right, out),
                GateSpec::Mul { left, right, out } => (Op::Mul, left, right, out),
                GateSpec::AssertEq { wire, value } => {
                    gates.push(Gate::AssertEq {
                        wire: wires.lookup(wire)?,
                        value: value.to_scalar()?,
                    });
                    continue;
                }
            };
            let left = wires.lookup(left)?;
            let right = wires.lookup(right)?;
            let out = wires.define(out)?;
            values.push(op.apply(values[left], values[right]));
            gates.push(Gate::Binary {
                op,
                left,
                right,
                out,
            });
        }

        let public = description
            .public
            .iter()
            .map(|name| wires.lookup(name))
            .collect::<BridgeResult<Vec<_>>>()?;

        // every input must feed at least one constraint
        let mut used = vec![false; input_count];
        let referenced = gates
            .iter()
            .flat_map(|gate| match *gate {
                Gate::Binary { left, right, .. } => [Some(left), Some(right)],
                Gate::AssertEq { wire, .. } => [Some(wire), None],
            })
            .flatten()
            .chain(public.iter().copied());
        for id in referenced {
            if id < input_count {
                used[id] = true;
            }
        }
        if let Some(id) = used.iter().position(|seen| !seen) {
            return Err(BridgeError::UnusedWire(wires.names[id].clone()));
        }

        Ok(Self {
            name: description.name.clone(),
            wire_names: wires.names,
            values,
            input_count,
            gates,
            public,
            digest,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn digest(&self) -> [u8; 32] {
        self.digest
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// One constraint per gate and one per public input.
    pub fn num_constraints(&self) -> usize {
        self.gates.len() + self.public.len()
    }

    pub fn wire_value(&self, name: &str) -> Option<Scalar> {
        self.wire_names
            .iter()
            .position(|wire| wire == name)
            .map(|id| self.values[id])
    }

    pub fn public_inputs(&self) -> Vec<Scalar> {
        self.public.iter().map(|&id| self.values[id]).collect()
    }

    pub fn public_wires(&self) -> impl Iterator<Item = (&str, Scalar)> + '_ {
        self.public
            .iter()
            .map(|&id| (self.wire_names[id].as_str(), self.values[id]))
    }

    /// Synthesizes the circuit against its own witness and reports the first
    /// constraint that does not hold.
    pub fn check_satisfied(&self) -> BridgeResult<()> {
        let mut cs = TestConstraintSystem::<Scalar>::new();
        self.synthesize(&mut cs)?;
        match cs.which_is_unsatisfied() {
            Some(path) => Err(BridgeError::Unsatisfied(path.to_string())),
            None => Ok(()),
        }
    }
}

impl<'a> Circuit<Scalar> for &'a ArithmeticCircuit {
    fn synthesize<CS: ConstraintSystem<Scalar>>(self, cs: &mut CS) -> Result<(), SynthesisError> {
        let mut wires: Vec<AllocatedNum<Scalar>> = Vec::with_capacity(self.values.len());
        for (i, value) in self.values[..self.input_count].iter().copied().enumerate() {
            let num = AllocatedNum::alloc(cs.namespace(|| format!("input {i}")), || Ok(value))?;
            wires.push(num);
        }

        for (i, gate) in self.gates.iter().enumerate() {
            match *gate {
                Gate::Binary {
                    op: Op::Mul,
                    left,
                    right,
                    ..
                } => {
                    let product = wires[left].mul(cs.namespace(|| format!("gate {i}")), &wires[right])?;
                    wires.push(product);
                }
                Gate::Binary {
                    op,
                    left,
                    right,
                    out,
                } => {
                    let value = self.values[out];
                    let result =
                        AllocatedNum::alloc(cs.namespace(|| format!("gate {i} value")), || Ok(value))?;
                    let l = wires[left].get_variable();
                    let r = wires[right].get_variable();
                    let o = result.get_variable();
                    // (l ± r) * 1 = out
                    if op == Op::Sub {
                        cs.enforce(|| format!("gate {i}"), |lc| lc + l - r, |lc| lc + CS::one(), |lc| lc + o);
                    } else {
                        cs.enforce(|| format!("gate {i}"), |lc| lc + l + r, |lc| lc + CS::one(), |lc| lc + o);
                    }
                    wires.push(result);
                }
                Gate::AssertEq { wire, value } => {
                    let w = wires[wire].get_variable();
                    cs.enforce(
                        || format!("gate {i}"),
                        |lc| lc + w,
                        |lc| lc + CS::one(),
                        |lc| lc + (value, CS::one()),
                    );
                }
            }
        }

        for (i, &wire) in self.public.iter().enumerate() {
            wires[wire].inputize(cs.namespace(|| format!("public {i}")))?;
        }
        Ok(())
    }
}

/// Reads up to `limit + 1` bytes so an oversized stream is detected without buffering it.
fn read_bounded(reader: impl Read, limit: u64) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Reads the description at `path` and builds the circuit the prover consumes.
pub fn make_circuit(path: impl AsRef<Path>, config: &BridgeConfig) -> BridgeResult<ArithmeticCircuit> {
    let path = path.as_ref();
    let io_error = |source: io::Error| BridgeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let bytes = read_bounded(file, config.max_description_bytes).map_err(io_error)?;
    if bytes.len() as u64 > config.max_description_bytes {
        return Err(BridgeError::DescriptionTooLarge {
            limit: config.max_description_bytes,
        });
    }
    let description: CircuitDescription = serde_json::from_slice(&bytes)?;
    debug!(
        path = %path.display(),
        gates = description.gates.len(),
        "parsed circuit description"
    );

    let circuit = ArithmeticCircuit::from_description(&description, config, Sha256::digest(&bytes).into())?;
    if config.check_satisfiability {
        circuit.check_satisfied()?;
    }

    info!(
        circuit = circuit.name(),
        gates = circuit.gates().len(),
        constraints = circuit.num_constraints(),
        digest = %circuit.digest_hex(),
        "circuit built"
    );
    Ok(circuit)
}
