// src/bundle/mod.rs

//! The flat-addressed output model: a [`Bundle`] of [`Experiment`]s, each a
//! header plus a sequence of index-addressed [`Instruction`]s.
//!
//! Everything here serialises with `serde` into the tree consumed by
//! execution backends:
//!
//! ```text
//! {id, header, config: {n_qubits, memory_slots, ...},
//!  experiments: [{header, config, instructions: [...]}]}
//! ```

mod config;
mod hex;

pub use config::{BundleConfig, BundleHeader, RunConfig};
pub use hex::{HexBits, ParseHexBitsError};

use crate::core::constants::wire_names;
use crate::core::AssembleError;
use crate::operations::{BaseInstruction, Param};
use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Instructions ---

/// A circuit operation in flat-addressed form.
///
/// There is no condition field: a conditional operation is lowered into a
/// preceding [`ConditionalTest`] and this instruction's `conditional` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoweredInstruction {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qubits: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memory: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    register: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conditional: Option<usize>,
}

impl LoweredInstruction {
    pub(crate) fn with_qubits(mut self, qubits: Vec<usize>) -> Self {
        self.qubits = Some(qubits);
        self
    }

    pub(crate) fn with_memory(mut self, memory: Vec<usize>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub(crate) fn with_register(mut self, register: Vec<usize>) -> Self {
        self.register = Some(register);
        self
    }

    pub(crate) fn with_conditional(mut self, slot: usize) -> Self {
        self.conditional = Some(slot);
        self
    }

    /// Wire name of the opcode.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opcode parameters, empty for parameterless gates.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Flat qubit indices, if the operation referenced any qubits.
    pub fn qubits(&self) -> Option<&[usize]> {
        self.qubits.as_deref()
    }

    /// Flat classical (memory) indices, if the operation referenced any bits.
    pub fn memory(&self) -> Option<&[usize]> {
        self.memory.as_deref()
    }

    /// Eager-routing indices into the conditional register space.
    pub fn register(&self) -> Option<&[usize]> {
        self.register.as_deref()
    }

    /// Slot of the conditional test gating this instruction.
    pub fn conditional(&self) -> Option<usize> {
        self.conditional
    }
}

impl From<BaseInstruction> for LoweredInstruction {
    fn from(base: BaseInstruction) -> Self {
        Self {
            name: base.name,
            params: base.params,
            qubits: None,
            memory: None,
            register: None,
            conditional: None,
        }
    }
}

/// Comparison applied by a conditional test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "==")]
    Equal,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Equal => write!(f, "{}", wire_names::EQUALS),
        }
    }
}

/// Synthesized boolean test: `(memory & mask) relation val`, result stored
/// in conditional-register slot `register`.
///
/// Decoding only accepts objects whose `name` is `"bfunc"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename = "bfunc")]
pub struct ConditionalTest {
    mask: HexBits,
    relation: Relation,
    val: HexBits,
    register: usize,
}

#[derive(Deserialize)]
struct ConditionalTestWire {
    name: String,
    mask: HexBits,
    relation: Relation,
    val: HexBits,
    register: usize,
}

impl<'de> Deserialize<'de> for ConditionalTest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ConditionalTestWire::deserialize(deserializer)?;
        if wire.name != wire_names::BFUNC {
            return Err(de::Error::invalid_value(Unexpected::Str(&wire.name), &wire_names::BFUNC));
        }
        Ok(Self { mask: wire.mask, relation: wire.relation, val: wire.val, register: wire.register })
    }
}

impl ConditionalTest {
    pub(crate) fn new(mask: HexBits, val: HexBits, slot: usize) -> Self {
        Self { mask, relation: Relation::Equal, val, register: slot }
    }

    /// Flat classical bits the test reads.
    pub fn mask(&self) -> &HexBits {
        &self.mask
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Required values of the masked bits.
    pub fn val(&self) -> &HexBits {
        &self.val
    }

    /// Conditional-register slot the result is written to.
    pub fn slot(&self) -> usize {
        self.register
    }
}

/// One entry of an experiment's instruction stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instruction {
    /// A synthesized conditional test.
    Test(ConditionalTest),
    /// A lowered circuit operation.
    Op(LoweredInstruction),
}

impl Instruction {
    pub fn name(&self) -> &str {
        match self {
            Instruction::Test(_) => wire_names::BFUNC,
            Instruction::Op(op) => op.name(),
        }
    }

    /// The conditional test, if this entry is one.
    pub fn as_test(&self) -> Option<&ConditionalTest> {
        match self {
            Instruction::Test(test) => Some(test),
            Instruction::Op(_) => None,
        }
    }

    /// The lowered operation, if this entry is one.
    pub fn as_op(&self) -> Option<&LoweredInstruction> {
        match self {
            Instruction::Op(op) => Some(op),
            Instruction::Test(_) => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Test(test) => write!(
                f,
                "{} mask={} {} val={} -> creg[{}]",
                wire_names::BFUNC,
                test.mask,
                test.relation,
                test.val,
                test.register
            ),
            Instruction::Op(op) => {
                write!(f, "{}", op.name)?;
                if !op.params.is_empty() {
                    let params: Vec<String> = op.params.iter().map(|p| p.to_string()).collect();
                    write!(f, "({})", params.join(", "))?;
                }
                if let Some(qubits) = &op.qubits {
                    write!(f, " qubits={:?}", qubits)?;
                }
                if let Some(memory) = &op.memory {
                    write!(f, " memory={:?}", memory)?;
                }
                if let Some(register) = &op.register {
                    write!(f, " register={:?}", register)?;
                }
                if let Some(slot) = op.conditional {
                    write!(f, " if creg[{}]", slot)?;
                }
                Ok(())
            }
        }
    }
}

// --- Experiments ---

/// `[register_name, offset]` pair naming one flat address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitLabel(pub String, pub usize);

/// `[register_name, size]` pair describing one register declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSize(pub String, pub usize);

/// Descriptive metadata for one experiment, used by backends to map
/// results back onto the original registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentHeader {
    pub name: String,
    pub qubit_labels: Vec<BitLabel>,
    pub clbit_labels: Vec<BitLabel>,
    pub qreg_sizes: Vec<RegisterSize>,
    pub creg_sizes: Vec<RegisterSize>,
    pub n_qubits: usize,
    pub memory_slots: usize,
}

/// Per-experiment sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub n_qubits: usize,
    pub memory_slots: usize,
}

/// One circuit in lowered, flat-addressed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub header: ExperimentHeader,
    pub config: ExperimentConfig,
    pub instructions: Vec<Instruction>,
}

impl Experiment {
    /// The synthesized conditional tests, in stream order.
    pub fn conditional_tests(&self) -> impl Iterator<Item = &ConditionalTest> {
        self.instructions.iter().filter_map(Instruction::as_test)
    }

    /// The lowered circuit operations, in stream order, without tests.
    pub fn operations(&self) -> impl Iterator<Item = &LoweredInstruction> {
        self.instructions.iter().filter_map(Instruction::as_op)
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Experiment '{}' ({} qubits, {} memory slots, {} instructions)",
            self.header.name,
            self.config.n_qubits,
            self.config.memory_slots,
            self.instruction_count()
        )?;
        for (pc, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "  {:04}: {}", pc, instruction)?;
        }
        Ok(())
    }
}

// --- Bundle ---

/// The batch-execution request handed to a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub header: BundleHeader,
    pub config: BundleConfig,
    /// Experiments in the same order as the input circuits.
    pub experiments: Vec<Experiment>,
}

impl Bundle {
    /// Compact JSON encoding of the bundle.
    pub fn to_json(&self) -> Result<String, AssembleError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, AssembleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes a bundle from its JSON encoding.
    pub fn from_json(text: &str) -> Result<Self, AssembleError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Looks up an experiment by circuit name (first match).
    pub fn experiment(&self, name: &str) -> Option<&Experiment> {
        self.experiments.iter().find(|e| e.header.name == name)
    }
}
