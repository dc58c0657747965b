// src/operations/mod.rs

//! Defines the operations a circuit is made of and the per-opcode lowering
//! capability that turns each one into its primitive wire form.
//!
//! An [`Operation`] couples an opcode ([`Gate`]) with the register-relative
//! bits it acts on and an optional classical [`Condition`]. Address
//! resolution and condition lowering are the assembler's job; the opcode
//! itself only knows its own name and parameters, exposed through [`Lower`].

use crate::core::constants::wire_names;
use crate::core::{ClassicalRegister, Clbit, Qubit, Register};
use num_bigint::BigUint;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A gate parameter as carried on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    /// Real-valued parameter, usually an angle in radians.
    Float(f64),
    /// Complex parameter, serialised as `[re, im]`.
    Complex(Complex<f64>),
    /// Free-form parameter (e.g. a snapshot label).
    Text(String),
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Float(value)
    }
}

impl From<Complex<f64>> for Param {
    fn from(value: Complex<f64>) -> Self {
        Param::Complex(value)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Float(v) => write!(f, "{}", v),
            Param::Complex(c) => write!(f, "{}", c),
            Param::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Opcode-only lowered form of an operation: name and parameters, no addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseInstruction {
    /// Wire name of the opcode (e.g. `"cx"`).
    pub name: String,
    /// Parameters in opcode order; empty for parameterless gates.
    pub params: Vec<Param>,
}

impl BaseInstruction {
    /// Creates a parameterless base instruction.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), params: Vec::new() }
    }

    /// Creates a base instruction with parameters.
    pub fn with_params(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self { name: name.into(), params }
    }
}

/// Per-opcode lowering capability.
///
/// Implementors describe how one opcode looks in the flat instruction
/// format. Bit addressing and conditions are applied afterwards by the
/// assembler, so `lower` never sees register names.
pub trait Lower {
    /// Produces the opcode's base instruction.
    fn lower(&self) -> BaseInstruction;

    /// Whether this opcode writes a measurement result into classical memory.
    fn is_measurement(&self) -> bool {
        false
    }
}

/// The opcode set understood by the assembler.
///
/// Standard gates are closed variants; anything else goes through
/// [`Gate::Custom`], which lowers to its own name and parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Identity (idle) on one qubit.
    Id,
    /// Hadamard.
    H,
    /// Pauli-X (bit flip).
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z (phase flip).
    Z,
    /// Phase gate, sqrt(Z).
    S,
    /// Inverse of `S`.
    Sdg,
    /// T gate, fourth root of Z.
    T,
    /// Inverse of `T`.
    Tdg,
    /// Rotation about the X axis by `theta` radians.
    Rx { theta: f64 },
    /// Rotation about the Y axis by `theta` radians.
    Ry { theta: f64 },
    /// Rotation about the Z axis by `phi` radians.
    Rz { phi: f64 },
    /// Single-parameter phase gate.
    U1 { lambda: f64 },
    /// Two-parameter single-qubit gate.
    U2 { phi: f64, lambda: f64 },
    /// General single-qubit rotation.
    U3 { theta: f64, phi: f64, lambda: f64 },
    /// Controlled-X; qubits are `[control, target]`.
    Cx,
    /// Controlled-Z.
    Cz,
    /// Exchanges two qubits.
    Swap,
    /// Toffoli; qubits are `[control, control, target]`.
    Ccx,
    /// Measure qubits into classical bits, pairwise.
    Measure,
    /// Reset qubits to |0>.
    Reset,
    /// Scheduling barrier across the referenced qubits.
    Barrier,
    /// Any opcode outside the standard set.
    Custom {
        /// Wire name of the opcode.
        name: String,
        /// Opcode parameters.
        params: Vec<Param>,
    },
}

impl Gate {
    /// Wire name of the opcode.
    pub fn name(&self) -> &str {
        match self {
            Gate::Id => "id",
            Gate::H => "h",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::Rx { .. } => "rx",
            Gate::Ry { .. } => "ry",
            Gate::Rz { .. } => "rz",
            Gate::U1 { .. } => "u1",
            Gate::U2 { .. } => "u2",
            Gate::U3 { .. } => "u3",
            Gate::Cx => "cx",
            Gate::Cz => "cz",
            Gate::Swap => "swap",
            Gate::Ccx => "ccx",
            Gate::Measure => wire_names::MEASURE,
            Gate::Reset => "reset",
            Gate::Barrier => "barrier",
            Gate::Custom { name, .. } => name.as_str(),
        }
    }

    fn params(&self) -> Vec<Param> {
        match self {
            Gate::Rx { theta } | Gate::Ry { theta } => vec![Param::Float(*theta)],
            Gate::Rz { phi } => vec![Param::Float(*phi)],
            Gate::U1 { lambda } => vec![Param::Float(*lambda)],
            Gate::U2 { phi, lambda } => vec![Param::Float(*phi), Param::Float(*lambda)],
            Gate::U3 { theta, phi, lambda } => {
                vec![Param::Float(*theta), Param::Float(*phi), Param::Float(*lambda)]
            }
            Gate::Custom { params, .. } => params.clone(),
            _ => Vec::new(),
        }
    }
}

impl Lower for Gate {
    fn lower(&self) -> BaseInstruction {
        BaseInstruction::with_params(self.name(), self.params())
    }

    fn is_measurement(&self) -> bool {
        // A custom opcode spelled "measure" is treated as a measurement too.
        self.name() == wire_names::MEASURE
    }
}

/// Classical gating condition: fire only if `register == value`.
///
/// `value` is read bit by bit against the register's offsets; bits at or
/// above the register size play no part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Name of the classical register being tested.
    pub register: String,
    /// Integer the register must equal.
    pub value: BigUint,
}

impl Condition {
    /// Creates a condition on the register named `register`.
    pub fn new(register: impl Into<String>, value: impl Into<BigUint>) -> Self {
        Self { register: register.into(), value: value.into() }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.register, self.value)
    }
}

/// One step of a circuit: an opcode applied to register-relative bits.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    gate: Gate,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    condition: Option<Condition>,
}

impl Operation {
    /// Creates an unconditional operation.
    ///
    /// # Arguments
    /// * `gate` - The opcode.
    /// * `qubits` - Qubit references, in the order the opcode expects.
    /// * `clbits` - Classical bit references (empty for ordinary gates).
    pub fn new(gate: Gate, qubits: Vec<Qubit>, clbits: Vec<Clbit>) -> Self {
        Self { gate, qubits, clbits, condition: None }
    }

    /// Creates a gate acting on `qubits` only.
    pub fn gate(gate: Gate, qubits: Vec<Qubit>) -> Self {
        Self::new(gate, qubits, Vec::new())
    }

    /// Measures `qubit` into `clbit`.
    pub fn measure(qubit: Qubit, clbit: Clbit) -> Self {
        Self::new(Gate::Measure, vec![qubit], vec![clbit])
    }

    /// Gates this operation on `register == value`, replacing any earlier condition.
    pub fn c_if(mut self, register: &ClassicalRegister, value: impl Into<BigUint>) -> Self {
        self.condition = Some(Condition::new(register.name(), value));
        self
    }

    /// Same as [`Operation::c_if`] but takes a prepared condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// The opcode this operation applies.
    pub fn opcode(&self) -> &Gate {
        &self.gate
    }

    /// Qubit references, in opcode order.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Classical bit references, in opcode order.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// The classical condition gating this operation, if any.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gate.name())?;
        let params = self.gate.params();
        if !params.is_empty() {
            let rendered: Vec<String> = params.iter().map(|p| p.to_string()).collect();
            write!(f, "({})", rendered.join(", "))?;
        }
        let qubits: Vec<String> = self.qubits.iter().map(|q| q.to_string()).collect();
        if !qubits.is_empty() {
            write!(f, " {}", qubits.join(", "))?;
        }
        if !self.clbits.is_empty() {
            let clbits: Vec<String> = self.clbits.iter().map(|c| c.to_string()).collect();
            write!(f, " -> {}", clbits.join(", "))?;
        }
        if let Some(condition) = &self.condition {
            write!(f, " if {}", condition)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QuantumRegister;

    #[test]
    fn test_standard_gate_lowering() {
        let base = Gate::U3 { theta: 0.1, phi: 0.2, lambda: 0.3 }.lower();
        assert_eq!(base.name, "u3");
        assert_eq!(base.params, vec![Param::Float(0.1), Param::Float(0.2), Param::Float(0.3)]);
        assert!(Gate::Cx.lower().params.is_empty());
    }

    #[test]
    fn test_measurement_detection() {
        assert!(Gate::Measure.is_measurement());
        assert!(!Gate::Reset.is_measurement());
        let custom = Gate::Custom { name: "measure".to_string(), params: vec![] };
        assert!(custom.is_measurement());
    }

    #[test]
    fn test_custom_gate_keeps_name_and_params() {
        let gate = Gate::Custom {
            name: "snapshot".to_string(),
            params: vec![Param::Text("label".to_string())],
        };
        let base = gate.lower();
        assert_eq!(base, BaseInstruction::with_params("snapshot", vec![Param::Text("label".to_string())]));
    }

    #[test]
    fn test_c_if_attaches_condition() {
        let q = QuantumRegister::new("q", 1);
        let c = ClassicalRegister::new("c", 2);
        let op = Operation::gate(Gate::X, vec![q.qubit(0)]).c_if(&c, 3u32);
        let condition = op.condition().expect("condition attached");
        assert_eq!(condition.register, "c");
        assert_eq!(condition.value, BigUint::from(3u32));
        assert_eq!(op.to_string(), "x q[0] if c==3");
    }

    #[test]
    fn test_with_condition_replaces_earlier_condition() {
        let q = QuantumRegister::new("q", 1);
        let c = ClassicalRegister::new("c", 2);
        let op = Operation::gate(Gate::Z, vec![q.qubit(0)])
            .c_if(&c, 1u32)
            .with_condition(Condition::new("flags", 2u32));
        assert_eq!(op.condition(), Some(&Condition::new("flags", 2u32)));
        assert_eq!(op.opcode(), &Gate::Z);
        assert_eq!(op.qubits(), &[q.qubit(0)]);
        assert!(op.clbits().is_empty());
    }
}
