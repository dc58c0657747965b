// src/core/register.rs

//! Named quantum and classical registers, and the bit references that point into them.

use std::fmt;

/// Common view over register declarations of either kind.
///
/// The flat address tables are built the same way for quantum and classical
/// registers, so the indexer is written once against this trait.
pub trait Register {
    /// Register name, unique among registers of the same kind in a circuit.
    fn name(&self) -> &str;
    /// Number of bits the register declares.
    fn size(&self) -> usize;
}

/// A named, fixed-size block of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantumRegister {
    name: String,
    size: usize,
}

impl QuantumRegister {
    /// Creates a quantum register `name` holding `size` qubits.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self { name: name.into(), size }
    }

    /// Returns a reference to qubit `index` of this register.
    ///
    /// The index is not range-checked here; an out-of-range reference is
    /// reported when the circuit is assembled.
    pub fn qubit(&self, index: usize) -> Qubit {
        Qubit { register: self.name.clone(), index }
    }

    /// All qubits of the register in offset order.
    pub fn qubits(&self) -> Vec<Qubit> {
        (0..self.size).map(|i| self.qubit(i)).collect()
    }
}

impl Register for QuantumRegister {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.size
    }
}

/// A named, fixed-size block of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassicalRegister {
    name: String,
    size: usize,
}

impl ClassicalRegister {
    /// Creates a classical register `name` holding `size` bits.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self { name: name.into(), size }
    }

    /// Returns a reference to bit `index` of this register (not range-checked).
    pub fn clbit(&self, index: usize) -> Clbit {
        Clbit { register: self.name.clone(), index }
    }

    /// All bits of the register in offset order.
    pub fn clbits(&self) -> Vec<Clbit> {
        (0..self.size).map(|i| self.clbit(i)).collect()
    }
}

impl Register for ClassicalRegister {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.size
    }
}

/// Register-relative reference to a qubit: `register[index]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qubit {
    /// Name of the quantum register.
    pub register: String,
    /// Offset within the register.
    pub index: usize,
}

/// Register-relative reference to a classical bit: `register[index]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clbit {
    /// Name of the classical register.
    pub register: String,
    /// Offset within the register.
    pub index: usize,
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}
