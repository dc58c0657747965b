// src/circuits/mod.rs

//! Defines structures for representing and building register-addressed
//! circuits: ordered register declarations plus an ordered list of
//! [`Operation`]s.
//!
//! A `Circuit` is read-only input to the assembler. Building one never
//! fails; malformed references (unknown registers, out-of-range offsets)
//! are reported when the circuit is assembled.

use crate::core::{ClassicalRegister, QuantumRegister, Register};
use crate::operations::Operation;
use std::fmt;

/// Represents an ordered sequence of Operations over declared registers.
///
/// Register declaration order matters: it fixes the flat address of every
/// bit (see [`crate::assembler::labels::BitLabels`]).
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// Experiment name carried into the bundle header.
    name: String,

    /// Quantum registers in declaration order.
    qregs: Vec<QuantumRegister>,

    /// Classical registers in declaration order.
    cregs: Vec<ClassicalRegister>,

    /// The ordered sequence of operations. Order is preserved through assembly.
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates a new, empty circuit called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: Vec::new(),
            cregs: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Declares a quantum register after the existing ones.
    pub fn add_qreg(&mut self, qreg: QuantumRegister) {
        self.qregs.push(qreg);
    }

    /// Declares a classical register after the existing ones.
    pub fn add_creg(&mut self, creg: ClassicalRegister) {
        self.cregs.push(creg);
    }

    /// Adds a single operation to the end of the circuit's sequence.
    ///
    /// # Arguments
    /// * `op` - The `Operation` to append to the sequence.
    pub fn add_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Adds multiple operations from an iterator to the end of the circuit's sequence.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(ops);
    }

    /// The circuit's name, used as the experiment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Total declared qubits across all quantum registers.
    pub fn n_qubits(&self) -> usize {
        self.qregs.iter().map(Register::size).sum()
    }

    /// Total declared classical bits across all classical registers.
    pub fn n_clbits(&self) -> usize {
        self.cregs.iter().map(Register::size).sum()
    }

    /// `true` if any operation in the circuit carries a condition.
    pub fn has_conditionals(&self) -> bool {
        self.operations.iter().any(|op| op.condition().is_some())
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new("circuit")
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
///
/// # Examples
/// ```
/// use qbundle::{CircuitBuilder, ClassicalRegister, Gate, Operation, QuantumRegister};
///
/// let q = QuantumRegister::new("q", 2);
/// let c = ClassicalRegister::new("c", 2);
/// let circuit = CircuitBuilder::new("bell")
///     .add_qreg(q.clone())
///     .add_creg(c.clone())
///     .add_op(Operation::gate(Gate::H, vec![q.qubit(0)]))
///     .add_op(Operation::gate(Gate::Cx, vec![q.qubit(0), q.qubit(1)]))
///     .add_op(Operation::measure(q.qubit(0), c.clbit(0)))
///     .build();
///
/// assert_eq!(circuit.n_qubits(), 2);
/// assert_eq!(circuit.len(), 3);
/// ```
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty builder for a circuit called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { circuit: Circuit::new(name) }
    }

    /// Declares a quantum register on the circuit being built.
    pub fn add_qreg(mut self, qreg: QuantumRegister) -> Self {
        self.circuit.add_qreg(qreg);
        self
    }

    /// Declares a classical register on the circuit being built.
    pub fn add_creg(mut self, creg: ClassicalRegister) -> Self {
        self.circuit.add_creg(creg);
        self
    }

    /// Adds a single operation to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self { circuit: Circuit::default() }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit '{}' [{} qubits, {} clbits, {} operations]",
            self.name,
            self.n_qubits(),
            self.n_clbits(),
            self.operations.len()
        )?;
        for qreg in &self.qregs {
            writeln!(f, "  qreg {}[{}]", qreg.name(), qreg.size())?;
        }
        for creg in &self.cregs {
            writeln!(f, "  creg {}[{}]", creg.name(), creg.size())?;
        }
        for op in &self.operations {
            writeln!(f, "  {}", op)?;
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
