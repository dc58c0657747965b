// src/lib.rs

//! `qbundle` - Assembles register-addressed circuits into flat-addressed bundles
//!
//! Circuits declare named quantum and classical registers and refer to bits
//! as `register[offset]`. Execution backends only understand dense integer
//! addresses, so this crate flattens each circuit into an [`Experiment`],
//! lowers register-conditioned operations into an explicit bitmask test plus
//! a gated instruction, and packs a batch of experiments into one [`Bundle`].

pub mod core;
pub mod operations;
pub mod circuits;
pub mod assembler;
pub mod bundle;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::core::{AssembleError, BitKind, ClassicalRegister, Clbit, QuantumRegister, Qubit, Register};
pub use operations::{BaseInstruction, Condition, Gate, Lower, Operation, Param};
pub use circuits::{Circuit, CircuitBuilder};
pub use assembler::{assemble_circuits, assemble_circuits_parallel, assemble_experiment, Assembler};
pub use bundle::{
    Bundle, BundleConfig, BundleHeader, ConditionalTest, Experiment, HexBits, Instruction,
    LoweredInstruction, RunConfig,
};
pub use validation::{validate_bundle, validate_experiment};

// Example 1: Conditional gate lowering
// A gate conditioned on a classical register becomes a `bfunc` test over the
// flat classical address space, followed by the gate reading the test's slot.
/// ```
/// use qbundle::{
///     assemble_circuits, BundleHeader, CircuitBuilder, ClassicalRegister, Gate, Operation,
///     QuantumRegister, RunConfig,
/// };
///
/// let q = QuantumRegister::new("q", 1);
/// let c = ClassicalRegister::new("c", 2);
/// let circuit = CircuitBuilder::new("gated")
///     .add_qreg(q.clone())
///     .add_creg(c.clone())
///     .add_op(Operation::gate(Gate::X, vec![q.qubit(0)]).c_if(&c, 3u32))
///     .build();
///
/// let bundle = assemble_circuits(&[circuit], &RunConfig::new(), "job", BundleHeader::new())
///     .expect("assembly failed");
/// let experiment = &bundle.experiments[0];
/// println!("{}", experiment);
///
/// let test = experiment.instructions[0].as_test().expect("bfunc first");
/// assert_eq!(test.mask().to_string(), "0x3");
/// assert_eq!(test.val().to_string(), "0x3");
/// assert_eq!(test.slot(), 2); // first slot above the 2 declared memory slots
///
/// let gate = experiment.instructions[1].as_op().expect("gate second");
/// assert_eq!(gate.conditional(), Some(2));
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Wire format
// Bundles serialise to JSON; `mask` and `val` are hexadecimal strings.
/// ```
/// use qbundle::{assemble_circuits, BundleHeader, CircuitBuilder, ClassicalRegister, QuantumRegister, RunConfig};
///
/// let circuit = CircuitBuilder::new("idle")
///     .add_qreg(QuantumRegister::new("q", 1))
///     .add_creg(ClassicalRegister::new("c", 1))
///     .build();
/// let header = BundleHeader::new().set("backend_name", "local_simulator");
/// let bundle = assemble_circuits(&[circuit], &RunConfig::new().set("shots", 512), "job-7", header)
///     .expect("assembly failed");
///
/// let json: serde_json::Value = serde_json::from_str(&bundle.to_json().unwrap()).unwrap();
/// assert_eq!(json["id"], "job-7");
/// assert_eq!(json["config"]["shots"], 512);
/// assert_eq!(json["experiments"][0]["header"]["qubit_labels"], serde_json::json!([["q", 0]]));
/// ```
#[doc(hidden)]
const _: () = ();
