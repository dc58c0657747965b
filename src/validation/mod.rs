// src/validation/mod.rs

//! Structural checks over an assembled [`Bundle`].
//!
//! A bundle produced by the assembler always passes; these checks exist for
//! bundles read back from the wire or built by hand, and as an oracle in tests.

use crate::bundle::{Bundle, Experiment, Instruction};
use crate::core::AssembleError;

/// Checks one experiment's addressing and conditional-slot layout.
///
/// # Errors
/// Returns `AssembleError::InvalidBundle` describing the first violation:
/// * header and config sizes disagree;
/// * a qubit index is `>= n_qubits`, or a memory/register index is `>= memory_slots`;
/// * conditional-test slots are not `memory_slots, memory_slots + 1, ...`;
/// * a test is not immediately followed by an instruction reading its slot;
/// * an instruction reads a slot no preceding test wrote.
pub fn validate_experiment(experiment: &Experiment) -> Result<(), AssembleError> {
    let name = &experiment.header.name;
    let n_qubits = experiment.config.n_qubits;
    let memory_slots = experiment.config.memory_slots;

    if experiment.header.n_qubits != n_qubits || experiment.header.memory_slots != memory_slots {
        return Err(AssembleError::invalid_bundle(format!(
            "experiment '{}': header sizes ({}, {}) differ from config ({}, {})",
            name, experiment.header.n_qubits, experiment.header.memory_slots, n_qubits, memory_slots
        )));
    }
    if experiment.header.qubit_labels.len() != n_qubits || experiment.header.clbit_labels.len() != memory_slots {
        return Err(AssembleError::invalid_bundle(format!(
            "experiment '{}': label tables do not match declared sizes",
            name
        )));
    }

    let mut next_slot = memory_slots;
    let instructions = &experiment.instructions;
    for (pc, instruction) in instructions.iter().enumerate() {
        match instruction {
            Instruction::Test(test) => {
                if test.slot() != next_slot {
                    return Err(AssembleError::invalid_bundle(format!(
                        "experiment '{}' pc {}: conditional slot {} out of sequence (expected {})",
                        name, pc, test.slot(), next_slot
                    )));
                }
                if let Some(bit) = test.mask().ones().into_iter().find(|&b| b >= memory_slots) {
                    return Err(AssembleError::invalid_bundle(format!(
                        "experiment '{}' pc {}: mask bit {} outside memory",
                        name, pc, bit
                    )));
                }
                let gated = instructions
                    .get(pc + 1)
                    .and_then(Instruction::as_op)
                    .and_then(|op| op.conditional());
                if gated != Some(test.slot()) {
                    return Err(AssembleError::invalid_bundle(format!(
                        "experiment '{}' pc {}: conditional test is not followed by the instruction it gates",
                        name, pc
                    )));
                }
                next_slot += 1;
            }
            Instruction::Op(op) => {
                if let Some(bad) = op.qubits().into_iter().flatten().find(|&&q| q >= n_qubits) {
                    return Err(AssembleError::invalid_bundle(format!(
                        "experiment '{}' pc {}: qubit {} outside 0..{}",
                        name, pc, bad, n_qubits
                    )));
                }
                let mut classical = op.memory().into_iter().chain(op.register()).flatten();
                if let Some(bad) = classical.find(|&&m| m >= memory_slots) {
                    return Err(AssembleError::invalid_bundle(format!(
                        "experiment '{}' pc {}: memory slot {} outside 0..{}",
                        name, pc, bad, memory_slots
                    )));
                }
                if let Some(slot) = op.conditional() {
                    if slot < memory_slots || slot >= next_slot {
                        return Err(AssembleError::invalid_bundle(format!(
                            "experiment '{}' pc {}: conditional slot {} was never written",
                            name, pc, slot
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Checks every experiment and that the bundle sizing covers all of them.
pub fn validate_bundle(bundle: &Bundle) -> Result<(), AssembleError> {
    for experiment in &bundle.experiments {
        validate_experiment(experiment)?;
        if experiment.config.n_qubits > bundle.config.n_qubits
            || experiment.config.memory_slots > bundle.config.memory_slots
        {
            return Err(AssembleError::invalid_bundle(format!(
                "experiment '{}' exceeds bundle sizing ({} qubits, {} memory slots)",
                experiment.header.name, bundle.config.n_qubits, bundle.config.memory_slots
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble_circuits;
    use crate::bundle::{BundleHeader, RunConfig};
    use crate::circuits::CircuitBuilder;
    use crate::core::{ClassicalRegister, QuantumRegister};
    use crate::operations::{Gate, Operation};

    fn conditional_bundle() -> Bundle {
        let q = QuantumRegister::new("q", 2);
        let c = ClassicalRegister::new("c", 2);
        let circuit = CircuitBuilder::new("cond")
            .add_qreg(q.clone())
            .add_creg(c.clone())
            .add_op(Operation::measure(q.qubit(0), c.clbit(0)))
            .add_op(Operation::gate(Gate::X, vec![q.qubit(1)]).c_if(&c, 1u32))
            .build();
        assemble_circuits(&[circuit], &RunConfig::new(), "v", BundleHeader::new()).unwrap()
    }

    #[test]
    fn test_assembled_bundle_is_valid() {
        assert!(validate_bundle(&conditional_bundle()).is_ok());
    }

    #[test]
    fn test_detects_detached_conditional_test() {
        let mut bundle = conditional_bundle();
        // Drop the gated instruction so the test dangles at the end.
        bundle.experiments[0].instructions.pop();
        let err = validate_bundle(&bundle).unwrap_err();
        assert!(err.to_string().contains("not followed"));
    }

    #[test]
    fn test_detects_undersized_bundle() {
        let mut bundle = conditional_bundle();
        bundle.config.n_qubits = 1;
        assert!(matches!(validate_bundle(&bundle), Err(AssembleError::InvalidBundle { .. })));
    }
}
