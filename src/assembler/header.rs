// src/assembler/header.rs

//! Experiment header: a projection of the circuit's address tables and
//! register declarations.

use super::labels::BitLabels;
use crate::bundle::{ExperimentHeader, RegisterSize};
use crate::circuits::Circuit;
use crate::core::Register;

fn register_sizes<R: Register>(registers: &[R]) -> Vec<RegisterSize> {
    registers
        .iter()
        .map(|r| RegisterSize(r.name().to_string(), r.size()))
        .collect()
}

/// Builds the header for `circuit` from its two address tables.
pub fn build_header(circuit: &Circuit, qubits: &BitLabels, clbits: &BitLabels) -> ExperimentHeader {
    ExperimentHeader {
        name: circuit.name().to_string(),
        qubit_labels: qubits.labels().to_vec(),
        clbit_labels: clbits.labels().to_vec(),
        qreg_sizes: register_sizes(circuit.qregs()),
        creg_sizes: register_sizes(circuit.cregs()),
        n_qubits: qubits.len(),
        memory_slots: clbits.len(),
    }
}
