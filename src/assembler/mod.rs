// src/assembler/mod.rs

//! Assembles a batch of circuits into one flat-addressed [`Bundle`].
//!
//! Per circuit: build the qubit and classical-bit address tables
//! ([`labels`]), lower the operations ([`lowering`]) and derive the header
//! ([`header`]). The batch step keeps running maxima of the sizing fields
//! and overlays them on the caller's run configuration.

pub mod header;
pub mod labels;
pub mod lowering;

use crate::bundle::{Bundle, BundleConfig, BundleHeader, Experiment, ExperimentConfig, RunConfig};
use crate::circuits::Circuit;
use crate::core::{AssembleError, BitKind};
use labels::BitLabels;
use rayon::prelude::*;
use tracing::debug;

/// Lowers a single circuit into an [`Experiment`].
///
/// Address tables and conditional-slot counters live only for the duration
/// of this call.
pub fn assemble_experiment(circuit: &Circuit) -> Result<Experiment, AssembleError> {
    let qubits = BitLabels::from_registers(circuit.name(), BitKind::Qubit, circuit.qregs())?;
    let clbits = BitLabels::from_registers(circuit.name(), BitKind::Clbit, circuit.cregs())?;

    let instructions = lowering::lower_circuit(circuit, &qubits, &clbits)?;
    let header = header::build_header(circuit, &qubits, &clbits);
    let config = ExperimentConfig {
        n_qubits: qubits.len(),
        memory_slots: clbits.len(),
    };

    debug!(
        circuit = circuit.name(),
        n_qubits = config.n_qubits,
        memory_slots = config.memory_slots,
        instructions = instructions.len(),
        "assembled experiment"
    );
    Ok(Experiment { header, config, instructions })
}

/// Entry point for batch assembly.
///
/// # Examples
/// ```
/// use qbundle::{Assembler, BundleHeader, CircuitBuilder, ClassicalRegister, QuantumRegister, RunConfig};
///
/// let circuit = CircuitBuilder::new("empty")
///     .add_qreg(QuantumRegister::new("q", 2))
///     .add_creg(ClassicalRegister::new("c", 1))
///     .build();
/// let bundle = Assembler::new()
///     .assemble(&[circuit], &RunConfig::new().set("shots", 100), "job-1", BundleHeader::new())
///     .expect("assembly failed");
/// assert_eq!(bundle.config.n_qubits, 2);
/// assert_eq!(bundle.config.get("shots"), Some(&serde_json::json!(100)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Assembler {
    /// Lower circuits on the rayon pool instead of sequentially.
    parallel: bool,
}

impl Assembler {
    /// Creates a sequential assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables parallel per-circuit lowering.
    /// The bundle produced is identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Assembles `circuits` into a bundle.
    ///
    /// # Arguments
    /// * `circuits` - Circuits in the order their experiments should appear.
    /// * `run_config` - Run options copied into the bundle config.
    /// * `id` - Batch identifier.
    /// * `header` - Batch header, passed through untouched.
    ///
    /// # Returns
    /// * `Ok(Bundle)` whose `n_qubits`/`memory_slots` are the maxima over
    ///   all experiments (0 for an empty batch).
    /// * `Err(AssembleError)` from the first circuit that fails; no partial
    ///   bundle is produced.
    pub fn assemble(
        &self,
        circuits: &[Circuit],
        run_config: &RunConfig,
        id: impl Into<String>,
        header: BundleHeader,
    ) -> Result<Bundle, AssembleError> {
        let id = id.into();
        debug!(id = %id, circuits = circuits.len(), parallel = self.parallel, "assembling bundle");

        let experiments: Vec<Experiment> = if self.parallel {
            // Indexed collect keeps input order regardless of completion order.
            circuits.par_iter().map(assemble_experiment).collect::<Result<_, _>>()?
        } else {
            circuits.iter().map(assemble_experiment).collect::<Result<_, _>>()?
        };

        let (max_n_qubits, max_memory_slots) = experiments.iter().fold((0, 0), |(q, m), e| {
            (q.max(e.config.n_qubits), m.max(e.config.memory_slots))
        });

        Ok(Bundle {
            id,
            header,
            config: BundleConfig::overlay(run_config, max_n_qubits, max_memory_slots),
            experiments,
        })
    }
}

/// Assembles `circuits` sequentially. See [`Assembler::assemble`].
pub fn assemble_circuits(
    circuits: &[Circuit],
    run_config: &RunConfig,
    id: impl Into<String>,
    header: BundleHeader,
) -> Result<Bundle, AssembleError> {
    Assembler::new().assemble(circuits, run_config, id, header)
}

/// Assembles `circuits` with per-circuit lowering spread over the rayon pool.
pub fn assemble_circuits_parallel(
    circuits: &[Circuit],
    run_config: &RunConfig,
    id: impl Into<String>,
    header: BundleHeader,
) -> Result<Bundle, AssembleError> {
    Assembler::new().parallel(true).assemble(circuits, run_config, id, header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::{ClassicalRegister, QuantumRegister};
    use crate::operations::{Gate, Operation};

    fn sized(name: &str, n_qubits: usize, n_clbits: usize) -> Circuit {
        let q = QuantumRegister::new("q", n_qubits);
        CircuitBuilder::new(name)
            .add_qreg(q.clone())
            .add_creg(ClassicalRegister::new("c", n_clbits))
            .add_op(Operation::gate(Gate::H, vec![q.qubit(0)]))
            .build()
    }

    #[test]
    fn test_maxima_taken_independently() -> Result<(), AssembleError> {
        let circuits = vec![sized("a", 1, 5), sized("b", 4, 1)];
        let bundle = assemble_circuits(&circuits, &RunConfig::new(), "id", BundleHeader::new())?;
        assert_eq!(bundle.config.n_qubits, 4);
        assert_eq!(bundle.config.memory_slots, 5);
        Ok(())
    }

    #[test]
    fn test_first_failure_aborts_batch() {
        let q = QuantumRegister::new("q", 1);
        let broken = CircuitBuilder::new("broken")
            .add_qreg(q.clone())
            .add_op(Operation::gate(Gate::X, vec![QuantumRegister::new("r", 1).qubit(0)]))
            .build();
        let circuits = vec![sized("ok", 1, 1), broken, sized("ok2", 1, 1)];
        let result = assemble_circuits(&circuits, &RunConfig::new(), "id", BundleHeader::new());
        assert!(matches!(result, Err(AssembleError::UnmappedBit { ref circuit, .. }) if circuit == "broken"));

        let parallel = assemble_circuits_parallel(&circuits, &RunConfig::new(), "id", BundleHeader::new());
        assert!(parallel.is_err());
    }
}
