// src/assembler/lowering.rs

//! Lowers one circuit's operations into flat-addressed instructions.
//!
//! Register-conditioned operations become a two-instruction idiom: a
//! synthesized [`ConditionalTest`] comparing a bitmask over the flat
//! classical address space, immediately followed by the original
//! instruction pointing at the test's result slot.

use super::labels::BitLabels;
use crate::bundle::{ConditionalTest, HexBits, Instruction, LoweredInstruction};
use crate::circuits::Circuit;
use crate::core::{AssembleError, BitKind, Register};
use crate::operations::{Condition, Lower, Operation};
use tracing::trace;

/// Per-circuit lowering state. Discarded once the circuit is lowered.
struct LoweringContext<'a> {
    circuit: &'a Circuit,
    qubits: &'a BitLabels,
    clbits: &'a BitLabels,
    /// Set once for the whole circuit: any operation carries a condition.
    has_conditionals: bool,
    /// Conditional tests synthesized so far in this circuit.
    tests_emitted: usize,
}

impl<'a> LoweringContext<'a> {
    fn resolve(&self, table: &BitLabels, register: &str, offset: usize) -> Result<usize, AssembleError> {
        table.index_of(register, offset).ok_or_else(|| AssembleError::UnmappedBit {
            circuit: self.circuit.name().to_string(),
            kind: table.kind(),
            register: register.to_string(),
            offset,
        })
    }

    fn lower_operation(&mut self, op: &Operation, out: &mut Vec<Instruction>) -> Result<(), AssembleError> {
        let mut lowered = LoweredInstruction::from(op.opcode().lower());

        if !op.qubits().is_empty() {
            let indices = op
                .qubits()
                .iter()
                .map(|q| self.resolve(self.qubits, &q.register, q.index))
                .collect::<Result<Vec<_>, _>>()?;
            lowered = lowered.with_qubits(indices);
        }

        if !op.clbits().is_empty() {
            let indices = op
                .clbits()
                .iter()
                .map(|c| self.resolve(self.clbits, &c.register, c.index))
                .collect::<Result<Vec<_>, _>>()?;
            // Every measurement in a circuit with any conditional is routed
            // into the conditional register space, whether or not a later
            // condition reads it.
            if self.has_conditionals && op.opcode().is_measurement() {
                lowered = lowered.with_register(indices.clone());
            }
            lowered = lowered.with_memory(indices);
        }

        if let Some(condition) = op.condition() {
            let test = self.synthesize_test(condition)?;
            lowered = lowered.with_conditional(test.slot());
            out.push(Instruction::Test(test));
        }

        out.push(Instruction::Op(lowered));
        Ok(())
    }

    /// Builds the mask/val test for `register == value` and claims the next slot.
    fn synthesize_test(&mut self, condition: &Condition) -> Result<ConditionalTest, AssembleError> {
        if !self.circuit.cregs().iter().any(|c| c.name() == condition.register) {
            return Err(AssembleError::UnknownConditionRegister {
                circuit: self.circuit.name().to_string(),
                register: condition.register.clone(),
            });
        }

        let mut mask = HexBits::zero();
        let mut val = HexBits::zero();
        for (flat, offset) in self.clbits.register_bits(&condition.register) {
            mask.set_bit(flat);
            // The value is read at the intra-register offset but placed at the flat index.
            if condition.value.bit(offset as u64) {
                val.set_bit(flat);
            }
        }

        let slot = self.clbits.len() + self.tests_emitted;
        self.tests_emitted += 1;
        trace!(
            circuit = self.circuit.name(),
            register = %condition.register,
            %mask,
            %val,
            slot,
            "synthesized conditional test"
        );
        Ok(ConditionalTest::new(mask, val, slot))
    }
}

/// Lowers every operation of `circuit`, in order, against its address tables.
///
/// # Arguments
/// * `circuit` - The circuit to lower.
/// * `qubits` - The circuit's qubit address table.
/// * `clbits` - The circuit's classical-bit address table; its length is
///   the circuit's memory-slot count and the first conditional-test slot.
///
/// # Returns
/// * `Ok(Vec<Instruction>)` with synthesized tests interleaved before the
///   instructions they gate.
/// * `Err(AssembleError)` if any bit reference or condition register is not
///   declared by the circuit.
pub fn lower_circuit(
    circuit: &Circuit,
    qubits: &BitLabels,
    clbits: &BitLabels,
) -> Result<Vec<Instruction>, AssembleError> {
    debug_assert_eq!(qubits.kind(), BitKind::Qubit);
    debug_assert_eq!(clbits.kind(), BitKind::Clbit);

    let mut ctx = LoweringContext {
        circuit,
        qubits,
        clbits,
        has_conditionals: circuit.has_conditionals(),
        tests_emitted: 0,
    };

    let mut instructions = Vec::with_capacity(circuit.len());
    for op in circuit.operations() {
        ctx.lower_operation(op, &mut instructions)?;
    }
    Ok(instructions)
}
