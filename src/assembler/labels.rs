// src/assembler/labels.rs

//! Flat address tables for one circuit.

use crate::bundle::BitLabel;
use crate::core::{AssembleError, BitKind, Register};
use std::collections::HashMap;

/// Bijection between `(register, offset)` labels and dense flat indices.
///
/// Registers are concatenated in declaration order, offsets ascending within
/// each register, so the table is deterministic and gap-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitLabels {
    kind: BitKind,
    labels: Vec<BitLabel>,
    index: HashMap<BitLabel, usize>,
}

impl BitLabels {
    /// Builds the table for `registers`, all of kind `kind`, of circuit `circuit`.
    ///
    /// # Errors
    /// `AssembleError::DuplicateRegister` if two registers share a name.
    pub fn from_registers<R: Register>(
        circuit: &str,
        kind: BitKind,
        registers: &[R],
    ) -> Result<Self, AssembleError> {
        let total = registers.iter().map(Register::size).sum();
        let mut labels = Vec::with_capacity(total);
        let mut index = HashMap::with_capacity(total);
        let mut seen: Vec<&str> = Vec::with_capacity(registers.len());

        for register in registers {
            if seen.contains(&register.name()) {
                return Err(AssembleError::DuplicateRegister {
                    circuit: circuit.to_string(),
                    kind,
                    name: register.name().to_string(),
                });
            }
            seen.push(register.name());

            for offset in 0..register.size() {
                let label = BitLabel(register.name().to_string(), offset);
                index.insert(label.clone(), labels.len());
                labels.push(label);
            }
        }

        Ok(Self { kind, labels, index })
    }

    pub fn kind(&self) -> BitKind {
        self.kind
    }

    /// Labels in flat-index order.
    pub fn labels(&self) -> &[BitLabel] {
        &self.labels
    }

    /// Total bit count (the size of the flat address space).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Flat index of `register[offset]`, if declared.
    pub fn index_of(&self, register: &str, offset: usize) -> Option<usize> {
        self.index.get(&BitLabel(register.to_string(), offset)).copied()
    }

    /// `(flat_index, offset)` for every bit of `register`, in offset order.
    pub fn register_bits<'a>(&'a self, register: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, label)| label.0 == register)
            .map(|(flat, label)| (flat, label.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassicalRegister, QuantumRegister};

    #[test]
    fn test_concatenates_in_declaration_order() -> Result<(), AssembleError> {
        let regs = vec![QuantumRegister::new("b", 2), QuantumRegister::new("a", 1)];
        let table = BitLabels::from_registers("t", BitKind::Qubit, &regs)?;
        assert_eq!(
            table.labels(),
            &[
                BitLabel("b".to_string(), 0),
                BitLabel("b".to_string(), 1),
                BitLabel("a".to_string(), 0),
            ]
        );
        assert_eq!(table.index_of("a", 0), Some(2));
        assert_eq!(table.index_of("a", 1), None);
        assert_eq!(table.len(), 3);
        Ok(())
    }

    #[test]
    fn test_register_bits_pair_flat_index_with_offset() -> Result<(), AssembleError> {
        let regs = vec![ClassicalRegister::new("x", 1), ClassicalRegister::new("c", 3)];
        let table = BitLabels::from_registers("t", BitKind::Clbit, &regs)?;
        let bits: Vec<(usize, usize)> = table.register_bits("c").collect();
        assert_eq!(bits, vec![(1, 0), (2, 1), (3, 2)]);
        assert_eq!(table.register_bits("missing").count(), 0);
        Ok(())
    }

    #[test]
    fn test_duplicate_register_names_rejected() {
        let regs = vec![ClassicalRegister::new("c", 1), ClassicalRegister::new("c", 2)];
        let err = BitLabels::from_registers("dup", BitKind::Clbit, &regs).unwrap_err();
        assert!(matches!(err, AssembleError::DuplicateRegister { ref name, .. } if name == "c"));
    }

    #[test]
    fn test_zero_size_register_contributes_nothing() -> Result<(), AssembleError> {
        let regs = vec![QuantumRegister::new("empty", 0), QuantumRegister::new("q", 1)];
        let table = BitLabels::from_registers("t", BitKind::Qubit, &regs)?;
        assert_eq!(table.index_of("q", 0), Some(0));
        assert!(!table.is_empty());
        Ok(())
    }
}
