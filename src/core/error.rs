//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Which address space a bit reference or register belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitKind {
    /// Quantum bits, addressed by the experiment's `qubits` lists.
    Qubit,
    /// Classical bits, addressed by `memory` slots.
    Clbit,
}

impl fmt::Display for BitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitKind::Qubit => write!(f, "qubit"),
            BitKind::Clbit => write!(f, "clbit"),
        }
    }
}

/// Failures raised while assembling circuits into a bundle.
///
/// Assembly is all-or-nothing: the first error aborts the whole batch and
/// no partial bundle is returned.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// An operation references a bit that is not part of its circuit's
    /// flat address table. The circuit is malformed.
    #[error("Unmapped Bit: {kind} {register}[{offset}] is not declared in circuit '{circuit}'")]
    UnmappedBit {
        /// Name of the offending circuit.
        circuit: String,
        /// Address space of the reference.
        kind: BitKind,
        /// Register named by the reference.
        register: String,
        /// Offset within that register.
        offset: usize,
    },

    /// A condition names a classical register the circuit does not declare.
    #[error("Unknown Condition Register: '{register}' is not a classical register of circuit '{circuit}'")]
    UnknownConditionRegister {
        /// Name of the offending circuit.
        circuit: String,
        /// Register named by the condition.
        register: String,
    },

    /// Two registers of the same kind share a name, so the flat address
    /// table would not be a bijection.
    #[error("Duplicate Register: {kind} register '{name}' declared twice in circuit '{circuit}'")]
    DuplicateRegister {
        /// Name of the offending circuit.
        circuit: String,
        /// Register kind.
        kind: BitKind,
        /// The repeated register name.
        name: String,
    },

    /// A run configuration or batch header is not a flat key/value object.
    #[error("Invalid Run Config: {message}")]
    InvalidRunConfig {
        /// InvalidRunConfig failure message
        message: String,
    },

    /// An assembled bundle breaks one of its structural invariants.
    #[error("Invalid Bundle: {message}")]
    InvalidBundle {
        /// InvalidBundle failure message
        message: String,
    },

    /// Encoding or decoding the wire format failed.
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssembleError {
    /// Convenience constructor for `InvalidBundle`.
    pub(crate) fn invalid_bundle(message: impl Into<String>) -> Self {
        AssembleError::InvalidBundle { message: message.into() }
    }
}
