// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod register;

// Re-export public types for convenient access via `qbundle::core::TypeName`
pub use error::{AssembleError, BitKind};
pub use register::{ClassicalRegister, Clbit, QuantumRegister, Qubit, Register};

pub mod constants;
pub use constants::wire_names; // Re-export
