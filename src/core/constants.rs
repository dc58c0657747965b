//! Fixed names used by the flat instruction format.

/// Instruction and relation names understood by consuming backends.
pub mod wire_names {
    /// Name of the synthesized boolean-function (conditional test) instruction.
    pub const BFUNC: &str = "bfunc";
    /// Opcode name that denotes a measurement.
    pub const MEASURE: &str = "measure";
    /// Equality relation of a conditional test.
    pub const EQUALS: &str = "==";
}
