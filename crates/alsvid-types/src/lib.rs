//! Alsvid core types
//!
//! This crate provides the leaf data types shared by every layer of the
//! Alsvid QIR execution engine:
//!
//! - Qubit and measurement-result handles matching the QIR pointer ABI
//! - The four single-qubit Pauli operators
//! - Opaque array/tuple payload handles
//! - Entry-point attribute and module-flag snapshots

pub mod handle;
pub mod metadata;
pub mod pauli;

pub use handle::{ArrayRef, QubitId, ResultId, TupleRef};
pub use metadata::{EntryPointAttrs, ModuleFlags};
pub use pauli::{InvalidPauli, Pauli};
