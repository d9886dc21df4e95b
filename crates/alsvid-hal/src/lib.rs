//! Alsvid backend abstraction layer
//!
//! This crate defines the two contracts through which the Alsvid executor
//! talks to a quantum backend, and the default heap-backed implementation
//! of the QIR runtime's reference-counted memory records.
//!
//! - [`QuantumInterface`]: every quantum instruction (`__quantum__qis__*`)
//!   the executor can forward, plus the `set_up`/`tear_down` lifecycle.
//! - [`RuntimeInterface`]: the runtime (`__quantum__rt__*`) surface:
//!   initialization, record output, and the six array/tuple memory
//!   functions. The memory functions come with default bodies backed by
//!   [`memory`], so a backend only overrides them to bring its own heap.
//!
//! Backends report failure through [`BackendError`]; the executor never
//! inspects it beyond letting it unwind back to the caller.
//!
//! # Implementing a backend
//!
//! ```rust
//! use alsvid_hal::{BackendResult, QuantumInterface, RuntimeInterface};
//! use alsvid_types::{QubitId, ResultId};
//!
//! #[derive(Default)]
//! struct Assembler {
//!     ops: Vec<String>,
//! }
//!
//! impl QuantumInterface for Assembler {
//!     fn h(&mut self, q: QubitId) -> BackendResult<()> {
//!         self.ops.push(format!("h {q}"));
//!         Ok(())
//!     }
//!
//!     fn cnot(&mut self, control: QubitId, target: QubitId) -> BackendResult<()> {
//!         self.ops.push(format!("cnot {control} {target}"));
//!         Ok(())
//!     }
//!
//!     fn mz(&mut self, q: QubitId, r: ResultId) -> BackendResult<()> {
//!         self.ops.push(format!("mz {q} -> {r}"));
//!         Ok(())
//!     }
//! }
//!
//! impl RuntimeInterface for Assembler {}
//! ```
//!
//! Every operation the backend does not implement fails with an
//! "unsupported" [`BackendError`] when a program reaches it.

pub mod error;
pub mod memory;
pub mod quantum;
pub mod runtime;

pub use error::{BackendError, BackendResult};
pub use quantum::QuantumInterface;
pub use runtime::RuntimeInterface;
