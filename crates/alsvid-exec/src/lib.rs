//! Alsvid QIR execution engine
//!
//! Loads a Quantum Intermediate Representation (QIR) module (LLVM IR in
//! which quantum operations are calls to externally-declared
//! `__quantum__qis__*` / `__quantum__rt__*` symbols), resolves every
//! referenced symbol to a native trampoline, and JIT-runs the entry point
//! against backend-supplied [`QuantumInterface`] / [`RuntimeInterface`]
//! instances.
//!
//! # Running a program
//!
//! ```ignore
//! use alsvid_exec::{Executor, QirModule};
//!
//! let module = QirModule::load("bell.ll")?;
//! let executor = Executor::with_defaults(module)?;
//!
//! let mut quantum = MySimulator::new();
//! let mut runtime = MyRecorder::new();
//! executor.run(&mut quantum, &mut runtime)?;
//! # Ok::<(), alsvid_exec::ExecError>(())
//! ```
//!
//! The executor dispatches quantum calls in strict program order, adds no
//! reordering or batching, and supports at most one in-flight execution
//! per process; a concurrent `run` fails fast with
//! [`ExecError::Reentrant`]. Load and build errors surface before
//! execution; backend errors unwind out of the JIT'd program and are
//! returned as [`ExecError::Backend`], with interface teardown guaranteed
//! on every exit path.

mod binder;
pub mod config;
pub mod error;
pub mod executor;
mod guard;
pub mod module;
mod session;

pub use config::{EngineConfig, OptLevel};
pub use error::{ExecError, ExecResult};
pub use executor::Executor;
pub use module::QirModule;

// The backend-facing contracts, re-exported so a consumer can depend on
// this crate alone.
pub use alsvid_hal::{BackendError, BackendResult, QuantumInterface, RuntimeInterface};
pub use alsvid_types::{ArrayRef, EntryPointAttrs, ModuleFlags, Pauli, QubitId, ResultId, TupleRef};
