//! JIT construction and guarded execution of a QIR entry point.

use inkwell::execution_engine::ExecutionEngine;
use inkwell::targets::{InitializationConfig, Target};
use std::mem;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use tracing::{debug, trace, warn};

use alsvid_hal::{BackendError, QuantumInterface, RuntimeInterface};
use alsvid_types::{EntryPointAttrs, ModuleFlags};

use crate::binder;
use crate::config::EngineConfig;
use crate::error::{ExecError, ExecResult};
use crate::guard::ScopedExit;
use crate::module::QirModule;
use crate::session::{self, ActiveCell};

/// Owns the JIT engine built from a QIR module and runs its entry point
/// against caller-supplied backends.
///
/// Construction consumes the module, builds the engine, and installs a
/// trampoline mapping for every quantum symbol the module references.
/// The executor holds no backend references between calls; backends are
/// borrowed only for the duration of one [`run`](Self::run).
pub struct Executor {
    // `engine` borrows the module's LLVM context; declaration order keeps
    // it dropped before `module`.
    engine: ExecutionEngine<'static>,
    entry_name: String,
    attrs: EntryPointAttrs,
    flags: ModuleFlags,
    unbound: Vec<String>,
    #[allow(dead_code)]
    module: QirModule,
}

impl Executor {
    /// Build a JIT engine from a loaded module and bind its quantum
    /// symbols.
    pub fn new(module: QirModule, config: EngineConfig) -> ExecResult<Self> {
        // Idempotent; registers the native code generator and asm printer.
        Target::initialize_native(&InitializationConfig::default()).map_err(ExecError::Engine)?;

        let engine = module
            .llvm()
            .create_jit_execution_engine(config.opt_level.into())
            .map_err(|err| ExecError::Engine(err.to_string()))?;

        // Resolve every referenced quantum symbol out of the fixed table.
        // Unknown `__quantum__*` names do not fail construction; they fail
        // `run`, before any backend call.
        let mut unbound = Vec::new();
        for function in module.llvm().get_functions() {
            if function.count_basic_blocks() != 0 {
                continue;
            }
            let Ok(name) = function.get_name().to_str() else {
                continue;
            };
            if !name.starts_with("__quantum__") {
                continue;
            }
            match binder::trampoline(name) {
                Some(addr) => {
                    trace!("bound quantum symbol `{name}`");
                    engine.add_global_mapping(&function, addr);
                }
                None => {
                    warn!("module references an unknown quantum symbol `{name}`");
                    unbound.push(name.to_owned());
                }
            }
        }

        let (entry_name, attrs, flags) = module.snapshots();
        debug!("JIT engine ready for entry point `{entry_name}`");

        Ok(Executor {
            engine,
            entry_name,
            attrs,
            flags,
            unbound,
            module,
        })
    }

    /// [`new`](Self::new) with the default [`EngineConfig`].
    pub fn with_defaults(module: QirModule) -> ExecResult<Self> {
        Self::new(module, EngineConfig::default())
    }

    /// Run the entry point once, dispatching every quantum call to the
    /// given interfaces.
    ///
    /// At most one execution may be in flight process-wide; a concurrent
    /// call fails with [`ExecError::Reentrant`] without touching its
    /// backends. On every exit path (normal return, backend error, or a
    /// foreign panic) the quantum interface is torn down and the
    /// process-wide interface slots are cleared.
    pub fn run(
        &self,
        quantum: &mut dyn QuantumInterface,
        runtime: &mut dyn RuntimeInterface,
    ) -> ExecResult<()> {
        if let Some(name) = self.unbound.first() {
            return Err(ExecError::UnknownSymbol(name.clone()));
        }

        let mut cell = ActiveCell::new(quantum, runtime);
        if !session::activate(&mut cell) {
            return Err(ExecError::Reentrant);
        }

        // From here on the interfaces are reached only through the session
        // cell; the guard tears down and clears on every exit path.
        let _guard = ScopedExit::new(|| {
            let cell = session::clear();
            if !cell.is_null() {
                session::teardown_quantum(cell);
            }
        });

        session::with_quantum(|q| q.set_up(&self.attrs)).map_err(ExecError::Backend)?;

        debug!("invoking entry point `{}`", self.entry_name);
        let address = self
            .engine
            .get_function_address(&self.entry_name)
            .map_err(|err| ExecError::Engine(err.to_string()))?;
        // SAFETY: the address is this engine's compiled `void()` entry
        // point. The pointer must be typed "C-unwind": a backend panic
        // unwinds out of the trampolines through the JIT frames, and a
        // plain "C" pointer type would turn that unwind into an abort at
        // this call site instead of reaching the catch below.
        let entry: unsafe extern "C-unwind" fn() = unsafe { mem::transmute(address) };

        let outcome = catch_unwind(AssertUnwindSafe(|| unsafe { entry() }));
        match outcome {
            Ok(()) => Ok(()),
            Err(payload) => match payload.downcast::<BackendError>() {
                Ok(backend) => Err(ExecError::Backend(*backend)),
                Err(other) => resume_unwind(other),
            },
        }
    }

    /// String attributes of the entry point, as passed to `set_up`.
    pub fn entry_point_attrs(&self) -> &EntryPointAttrs {
        &self.attrs
    }

    /// The module's recognized `qir_*` flags.
    pub fn module_flags(&self) -> &ModuleFlags {
        &self.flags
    }

    /// Name of the bound entry point.
    pub fn entry_point_name(&self) -> &str {
        &self.entry_name
    }
}
