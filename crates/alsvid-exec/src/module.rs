//! QIR module loading and metadata extraction.

use inkwell::attributes::AttributeLoc;
use inkwell::context::Context;
use inkwell::memory_buffer::MemoryBuffer;
use inkwell::module::Module;
use inkwell::values::FunctionValue;
use std::fs;
use std::path::Path;
use tracing::debug;

use alsvid_types::{EntryPointAttrs, ModuleFlags};

use crate::error::{ExecError, ExecResult};

/// A parsed QIR module: the LLVM IR, the chosen entry point, and the
/// metadata read off it at load time.
///
/// Single-owner; consumed by [`Executor::new`](crate::Executor::new).
pub struct QirModule {
    // `module` borrows `context`; declaration order keeps it dropped first.
    module: Module<'static>,
    entry_name: String,
    attrs: EntryPointAttrs,
    flags: ModuleFlags,
    context: Box<Context>,
}

impl std::fmt::Debug for QirModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QirModule")
            .field("entry_name", &self.entry_name)
            .field("attrs", &self.attrs)
            .field("flags", &self.flags)
            .finish()
    }
}

impl QirModule {
    /// Load a QIR file, textual (`.ll`) or bitcode (`.bc`); the format is
    /// detected from the content.
    pub fn load(path: impl AsRef<Path>) -> ExecResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ExecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("qir-module");
        Self::from_ir(&bytes, name)
    }

    /// Parse a QIR module from an in-memory buffer.
    pub fn from_ir(bytes: &[u8], name: &str) -> ExecResult<Self> {
        let context = Box::new(Context::create());
        // SAFETY: lifetime erasure only. `module` never outlives `context`:
        // both live inside this struct, and drop order disposes the module
        // (and the engine borrowing it) before the context.
        let ctx: &'static Context = unsafe { &*(context.as_ref() as *const Context) };

        let buffer = MemoryBuffer::create_from_memory_range(bytes, name);
        let module = ctx
            .create_module_from_ir(buffer)
            .map_err(|err| ExecError::Parse(err.to_string()))?;

        let entry = find_entry_point(&module).ok_or(ExecError::NoEntryPoint)?;
        let entry_name = entry
            .get_name()
            .to_str()
            .map_err(|err| ExecError::Parse(format!("entry-point name is not UTF-8: {err}")))?
            .to_owned();
        debug!("selected QIR entry point `{entry_name}`");

        let attrs = read_entry_attrs(entry)?;
        let flags = read_module_flags(&module);

        Ok(QirModule {
            module,
            entry_name,
            attrs,
            flags,
            context,
        })
    }

    /// Name of the function chosen as entry point.
    pub fn entry_point_name(&self) -> &str {
        &self.entry_name
    }

    /// String attributes attached to the entry point.
    pub fn entry_point_attrs(&self) -> &EntryPointAttrs {
        &self.attrs
    }

    /// The module's recognized `qir_*` flags.
    pub fn module_flags(&self) -> &ModuleFlags {
        &self.flags
    }

    pub(crate) fn llvm(&self) -> &Module<'static> {
        &self.module
    }

    pub(crate) fn snapshots(&self) -> (String, EntryPointAttrs, ModuleFlags) {
        (self.entry_name.clone(), self.attrs.clone(), self.flags)
    }
}

/// First function carrying the `entry_point` string attribute, in module
/// order; falls back to a function named `main`. Extra candidates are
/// ignored, not rejected.
fn find_entry_point<'ctx>(module: &Module<'ctx>) -> Option<FunctionValue<'ctx>> {
    module
        .get_functions()
        .find(|f| {
            f.get_string_attribute(AttributeLoc::Function, "entry_point")
                .is_some()
        })
        .or_else(|| module.get_function("main"))
}

fn read_entry_attrs(entry: FunctionValue<'_>) -> ExecResult<EntryPointAttrs> {
    let mut pairs = Vec::new();
    for attr in entry.attributes(AttributeLoc::Function) {
        if !attr.is_string() {
            continue;
        }
        let key = attr.get_string_kind_id();
        let value = attr.get_string_value();
        let (Ok(key), Ok(value)) = (key.to_str(), value.to_str()) else {
            continue;
        };
        pairs.push((key.to_owned(), value.to_owned()));
    }
    let attrs = EntryPointAttrs::from_pairs(pairs);

    // The two counted attributes must be decimal unsigned when present.
    for key in ["required_num_qubits", "required_num_results"] {
        if let Some(value) = attrs.get(key) {
            if value.parse::<u64>().is_err() {
                return Err(ExecError::AttrInvalid {
                    key: key.to_owned(),
                    value: value.to_owned(),
                });
            }
        }
    }
    Ok(attrs)
}

fn read_module_flags(module: &Module<'_>) -> ModuleFlags {
    let mut flags = ModuleFlags::default();
    for node in module.get_global_metadata("llvm.module.flags") {
        let values = node.get_node_values();
        // A module flag is the triple (behavior, key, value).
        let [_, key, value] = values.as_slice() else {
            continue;
        };
        if !key.is_metadata_value() {
            continue;
        }
        let key_metadata = key.into_metadata_value();
        let Some(name) = key_metadata
            .get_string_value()
            .and_then(|s| s.to_str().ok())
        else {
            continue;
        };
        let int_value = if value.is_int_value() {
            value.into_int_value().get_zero_extended_constant()
        } else {
            None
        };
        match name {
            "qir_major_version" => flags.qir_major_version = int_value.map(|v| v as u32),
            "qir_minor_version" => flags.qir_minor_version = int_value.map(|v| v as u32),
            "dynamic_qubit_management" => {
                flags.dynamic_qubit_management = int_value.map(|v| v != 0);
            }
            "dynamic_result_management" => {
                flags.dynamic_result_management = int_value.map(|v| v != 0);
            }
            _ => {}
        }
    }
    flags
}
