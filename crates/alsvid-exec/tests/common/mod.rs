//! Recording and misbehaving test backends shared by the integration
//! suite.
#![allow(dead_code)]

use std::ffi::CStr;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use alsvid_exec::{
    BackendError, BackendResult, EntryPointAttrs, Pauli, QuantumInterface, QubitId, ResultId,
    RuntimeInterface,
};

/// The active-interface slots are process state, so tests that call
/// `Executor::run` serialize on this lock; the harness otherwise runs
/// them on parallel threads.
pub static RUN_LOCK: Mutex<()> = Mutex::new(());

pub fn run_lock() -> std::sync::MutexGuard<'static, ()> {
    RUN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared, ordered record of every backend call.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn tag_text(tag: Option<&CStr>) -> String {
    tag.map(|t| t.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<null>".into())
}

/// Quantum backend that records every dispatched operation in order.
pub struct RecordingQuantum {
    pub log: CallLog,
    pub seen_attrs: Arc<Mutex<Option<EntryPointAttrs>>>,
    next_result: u64,
}

impl RecordingQuantum {
    pub fn new(log: CallLog) -> Self {
        RecordingQuantum {
            log,
            seen_attrs: Arc::new(Mutex::new(None)),
            next_result: 0,
        }
    }
}

impl QuantumInterface for RecordingQuantum {
    fn set_up(&mut self, attrs: &EntryPointAttrs) -> BackendResult<()> {
        *self.seen_attrs.lock().unwrap() = Some(attrs.clone());
        self.log.push("set_up");
        Ok(())
    }

    fn tear_down(&mut self) -> BackendResult<()> {
        self.log.push("tear_down");
        Ok(())
    }

    fn h(&mut self, q: QubitId) -> BackendResult<()> {
        self.log.push(format!("h {q}"));
        Ok(())
    }

    fn x(&mut self, q: QubitId) -> BackendResult<()> {
        self.log.push(format!("x {q}"));
        Ok(())
    }

    fn rz(&mut self, theta: f64, q: QubitId) -> BackendResult<()> {
        self.log.push(format!("rz {theta} {q}"));
        Ok(())
    }

    fn r(&mut self, pauli: Pauli, theta: f64, q: QubitId) -> BackendResult<()> {
        self.log.push(format!("r {pauli} {theta} {q}"));
        Ok(())
    }

    fn cnot(&mut self, control: QubitId, target: QubitId) -> BackendResult<()> {
        self.log.push(format!("cnot {control} {target}"));
        Ok(())
    }

    fn reset(&mut self, q: QubitId) -> BackendResult<()> {
        self.log.push(format!("reset {q}"));
        Ok(())
    }

    fn m(&mut self, q: QubitId) -> BackendResult<ResultId> {
        let r = ResultId(self.next_result);
        self.next_result += 1;
        self.log.push(format!("m {q} -> {r}"));
        Ok(r)
    }

    fn mz(&mut self, q: QubitId, r: ResultId) -> BackendResult<()> {
        self.log.push(format!("mz {q} {r}"));
        Ok(())
    }

    fn mresetz(&mut self, q: QubitId, r: ResultId) -> BackendResult<()> {
        self.log.push(format!("mresetz {q} {r}"));
        Ok(())
    }

    fn read_result(&mut self, r: ResultId) -> BackendResult<bool> {
        self.log.push(format!("read_result {r}"));
        Ok(false)
    }
}

/// Runtime backend that records output calls and keeps the default heap
/// memory functions.
pub struct RecordingRuntime {
    pub log: CallLog,
}

impl RecordingRuntime {
    pub fn new(log: CallLog) -> Self {
        RecordingRuntime { log }
    }
}

impl RuntimeInterface for RecordingRuntime {
    fn initialize(&mut self, _env: Option<&CStr>) -> BackendResult<()> {
        self.log.push("initialize");
        Ok(())
    }

    fn array_record_output(&mut self, length: u64, tag: Option<&CStr>) -> BackendResult<()> {
        self.log
            .push(format!("array_record_output {length} {}", tag_text(tag)));
        Ok(())
    }

    fn tuple_record_output(&mut self, length: u64, tag: Option<&CStr>) -> BackendResult<()> {
        self.log
            .push(format!("tuple_record_output {length} {}", tag_text(tag)));
        Ok(())
    }

    fn result_record_output(&mut self, result: ResultId, tag: Option<&CStr>) -> BackendResult<()> {
        self.log
            .push(format!("result_record_output {result} {}", tag_text(tag)));
        Ok(())
    }
}

/// Quantum backend whose `h` always fails; everything else records.
pub struct FailingQuantum {
    pub log: CallLog,
}

impl QuantumInterface for FailingQuantum {
    fn set_up(&mut self, _attrs: &EntryPointAttrs) -> BackendResult<()> {
        self.log.push("set_up");
        Ok(())
    }

    fn tear_down(&mut self) -> BackendResult<()> {
        self.log.push("tear_down");
        Ok(())
    }

    fn h(&mut self, _q: QubitId) -> BackendResult<()> {
        Err(BackendError::msg("h gate rejected"))
    }
}

/// Quantum backend that parks inside its first gate until released, so a
/// second `run` can be attempted while this one is in flight.
pub struct BlockingQuantum {
    pub log: CallLog,
    pub entered: mpsc::Sender<()>,
    pub release: mpsc::Receiver<()>,
}

impl QuantumInterface for BlockingQuantum {
    fn set_up(&mut self, _attrs: &EntryPointAttrs) -> BackendResult<()> {
        self.log.push("set_up");
        Ok(())
    }

    fn tear_down(&mut self) -> BackendResult<()> {
        self.log.push("tear_down");
        Ok(())
    }

    fn h(&mut self, q: QubitId) -> BackendResult<()> {
        self.log.push(format!("h {q}"));
        self.entered.send(()).expect("observer hung up");
        self.release.recv().expect("release channel closed");
        Ok(())
    }
}
