//! The process-wide active-interface slots.
//!
//! QIR trampolines are plain function symbols with no closure state, so
//! the interfaces they forward to live in one process-global cell. The
//! cell is claimed by compare-and-swap at the start of `run` and cleared
//! unconditionally at its end; a non-null cell is what "an execution is
//! in flight" means. Per-thread slots would relax the single-run
//! invariant and are an explicit non-feature of the current contract.

use alsvid_hal::{QuantumInterface, RuntimeInterface};
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use tracing::warn;

/// The pair of interface pointers serviced by trampolines during one
/// execution. Stack-allocated in `run`; never outlives it.
pub(crate) struct ActiveCell {
    quantum: *mut (dyn QuantumInterface + 'static),
    runtime: *mut (dyn RuntimeInterface + 'static),
}

impl ActiveCell {
    pub(crate) fn new(
        quantum: &mut (dyn QuantumInterface + '_),
        runtime: &mut (dyn RuntimeInterface + '_),
    ) -> Self {
        // SAFETY: lifetime erasure only. `run` clears the cell before the
        // borrows end, so no dereference outlives the referents.
        unsafe {
            ActiveCell {
                quantum: mem::transmute::<
                    *mut (dyn QuantumInterface + '_),
                    *mut (dyn QuantumInterface + 'static),
                >(quantum),
                runtime: mem::transmute::<
                    *mut (dyn RuntimeInterface + '_),
                    *mut (dyn RuntimeInterface + 'static),
                >(runtime),
            }
        }
    }
}

static ACTIVE: AtomicPtr<ActiveCell> = AtomicPtr::new(ptr::null_mut());

/// Claim the slots for one execution. Fails when an execution is already
/// in flight.
pub(crate) fn activate(cell: *mut ActiveCell) -> bool {
    ACTIVE
        .compare_exchange(
            ptr::null_mut(),
            cell,
            Ordering::AcqRel,
            Ordering::Acquire,
        )
        .is_ok()
}

/// Clear the slots, returning what was bound.
pub(crate) fn clear() -> *mut ActiveCell {
    ACTIVE.swap(ptr::null_mut(), Ordering::AcqRel)
}

/// Whether no execution is in flight.
#[cfg(test)]
pub(crate) fn is_idle() -> bool {
    ACTIVE.load(Ordering::Acquire).is_null()
}

fn cell() -> *mut ActiveCell {
    let cell = ACTIVE.load(Ordering::Acquire);
    assert!(
        !cell.is_null(),
        "quantum trampoline invoked outside an active execution"
    );
    cell
}

/// Run `f` against the bound quantum interface.
///
/// Panics if no execution is in flight; trampolines are only reachable
/// from JIT'd code running under `Executor::run`.
pub(crate) fn with_quantum<T>(f: impl FnOnce(&mut dyn QuantumInterface) -> T) -> T {
    let cell = cell();
    // SAFETY: a non-null cell means `run` is in flight on this thread and
    // its borrows of the interfaces are live; execution is single-threaded
    // and trampoline calls never nest.
    unsafe { f(&mut *(*cell).quantum) }
}

/// Run `f` against the bound runtime interface.
pub(crate) fn with_runtime<T>(f: impl FnOnce(&mut dyn RuntimeInterface) -> T) -> T {
    let cell = cell();
    // SAFETY: as in `with_quantum`.
    unsafe { f(&mut *(*cell).runtime) }
}

/// Tear down the quantum interface of a cell just removed from the slot.
/// Teardown failure is logged, not propagated: the guard has no error
/// channel and teardown must not mask the run's own outcome.
pub(crate) fn teardown_quantum(cell: *mut ActiveCell) {
    // SAFETY: the caller obtained `cell` from `clear()` inside `run`, so
    // the referents are still live.
    let quantum = unsafe { &mut *(*cell).quantum };
    if let Err(err) = quantum.tear_down() {
        warn!("quantum interface teardown failed: {err}");
    }
}
