//! The runtime contract.

use alsvid_types::ResultId;
use std::ffi::CStr;

use crate::error::{BackendError, BackendResult};
use crate::memory;

/// Receiver for the runtime (`__quantum__rt__*`) surface of a QIR
/// program: environment initialization, record output, and the six
/// array/tuple memory functions.
///
/// The memory functions default to the heap records in [`memory`]; a
/// backend overrides them only to substitute its own allocator. The
/// record-output operations default to "unsupported" so that output
/// silently vanishing is impossible.
#[allow(unused_variables)]
pub trait RuntimeInterface {
    /// Initialize the execution environment, resetting qubits. `env` is
    /// an opaque, possibly absent, environment string from the program.
    fn initialize(&mut self, env: Option<&CStr>) -> BackendResult<()> {
        Ok(())
    }

    // ── Record output ─────────────────────────────────────────────

    /// Mark the following `length` results as an array labeled `tag`.
    fn array_record_output(&mut self, length: u64, tag: Option<&CStr>) -> BackendResult<()> {
        Err(BackendError::unsupported("array_record_output"))
    }

    /// Mark the following `length` results as a tuple labeled `tag`.
    fn tuple_record_output(&mut self, length: u64, tag: Option<&CStr>) -> BackendResult<()> {
        Err(BackendError::unsupported("tuple_record_output"))
    }

    /// Record one measurement result into the program output.
    fn result_record_output(&mut self, result: ResultId, tag: Option<&CStr>) -> BackendResult<()> {
        Err(BackendError::unsupported("result_record_output"))
    }

    // ── Memory management ─────────────────────────────────────────

    /// Allocate a zeroed 1-D array; see [`memory::array_create_1d`].
    fn array_create_1d(&mut self, elem_size: u32, length: u64) -> *mut u8 {
        memory::array_create_1d(elem_size, length)
    }

    /// Adjust an array's reference count, freeing at zero.
    ///
    /// # Safety
    /// `array` must be a live handle produced by this interface's
    /// [`array_create_1d`](Self::array_create_1d); deltas must balance.
    unsafe fn array_update_reference_count(&mut self, array: *mut u8, delta: i32) {
        unsafe { memory::array_update_reference_count(array, delta) }
    }

    /// Address of element `index`, with no bounds check.
    ///
    /// # Safety
    /// `array` must be a live handle produced by this interface.
    unsafe fn array_get_element_ptr_1d(&mut self, array: *mut u8, index: u64) -> *mut u8 {
        unsafe { memory::array_get_element_ptr_1d(array, index) }
    }

    /// The array's recorded length.
    ///
    /// # Safety
    /// `array` must be a live handle produced by this interface.
    unsafe fn array_get_size_1d(&mut self, array: *mut u8) -> u64 {
        unsafe { memory::array_get_size_1d(array) }
    }

    /// Allocate a zeroed tuple; see [`memory::tuple_create`].
    fn tuple_create(&mut self, num_bytes: u64) -> *mut u8 {
        memory::tuple_create(num_bytes)
    }

    /// Adjust a tuple's reference count, freeing at zero.
    ///
    /// # Safety
    /// Same contract as
    /// [`array_update_reference_count`](Self::array_update_reference_count).
    unsafe fn tuple_update_reference_count(&mut self, tuple: *mut u8, delta: i32) {
        unsafe { memory::tuple_update_reference_count(tuple, delta) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl RuntimeInterface for Bare {}

    #[test]
    fn default_memory_functions_are_live() {
        let mut rt = Bare;
        let a = rt.array_create_1d(4, 2);
        unsafe {
            assert_eq!(rt.array_get_size_1d(a), 2);
            assert_eq!(rt.array_get_element_ptr_1d(a, 1), a.add(4));
            rt.array_update_reference_count(a, -1);
        }
        let t = rt.tuple_create(8);
        unsafe {
            rt.tuple_update_reference_count(t, -1);
        }
    }

    #[test]
    fn record_output_defaults_to_unsupported() {
        let mut rt = Bare;
        assert!(rt.initialize(None).is_ok());
        assert!(rt.array_record_output(2, None).is_err());
        assert!(rt.result_record_output(ResultId(0), None).is_err());
    }
}
