//! Default heap implementation of the QIR runtime memory records.
//!
//! Arrays and tuples are reference-counted heap records with the header
//! stored immediately *before* the payload: the handle the IR sees is the
//! payload address, so element access in compiled code is plain pointer
//! displacement. An allocation is freed exactly when its reference count
//! reaches zero.
//!
//! Layout of an array record (`A` is the exposed handle):
//!
//! ```text
//! base                         A = base + size_of::<ArrayHeader>()
//! │ refcount │ elem_size │ length │ elem 0 │ elem 1 │ ...
//! ```

use std::alloc::{self, Layout};
use std::mem;

#[repr(C)]
struct ArrayHeader {
    refcount: u64,
    elem_size: u32,
    length: u64,
}

#[repr(C)]
struct TupleHeader {
    refcount: u64,
    // Sized deallocation needs the payload length back at free time.
    num_bytes: u64,
}

fn array_layout(elem_size: u32, length: u64) -> Layout {
    let payload = (elem_size as usize)
        .checked_mul(length as usize)
        .expect("array payload size overflows usize");
    Layout::from_size_align(
        mem::size_of::<ArrayHeader>() + payload,
        mem::align_of::<ArrayHeader>(),
    )
    .expect("array allocation size overflows")
}

fn tuple_layout(num_bytes: u64) -> Layout {
    Layout::from_size_align(
        mem::size_of::<TupleHeader>() + num_bytes as usize,
        mem::align_of::<TupleHeader>(),
    )
    .expect("tuple allocation size overflows")
}

/// Header of the record whose payload starts at `array`.
///
/// # Safety
/// `array` must be a live handle returned by [`array_create_1d`].
unsafe fn array_header(array: *mut u8) -> *mut ArrayHeader {
    unsafe { array.sub(mem::size_of::<ArrayHeader>()) }.cast()
}

/// # Safety
/// `tuple` must be a live handle returned by [`tuple_create`].
unsafe fn tuple_header(tuple: *mut u8) -> *mut TupleHeader {
    unsafe { tuple.sub(mem::size_of::<TupleHeader>()) }.cast()
}

/// Allocate a zero-initialized 1-D array of `length` elements of
/// `elem_size` bytes each, with reference count 1.
///
/// Returns the payload address.
pub fn array_create_1d(elem_size: u32, length: u64) -> *mut u8 {
    let layout = array_layout(elem_size, length);
    // SAFETY: the layout has non-zero size (it always covers the header).
    let base = unsafe { alloc::alloc_zeroed(layout) };
    if base.is_null() {
        alloc::handle_alloc_error(layout);
    }
    let header = base.cast::<ArrayHeader>();
    // SAFETY: `base` is a fresh allocation large enough for the header.
    unsafe {
        header.write(ArrayHeader {
            refcount: 1,
            elem_size,
            length,
        });
        base.add(mem::size_of::<ArrayHeader>())
    }
}

/// Adjust an array's reference count by `delta`, freeing the record when
/// the count reaches zero.
///
/// # Safety
/// `array` must be a live handle returned by [`array_create_1d`]. The sum
/// of all deltas applied over the handle's lifetime must not drive the
/// count below zero; touching the handle after the count reaches zero is
/// undefined.
pub unsafe fn array_update_reference_count(array: *mut u8, delta: i32) {
    let header = unsafe { array_header(array) };
    // SAFETY: caller guarantees the header is live.
    unsafe {
        let refcount = (*header).refcount.wrapping_add(delta as i64 as u64);
        (*header).refcount = refcount;
        if refcount == 0 {
            let layout = array_layout((*header).elem_size, (*header).length);
            alloc::dealloc(header.cast(), layout);
        }
    }
}

/// Address of element `index`: `array + elem_size * index`.
///
/// No bounds check, per the QIR contract.
///
/// # Safety
/// `array` must be a live handle returned by [`array_create_1d`].
pub unsafe fn array_get_element_ptr_1d(array: *mut u8, index: u64) -> *mut u8 {
    // SAFETY: caller guarantees the header is live.
    let elem_size = unsafe { (*array_header(array)).elem_size };
    unsafe { array.add(elem_size as usize * index as usize) }
}

/// The length recorded at creation.
///
/// # Safety
/// `array` must be a live handle returned by [`array_create_1d`].
pub unsafe fn array_get_size_1d(array: *mut u8) -> u64 {
    unsafe { (*array_header(array)).length }
}

/// The element size recorded at creation.
///
/// # Safety
/// `array` must be a live handle returned by [`array_create_1d`].
pub unsafe fn array_get_elem_size(array: *mut u8) -> u32 {
    unsafe { (*array_header(array)).elem_size }
}

/// Allocate a zero-initialized tuple of `num_bytes` payload bytes, with
/// reference count 1. Returns the payload address.
pub fn tuple_create(num_bytes: u64) -> *mut u8 {
    let layout = tuple_layout(num_bytes);
    // SAFETY: the layout has non-zero size (it always covers the header).
    let base = unsafe { alloc::alloc_zeroed(layout) };
    if base.is_null() {
        alloc::handle_alloc_error(layout);
    }
    let header = base.cast::<TupleHeader>();
    // SAFETY: `base` is a fresh allocation large enough for the header.
    unsafe {
        header.write(TupleHeader {
            refcount: 1,
            num_bytes,
        });
        base.add(mem::size_of::<TupleHeader>())
    }
}

/// Adjust a tuple's reference count by `delta`, freeing the record when
/// the count reaches zero.
///
/// # Safety
/// Same contract as [`array_update_reference_count`], for handles from
/// [`tuple_create`].
pub unsafe fn tuple_update_reference_count(tuple: *mut u8, delta: i32) {
    let header = unsafe { tuple_header(tuple) };
    // SAFETY: caller guarantees the header is live.
    unsafe {
        let refcount = (*header).refcount.wrapping_add(delta as i64 as u64);
        (*header).refcount = refcount;
        if refcount == 0 {
            let layout = tuple_layout((*header).num_bytes);
            alloc::dealloc(header.cast(), layout);
        }
    }
}
