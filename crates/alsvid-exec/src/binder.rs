//! The quantum symbol table and its native trampolines.
//!
//! Every `__quantum__qis__*` / `__quantum__rt__*` symbol of the
//! instruction set maps to one `extern "C-unwind"` function whose
//! signature byte-matches the IR declaration: qubit and result pointers
//! arrive as their 64-bit index bit-pattern, angles as IEEE-754 binary64,
//! arrays/tuples/strings as raw pointers. Each trampoline wraps the raw
//! values in typed handles and forwards to the interface bound in
//! [`session`](crate::session).
//!
//! A backend error has no way back through the void QIR ABI, so it
//! unwinds: `forward` panics with the `BackendError` payload, the unwind
//! crosses the JIT frames (hence `"C-unwind"`), and `Executor::run`
//! catches and re-materializes it.

use alsvid_types::{ArrayRef, Pauli, QubitId, ResultId, TupleRef};
use std::ffi::{c_char, CStr};
use std::panic::panic_any;

use alsvid_hal::BackendResult;

use crate::session;

/// Address of the trampoline for a quantum symbol, if the name is in the
/// instruction set. One lookup covers the whole set; there is no second
/// table.
pub(crate) fn trampoline(name: &str) -> Option<usize> {
    let addr = match name {
        "__quantum__qis__h__body" => qis_h_body as usize,
        "__quantum__qis__x__body" => qis_x_body as usize,
        "__quantum__qis__y__body" => qis_y_body as usize,
        "__quantum__qis__z__body" => qis_z_body as usize,
        "__quantum__qis__s__body" => qis_s_body as usize,
        "__quantum__qis__s__adj" => qis_s_adj as usize,
        "__quantum__qis__t__body" => qis_t_body as usize,
        "__quantum__qis__t__adj" => qis_t_adj as usize,
        "__quantum__qis__reset__body" => qis_reset_body as usize,
        "__quantum__qis__rx__body" => qis_rx_body as usize,
        "__quantum__qis__ry__body" => qis_ry_body as usize,
        "__quantum__qis__rz__body" => qis_rz_body as usize,
        "__quantum__qis__rx__ctl" => qis_rx_ctl as usize,
        "__quantum__qis__ry__ctl" => qis_ry_ctl as usize,
        "__quantum__qis__rz__ctl" => qis_rz_ctl as usize,
        "__quantum__qis__r__body" => qis_r_body as usize,
        "__quantum__qis__r__adj" => qis_r_adj as usize,
        "__quantum__qis__cnot__body" => qis_cnot_body as usize,
        "__quantum__qis__cx__body" => qis_cx_body as usize,
        "__quantum__qis__cy__body" => qis_cy_body as usize,
        "__quantum__qis__cz__body" => qis_cz_body as usize,
        "__quantum__qis__swap__body" => qis_swap_body as usize,
        "__quantum__qis__rxx__body" => qis_rxx_body as usize,
        "__quantum__qis__ryy__body" => qis_ryy_body as usize,
        "__quantum__qis__rzz__body" => qis_rzz_body as usize,
        "__quantum__qis__ccx__body" => qis_ccx_body as usize,
        "__quantum__qis__exp__body" => qis_exp_body as usize,
        "__quantum__qis__exp__adj" => qis_exp_adj as usize,
        "__quantum__qis__m__body" => qis_m_body as usize,
        "__quantum__qis__measure__body" => qis_measure_body as usize,
        "__quantum__qis__mz__body" => qis_mz_body as usize,
        "__quantum__qis__mresetz__body" => qis_mresetz_body as usize,
        "__quantum__qis__read_result__body" => qis_read_result_body as usize,
        "__quantum__qis__assertmeasurementprobability__body" => {
            qis_assertmeasurementprobability_body as usize
        }
        "__quantum__qis__assertmeasurementprobability__ctl" => {
            qis_assertmeasurementprobability_ctl as usize
        }
        "__quantum__rt__initialize" => rt_initialize as usize,
        "__quantum__rt__array_record_output" => rt_array_record_output as usize,
        "__quantum__rt__tuple_record_output" => rt_tuple_record_output as usize,
        "__quantum__rt__result_record_output" => rt_result_record_output as usize,
        "__quantum__rt__array_create_1d" => rt_array_create_1d as usize,
        "__quantum__rt__array_update_reference_count" => rt_array_update_reference_count as usize,
        "__quantum__rt__array_get_element_ptr_1d" => rt_array_get_element_ptr_1d as usize,
        "__quantum__rt__array_get_size_1d" => rt_array_get_size_1d as usize,
        "__quantum__rt__tuple_create" => rt_tuple_create as usize,
        "__quantum__rt__tuple_update_reference_count" => rt_tuple_update_reference_count as usize,
        _ => return None,
    };
    Some(addr)
}

fn forward<T>(outcome: BackendResult<T>) -> T {
    match outcome {
        Ok(value) => value,
        Err(err) => panic_any(err),
    }
}

/// # Safety
/// `ptr` must be null or point at a nul-terminated string live for the
/// duration of the call (QIR string constants are baked into the module).
unsafe fn opt_cstr<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) })
    }
}

// ── qis: single-qubit gates ───────────────────────────────────────

unsafe extern "C-unwind" fn qis_h_body(q: u64) {
    forward(session::with_quantum(|i| i.h(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_x_body(q: u64) {
    forward(session::with_quantum(|i| i.x(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_y_body(q: u64) {
    forward(session::with_quantum(|i| i.y(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_z_body(q: u64) {
    forward(session::with_quantum(|i| i.z(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_s_body(q: u64) {
    forward(session::with_quantum(|i| i.s(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_s_adj(q: u64) {
    forward(session::with_quantum(|i| i.s_adj(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_t_body(q: u64) {
    forward(session::with_quantum(|i| i.t(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_t_adj(q: u64) {
    forward(session::with_quantum(|i| i.t_adj(QubitId(q))));
}

unsafe extern "C-unwind" fn qis_reset_body(q: u64) {
    forward(session::with_quantum(|i| i.reset(QubitId(q))));
}

// ── qis: rotations ────────────────────────────────────────────────

unsafe extern "C-unwind" fn qis_rx_body(theta: f64, q: u64) {
    forward(session::with_quantum(|i| i.rx(theta, QubitId(q))));
}

unsafe extern "C-unwind" fn qis_ry_body(theta: f64, q: u64) {
    forward(session::with_quantum(|i| i.ry(theta, QubitId(q))));
}

unsafe extern "C-unwind" fn qis_rz_body(theta: f64, q: u64) {
    forward(session::with_quantum(|i| i.rz(theta, QubitId(q))));
}

unsafe extern "C-unwind" fn qis_rx_ctl(ctls: *mut u8, args: *mut u8) {
    forward(session::with_quantum(|i| {
        i.rx_ctl(ArrayRef(ctls), TupleRef(args))
    }));
}

unsafe extern "C-unwind" fn qis_ry_ctl(ctls: *mut u8, args: *mut u8) {
    forward(session::with_quantum(|i| {
        i.ry_ctl(ArrayRef(ctls), TupleRef(args))
    }));
}

unsafe extern "C-unwind" fn qis_rz_ctl(ctls: *mut u8, args: *mut u8) {
    forward(session::with_quantum(|i| {
        i.rz_ctl(ArrayRef(ctls), TupleRef(args))
    }));
}

unsafe extern "C-unwind" fn qis_r_body(pauli: u8, theta: f64, q: u64) {
    let pauli = Pauli::from_bits(pauli);
    forward(session::with_quantum(|i| i.r(pauli, theta, QubitId(q))));
}

unsafe extern "C-unwind" fn qis_r_adj(pauli: u8, theta: f64, q: u64) {
    let pauli = Pauli::from_bits(pauli);
    forward(session::with_quantum(|i| i.r_adj(pauli, theta, QubitId(q))));
}

// ── qis: multi-qubit gates ────────────────────────────────────────

unsafe extern "C-unwind" fn qis_cnot_body(control: u64, target: u64) {
    forward(session::with_quantum(|i| {
        i.cnot(QubitId(control), QubitId(target))
    }));
}

unsafe extern "C-unwind" fn qis_cx_body(control: u64, target: u64) {
    forward(session::with_quantum(|i| {
        i.cx(QubitId(control), QubitId(target))
    }));
}

unsafe extern "C-unwind" fn qis_cy_body(control: u64, target: u64) {
    forward(session::with_quantum(|i| {
        i.cy(QubitId(control), QubitId(target))
    }));
}

unsafe extern "C-unwind" fn qis_cz_body(control: u64, target: u64) {
    forward(session::with_quantum(|i| {
        i.cz(QubitId(control), QubitId(target))
    }));
}

unsafe extern "C-unwind" fn qis_swap_body(a: u64, b: u64) {
    forward(session::with_quantum(|i| i.swap(QubitId(a), QubitId(b))));
}

unsafe extern "C-unwind" fn qis_rxx_body(theta: f64, a: u64, b: u64) {
    forward(session::with_quantum(|i| {
        i.rxx(theta, QubitId(a), QubitId(b))
    }));
}

unsafe extern "C-unwind" fn qis_ryy_body(theta: f64, a: u64, b: u64) {
    forward(session::with_quantum(|i| {
        i.ryy(theta, QubitId(a), QubitId(b))
    }));
}

unsafe extern "C-unwind" fn qis_rzz_body(theta: f64, a: u64, b: u64) {
    forward(session::with_quantum(|i| {
        i.rzz(theta, QubitId(a), QubitId(b))
    }));
}

unsafe extern "C-unwind" fn qis_ccx_body(c1: u64, c2: u64, target: u64) {
    forward(session::with_quantum(|i| {
        i.ccx(QubitId(c1), QubitId(c2), QubitId(target))
    }));
}

unsafe extern "C-unwind" fn qis_exp_body(paulis: *mut u8, theta: f64, qubits: *mut u8) {
    forward(session::with_quantum(|i| {
        i.exp(ArrayRef(paulis), theta, ArrayRef(qubits))
    }));
}

unsafe extern "C-unwind" fn qis_exp_adj(paulis: *mut u8, theta: f64, qubits: *mut u8) {
    forward(session::with_quantum(|i| {
        i.exp_adj(ArrayRef(paulis), theta, ArrayRef(qubits))
    }));
}

// ── qis: measurement ──────────────────────────────────────────────

unsafe extern "C-unwind" fn qis_m_body(q: u64) -> u64 {
    forward(session::with_quantum(|i| i.m(QubitId(q)))).0
}

unsafe extern "C-unwind" fn qis_measure_body(paulis: *mut u8, qubits: *mut u8) -> u64 {
    forward(session::with_quantum(|i| {
        i.measure(ArrayRef(paulis), ArrayRef(qubits))
    }))
    .0
}

unsafe extern "C-unwind" fn qis_mz_body(q: u64, r: u64) {
    forward(session::with_quantum(|i| i.mz(QubitId(q), ResultId(r))));
}

unsafe extern "C-unwind" fn qis_mresetz_body(q: u64, r: u64) {
    forward(session::with_quantum(|i| i.mresetz(QubitId(q), ResultId(r))));
}

unsafe extern "C-unwind" fn qis_read_result_body(r: u64) -> bool {
    forward(session::with_quantum(|i| i.read_result(ResultId(r))))
}

// ── qis: assertions ───────────────────────────────────────────────

unsafe extern "C-unwind" fn qis_assertmeasurementprobability_body(
    paulis: *mut u8,
    qubits: *mut u8,
    result: u64,
    prob: f64,
    msg: *const c_char,
    tol: f64,
) {
    let msg = unsafe { opt_cstr(msg) };
    forward(session::with_quantum(|i| {
        i.assert_measurement_probability(
            ArrayRef(paulis),
            ArrayRef(qubits),
            ResultId(result),
            prob,
            msg,
            tol,
        )
    }));
}

unsafe extern "C-unwind" fn qis_assertmeasurementprobability_ctl(ctls: *mut u8, args: *mut u8) {
    forward(session::with_quantum(|i| {
        i.assert_measurement_probability_ctl(ArrayRef(ctls), TupleRef(args))
    }));
}

// ── rt: initialization and record output ──────────────────────────

unsafe extern "C-unwind" fn rt_initialize(env: *const c_char) {
    let env = unsafe { opt_cstr(env) };
    forward(session::with_runtime(|i| i.initialize(env)));
}

unsafe extern "C-unwind" fn rt_array_record_output(length: u64, tag: *const c_char) {
    let tag = unsafe { opt_cstr(tag) };
    forward(session::with_runtime(|i| i.array_record_output(length, tag)));
}

unsafe extern "C-unwind" fn rt_tuple_record_output(length: u64, tag: *const c_char) {
    let tag = unsafe { opt_cstr(tag) };
    forward(session::with_runtime(|i| i.tuple_record_output(length, tag)));
}

unsafe extern "C-unwind" fn rt_result_record_output(r: u64, tag: *const c_char) {
    let tag = unsafe { opt_cstr(tag) };
    forward(session::with_runtime(|i| {
        i.result_record_output(ResultId(r), tag)
    }));
}

// ── rt: memory management ─────────────────────────────────────────

unsafe extern "C-unwind" fn rt_array_create_1d(elem_size: u32, length: u64) -> *mut u8 {
    session::with_runtime(|i| i.array_create_1d(elem_size, length))
}

unsafe extern "C-unwind" fn rt_array_update_reference_count(array: *mut u8, delta: i32) {
    session::with_runtime(|i| unsafe { i.array_update_reference_count(array, delta) });
}

unsafe extern "C-unwind" fn rt_array_get_element_ptr_1d(array: *mut u8, index: u64) -> *mut u8 {
    session::with_runtime(|i| unsafe { i.array_get_element_ptr_1d(array, index) })
}

unsafe extern "C-unwind" fn rt_array_get_size_1d(array: *mut u8) -> u64 {
    session::with_runtime(|i| unsafe { i.array_get_size_1d(array) })
}

unsafe extern "C-unwind" fn rt_tuple_create(num_bytes: u64) -> *mut u8 {
    session::with_runtime(|i| i.tuple_create(num_bytes))
}

unsafe extern "C-unwind" fn rt_tuple_update_reference_count(tuple: *mut u8, delta: i32) {
    session::with_runtime(|i| unsafe { i.tuple_update_reference_count(tuple, delta) });
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every symbol name in the instruction set, in table order.
    static SYMBOL_NAMES: &[&str] = &[
        "__quantum__qis__h__body",
        "__quantum__qis__x__body",
        "__quantum__qis__y__body",
        "__quantum__qis__z__body",
        "__quantum__qis__s__body",
        "__quantum__qis__s__adj",
        "__quantum__qis__t__body",
        "__quantum__qis__t__adj",
        "__quantum__qis__reset__body",
        "__quantum__qis__rx__body",
        "__quantum__qis__ry__body",
        "__quantum__qis__rz__body",
        "__quantum__qis__rx__ctl",
        "__quantum__qis__ry__ctl",
        "__quantum__qis__rz__ctl",
        "__quantum__qis__r__body",
        "__quantum__qis__r__adj",
        "__quantum__qis__cnot__body",
        "__quantum__qis__cx__body",
        "__quantum__qis__cy__body",
        "__quantum__qis__cz__body",
        "__quantum__qis__swap__body",
        "__quantum__qis__rxx__body",
        "__quantum__qis__ryy__body",
        "__quantum__qis__rzz__body",
        "__quantum__qis__ccx__body",
        "__quantum__qis__exp__body",
        "__quantum__qis__exp__adj",
        "__quantum__qis__m__body",
        "__quantum__qis__measure__body",
        "__quantum__qis__mz__body",
        "__quantum__qis__mresetz__body",
        "__quantum__qis__read_result__body",
        "__quantum__qis__assertmeasurementprobability__body",
        "__quantum__qis__assertmeasurementprobability__ctl",
        "__quantum__rt__initialize",
        "__quantum__rt__array_record_output",
        "__quantum__rt__tuple_record_output",
        "__quantum__rt__result_record_output",
        "__quantum__rt__array_create_1d",
        "__quantum__rt__array_update_reference_count",
        "__quantum__rt__array_get_element_ptr_1d",
        "__quantum__rt__array_get_size_1d",
        "__quantum__rt__tuple_create",
        "__quantum__rt__tuple_update_reference_count",
    ];

    #[test]
    fn every_listed_symbol_has_a_trampoline() {
        for name in SYMBOL_NAMES {
            assert!(trampoline(name).is_some(), "`{name}` is unmapped");
        }
    }

    #[test]
    fn lookup_rejects_unknown_names() {
        assert_eq!(trampoline("__quantum__qis__zzzz__body"), None);
        assert_eq!(trampoline("__quantum__rt__qubit_allocate"), None);
        assert_eq!(trampoline("memcpy"), None);
    }

    #[test]
    fn every_trampoline_address_is_distinct() {
        let addrs: Vec<usize> = SYMBOL_NAMES
            .iter()
            .map(|name| trampoline(name).expect("mapped"))
            .collect();
        for (i, addr) in addrs.iter().enumerate() {
            assert_ne!(*addr, 0);
            assert!(
                !addrs[i + 1..].contains(addr),
                "`{}` shares a trampoline address",
                SYMBOL_NAMES[i]
            );
        }
    }
}
