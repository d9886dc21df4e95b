//! The quantum instruction contract.

use alsvid_types::{ArrayRef, EntryPointAttrs, Pauli, QubitId, ResultId, TupleRef};
use std::ffi::CStr;

use crate::error::{BackendError, BackendResult};

/// Receiver for every quantum instruction (`__quantum__qis__*`) the
/// executor can forward, plus the per-run lifecycle.
///
/// All operations default to an "unsupported" [`BackendError`], so a
/// backend implements exactly the gate set it speaks; a program touching
/// anything else fails at the offending call. The lifecycle hooks default
/// to no-ops.
///
/// Calls arrive in strict program order of the executed IR, on a single
/// thread, strictly between `set_up` and `tear_down`. Qubit and result
/// handles are opaque indices; only the backend assigns them meaning.
#[allow(unused_variables)]
pub trait QuantumInterface {
    // ── Lifecycle ─────────────────────────────────────────────────

    /// Called once before the entry point runs, with the entry point's
    /// attribute snapshot (`required_num_qubits` and friends).
    fn set_up(&mut self, attrs: &EntryPointAttrs) -> BackendResult<()> {
        Ok(())
    }

    /// Called once on every exit path after the entry point finishes,
    /// whether it returned or unwound.
    fn tear_down(&mut self) -> BackendResult<()> {
        Ok(())
    }

    // ── Single-qubit gates ────────────────────────────────────────

    /// Hadamard.
    fn h(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("h"))
    }

    /// Pauli X.
    fn x(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("x"))
    }

    /// Pauli Y.
    fn y(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("y"))
    }

    /// Pauli Z.
    fn z(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("z"))
    }

    /// Phase gate S.
    fn s(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("s"))
    }

    /// Adjoint of S.
    fn s_adj(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("s_adj"))
    }

    /// T gate.
    fn t(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("t"))
    }

    /// Adjoint of T.
    fn t_adj(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("t_adj"))
    }

    /// Reset a qubit to |0⟩.
    fn reset(&mut self, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("reset"))
    }

    // ── Rotations ─────────────────────────────────────────────────

    /// Rotation about X by `theta` radians.
    fn rx(&mut self, theta: f64, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("rx"))
    }

    /// Rotation about Y by `theta` radians.
    fn ry(&mut self, theta: f64, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("ry"))
    }

    /// Rotation about Z by `theta` radians.
    fn rz(&mut self, theta: f64, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("rz"))
    }

    /// Controlled X rotation: `ctls` is a qubit array, `args` packs the
    /// angle and target.
    fn rx_ctl(&mut self, ctls: ArrayRef, args: TupleRef) -> BackendResult<()> {
        Err(BackendError::unsupported("rx_ctl"))
    }

    /// Controlled Y rotation.
    fn ry_ctl(&mut self, ctls: ArrayRef, args: TupleRef) -> BackendResult<()> {
        Err(BackendError::unsupported("ry_ctl"))
    }

    /// Controlled Z rotation.
    fn rz_ctl(&mut self, ctls: ArrayRef, args: TupleRef) -> BackendResult<()> {
        Err(BackendError::unsupported("rz_ctl"))
    }

    /// Rotation about a chosen Pauli axis.
    fn r(&mut self, pauli: Pauli, theta: f64, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("r"))
    }

    /// Adjoint of [`r`](Self::r).
    fn r_adj(&mut self, pauli: Pauli, theta: f64, q: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("r_adj"))
    }

    // ── Multi-qubit gates ─────────────────────────────────────────

    /// Controlled NOT.
    fn cnot(&mut self, control: QubitId, target: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("cnot"))
    }

    /// Controlled X (alias gate of its own in the instruction set).
    fn cx(&mut self, control: QubitId, target: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("cx"))
    }

    /// Controlled Y.
    fn cy(&mut self, control: QubitId, target: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("cy"))
    }

    /// Controlled Z.
    fn cz(&mut self, control: QubitId, target: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("cz"))
    }

    /// Exchange two qubits.
    fn swap(&mut self, a: QubitId, b: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("swap"))
    }

    /// Two-qubit XX rotation.
    fn rxx(&mut self, theta: f64, a: QubitId, b: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("rxx"))
    }

    /// Two-qubit YY rotation.
    fn ryy(&mut self, theta: f64, a: QubitId, b: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("ryy"))
    }

    /// Two-qubit ZZ rotation.
    fn rzz(&mut self, theta: f64, a: QubitId, b: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("rzz"))
    }

    /// Toffoli.
    fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> BackendResult<()> {
        Err(BackendError::unsupported("ccx"))
    }

    /// Exponential of a Pauli-string Hamiltonian: `paulis` and `qubits`
    /// are parallel runtime arrays.
    fn exp(&mut self, paulis: ArrayRef, theta: f64, qubits: ArrayRef) -> BackendResult<()> {
        Err(BackendError::unsupported("exp"))
    }

    /// Adjoint of [`exp`](Self::exp).
    fn exp_adj(&mut self, paulis: ArrayRef, theta: f64, qubits: ArrayRef) -> BackendResult<()> {
        Err(BackendError::unsupported("exp_adj"))
    }

    // ── Measurement ───────────────────────────────────────────────

    /// Measure a qubit in the Z basis, returning a fresh result handle.
    fn m(&mut self, q: QubitId) -> BackendResult<ResultId> {
        Err(BackendError::unsupported("m"))
    }

    /// Joint measurement in a Pauli-string basis over parallel arrays.
    fn measure(&mut self, paulis: ArrayRef, qubits: ArrayRef) -> BackendResult<ResultId> {
        Err(BackendError::unsupported("measure"))
    }

    /// Measure a qubit in the Z basis into the given result slot.
    fn mz(&mut self, q: QubitId, r: ResultId) -> BackendResult<()> {
        Err(BackendError::unsupported("mz"))
    }

    /// Measure in the Z basis into the given slot, then reset the qubit.
    fn mresetz(&mut self, q: QubitId, r: ResultId) -> BackendResult<()> {
        Err(BackendError::unsupported("mresetz"))
    }

    /// Read the bit previously stored in a result slot.
    ///
    /// Distinct from [`mz`](Self::mz): this reads, it does not measure.
    fn read_result(&mut self, r: ResultId) -> BackendResult<bool> {
        Err(BackendError::unsupported("read_result"))
    }

    // ── Assertions ────────────────────────────────────────────────

    /// Assert that measuring `qubits` in the `paulis` basis yields
    /// `result` with probability `prob`, within `tol`.
    fn assert_measurement_probability(
        &mut self,
        paulis: ArrayRef,
        qubits: ArrayRef,
        result: ResultId,
        prob: f64,
        msg: Option<&CStr>,
        tol: f64,
    ) -> BackendResult<()> {
        Err(BackendError::unsupported("assert_measurement_probability"))
    }

    /// Controlled form of
    /// [`assert_measurement_probability`](Self::assert_measurement_probability).
    fn assert_measurement_probability_ctl(
        &mut self,
        ctls: ArrayRef,
        args: TupleRef,
    ) -> BackendResult<()> {
        Err(BackendError::unsupported("assert_measurement_probability_ctl"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl QuantumInterface for Bare {}

    #[test]
    fn lifecycle_defaults_to_noop() {
        let mut b = Bare;
        assert!(b.set_up(&EntryPointAttrs::default()).is_ok());
        assert!(b.tear_down().is_ok());
    }

    #[test]
    fn operations_default_to_unsupported() {
        let mut b = Bare;
        let err = b.h(QubitId(0)).unwrap_err();
        assert!(err.to_string().contains("`h`"));
        assert!(b.m(QubitId(1)).is_err());
        assert!(b.read_result(ResultId(0)).is_err());
    }
}
