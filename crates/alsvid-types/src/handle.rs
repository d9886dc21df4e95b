//! Qubit, result, and runtime-record handles.
//!
//! QIR passes qubits and measurement results as opaque `%Qubit*` /
//! `%Result*` pointers whose integer value is the index assigned by the
//! program. The newtypes here carry that 64-bit bit-pattern unchanged;
//! only the backend gives it meaning.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque index of a qubit within a QIR program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u64> for QubitId {
    fn from(bits: u64) -> Self {
        QubitId(bits)
    }
}

/// Opaque index of a classical measurement slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultId(pub u64);

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl From<u64> for ResultId {
    fn from(bits: u64) -> Self {
        ResultId(bits)
    }
}

/// Handle to the payload of a reference-counted runtime array.
///
/// Points at the first element byte; the record header lies immediately
/// before the payload. The handle is borrowed by backends for the duration
/// of one call and must not be retained across executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRef(pub *mut u8);

impl ArrayRef {
    /// The raw payload address.
    pub fn as_ptr(self) -> *mut u8 {
        self.0
    }

    /// Whether the handle is the null array.
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// Handle to the payload of a reference-counted runtime tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleRef(pub *mut u8);

impl TupleRef {
    /// The raw payload address.
    pub fn as_ptr(self) -> *mut u8 {
        self.0
    }

    /// Whether the handle is the null tuple.
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qubit_display() {
        assert_eq!(format!("{}", QubitId(3)), "q3");
        assert_eq!(format!("{}", ResultId(0)), "r0");
    }

    #[test]
    fn bit_pattern_is_preserved() {
        // The full 64-bit range round-trips untouched.
        for bits in [0, 1, u64::MAX, 0x8000_0000_0000_0000] {
            assert_eq!(QubitId::from(bits).0, bits);
            assert_eq!(ResultId::from(bits).0, bits);
        }
    }

    #[test]
    fn serde_round_trip() {
        let q = QubitId(42);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(serde_json::from_str::<QubitId>(&json).unwrap(), q);
    }
}
