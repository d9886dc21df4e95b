//! The single-qubit Pauli operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A byte that does not encode a Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid Pauli encoding {0}, expected 0..=3")]
pub struct InvalidPauli(pub u8);

/// One of the four single-qubit Pauli operators.
///
/// The discriminants match the QIR `%Pauli` encoding, which travels over
/// the ABI as an 8-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Pauli {
    /// Identity.
    I = 0,
    /// Pauli X.
    X = 1,
    /// Pauli Y.
    Y = 2,
    /// Pauli Z.
    Z = 3,
}

impl Pauli {
    /// Narrow an ABI byte into a Pauli operator.
    ///
    /// Values outside `0..=3` violate the QIR contract and abort: the
    /// caller sits on the ABI boundary and has no error channel.
    pub fn from_bits(bits: u8) -> Self {
        Self::try_from(bits)
            .expect("Pauli byte outside 0..=3 crossed the QIR ABI boundary")
    }
}

impl TryFrom<u8> for Pauli {
    type Error = InvalidPauli;

    fn try_from(bits: u8) -> Result<Self, InvalidPauli> {
        match bits {
            0 => Ok(Pauli::I),
            1 => Ok(Pauli::X),
            2 => Ok(Pauli::Y),
            3 => Ok(Pauli::Z),
            other => Err(InvalidPauli(other)),
        }
    }
}

impl From<Pauli> for u8 {
    fn from(p: Pauli) -> u8 {
        p as u8
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        };
        f.write_str(s)
    }
}
