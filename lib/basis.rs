//! Labels for the computational basis states of a finite register of qubits.
//!
//! A [`BasisState`] is an integer bit pattern together with the number of
//! qubits it spans. Qubit indices count from the *most* significant bit, so
//! qubit 0 of `∣0110⟩` is 0 and qubit 1 is 1. The same type doubles as the
//! container for measurement outcomes, built up one qubit at a time with
//! [`push_qubit`][BasisState::push_qubit].

use std::fmt;

/// A single basis state of a register of qubits: a bit pattern and its width.
///
/// Qubit index 0 addresses the most significant bit of the pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BasisState {
    bits: usize,
    width: usize,
}

impl Default for BasisState {
    fn default() -> Self { Self::empty() }
}

impl BasisState {
    /// Create a new basis state from a bit pattern and a qubit count.
    ///
    /// *Panics if `bits` does not fit in `width` qubits.*
    pub fn new(bits: usize, width: usize) -> Self {
        if width >= usize::BITS as usize {
            panic!("BasisState: width {} exceeds the available bits", width);
        }
        if bits >> width != 0 {
            panic!(
                "BasisState: bit pattern {} does not fit in {} qubit(s)",
                bits, width,
            );
        }
        Self { bits, width }
    }

    /// Create a new basis state of zero qubits.
    pub fn empty() -> Self { Self { bits: 0, width: 0 } }

    /// Return the number of qubits spanned.
    pub fn width(&self) -> usize { self.width }

    /// Return the raw bit pattern.
    pub fn to_integer(&self) -> usize { self.bits }

    /// Return the value of the `i`-th qubit.
    ///
    /// *Panics if `i` is out of bounds.*
    pub fn qubit(&self, i: usize) -> bool {
        if i >= self.width {
            panic!(
                "BasisState: qubit index {} out of bounds for {} qubit(s)",
                i, self.width,
            );
        }
        self.bits >> (self.width - 1 - i) & 1 == 1
    }

    /// Return a copy of `self` with the `i`-th qubit set to `value`.
    ///
    /// *Panics if `i` is out of bounds.*
    pub fn with_qubit(self, i: usize, value: bool) -> Self {
        if i >= self.width {
            panic!(
                "BasisState: qubit index {} out of bounds for {} qubit(s)",
                i, self.width,
            );
        }
        let mask: usize = 1 << (self.width - 1 - i);
        let bits: usize =
            if value { self.bits | mask } else { self.bits & !mask };
        Self { bits, width: self.width }
    }

    /// Append a new least significant qubit, growing the width by one.
    ///
    /// *Panics if the grown pattern would not fit in a `usize`.*
    pub fn push_qubit(&mut self, value: bool) {
        if self.width + 1 >= usize::BITS as usize {
            panic!("BasisState: width {} exceeds the available bits",
                self.width + 1);
        }
        self.bits = self.bits << 1 | usize::from(value);
        self.width += 1;
    }

    /// Render the bit pattern with qubit 0 leftmost.
    pub fn bit_string(&self) -> String {
        (0..self.width)
            .map(|i| if self.qubit(i) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for BasisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "∣{}⟩", self.bit_string())
    }
}
