//! Operators applicable to a register of qubits.
//!
//! A gate acting on *m* qubits comes in one of three representations, each a
//! different trade of generality against storage:
//! - [`Unitary`]: a fully general, dense 2<sup>*m*</sup> × 2<sup>*m*</sup>
//!   complex matrix.
//! - [`Bijection`]: a permutation of basis-state indices, i.e. a classical
//!   reversible function embedded in a quantum register, e.g. an oracle.
//! - [`Rotation`]: a complex phase per basis-state index, a diagonal unitary
//!   stored without the 2<sup>*m*</sup> × 2<sup>*m*</sup> zeros.
//!
//! All three share the [`LocalOperator`] application contract and support
//! [`controlled`][Operator::controlled] extension by a leading control qubit;
//! [`Operator`] holds any of them as one closed type. Common named gates are
//! provided as statics ([`HADAMARD`], [`CNOT`], ...).

use std::{
    f64::consts::FRAC_1_SQRT_2,
    fmt,
    ops::{ Index, Mul, Neg },
};
use nalgebra as na;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;

const ZERO: C64 = C64 { re: 0.0, im: 0.0 };
const ONE:  C64 = C64 { re: 1.0, im: 0.0 };
const ORT2: C64 = C64 { re: FRAC_1_SQRT_2, im: 0.0 };

/// Shared behavior of the three operator representations: application to a
/// single local basis-state index.
///
/// An operator of size `N = 2^m` acts on `m` qubits at a time. Applying it to
/// a local input index `x ∈ 0..N` yields one or more local output indices,
/// each with a complex factor multiplying the input amplitude; a register
/// drives the application without knowing which representation it holds.
pub trait LocalOperator {
    /// Return the operator's dimension `N = 2^m`.
    fn size(&self) -> usize;

    /// Call `visit` once per `(output_index, amplitude_factor)` pair produced
    /// by applying the operator to local input index `x`.
    ///
    /// *Panics if `x` is not in `0..self.size()`.*
    fn for_each_output<F>(&self, x: usize, visit: F)
    where F: FnMut(usize, C64);
}

/* Unitary ********************************************************************/

/// A general *m*-qubit gate as a dense 2<sup>*m*</sup> × 2<sup>*m*</sup>
/// complex matrix.
///
/// Entry `(x, j)` is the factor sending local input index `x` to local output
/// index `j`. The matrix is expected to satisfy U<sup>†</sup>U = I; this is
/// *not* checked at runtime (see [`is_unitary`][Self::is_unitary] for tests).
#[derive(Clone, Debug, PartialEq)]
pub struct Unitary {
    mat: na::DMatrix<C64>,
}

impl Unitary {
    /// Create a new gate from a matrix.
    ///
    /// *Panics if the matrix is not square.*
    pub fn new(mat: na::DMatrix<C64>) -> Self {
        if !mat.is_square() {
            panic!(
                "Unitary: matrix must be square, got {}x{}",
                mat.nrows(), mat.ncols(),
            );
        }
        Self { mat }
    }

    /// Create the `n`-dimensional identity.
    pub fn identity(n: usize) -> Self {
        Self { mat: na::DMatrix::identity(n, n) }
    }

    /// Return a reference to the underlying matrix.
    pub fn matrix(&self) -> &na::DMatrix<C64> { &self.mat }

    /// Return the tensor (Kronecker) product `self ⊗ rhs`.
    pub fn tensor(&self, rhs: &Self) -> Self {
        Self { mat: self.mat.kronecker(&rhs.mat) }
    }

    /// Return the element-wise complex conjugate.
    pub fn conjugate(&self) -> Self {
        Self { mat: self.mat.conjugate() }
    }

    /// Return the transpose.
    pub fn transpose(&self) -> Self {
        Self { mat: self.mat.transpose() }
    }

    /// Return the conjugate transpose, i.e. the inverse for a proper unitary.
    pub fn adjoint(&self) -> Self {
        Self { mat: self.mat.adjoint() }
    }

    /// Extend to twice the size: identity when the new leading (control)
    /// qubit is 0, the original when it is 1.
    pub fn controlled(&self) -> Self {
        let n: usize = self.mat.nrows();
        let mut mat: na::DMatrix<C64> = na::DMatrix::identity(2 * n, 2 * n);
        for i in 0..n {
            for j in 0..n {
                mat[(n + i, n + j)] = self.mat[(i, j)];
            }
        }
        Self { mat }
    }

    /// Return `true` if U<sup>†</sup>U is the identity to within `epsilon` in
    /// the Frobenius norm.
    pub fn is_unitary(&self, epsilon: f64) -> bool {
        let n: usize = self.mat.nrows();
        let dev: na::DMatrix<C64> =
            self.mat.adjoint() * &self.mat - na::DMatrix::<C64>::identity(n, n);
        dev.norm() < epsilon
    }

    /// Return `true` if `self` and `rhs` agree to within `epsilon` in the
    /// Frobenius norm.
    pub fn approx_eq(&self, rhs: &Self, epsilon: f64) -> bool {
        self.mat.shape() == rhs.mat.shape()
            && (&self.mat - &rhs.mat).norm() < epsilon
    }
}

impl LocalOperator for Unitary {
    fn size(&self) -> usize { self.mat.nrows() }

    fn for_each_output<F>(&self, x: usize, mut visit: F)
    where F: FnMut(usize, C64)
    {
        let n: usize = self.mat.nrows();
        if x >= n {
            panic!("Unitary: index {} out of bounds for size {}", x, n);
        }
        for j in 0..n {
            let el: C64 = self.mat[(x, j)];
            if el != ZERO { visit(j, el); }
        }
    }
}

impl Index<(usize, usize)> for Unitary {
    type Output = C64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.mat[index]
    }
}

impl Mul<&Unitary> for &Unitary {
    type Output = Unitary;

    fn mul(self, rhs: &Unitary) -> Self::Output {
        if self.mat.nrows() != rhs.mat.nrows() {
            panic!(
                "Unitary: size mismatch in product: {} vs {}",
                self.mat.nrows(), rhs.mat.nrows(),
            );
        }
        Unitary { mat: &self.mat * &rhs.mat }
    }
}

impl Mul<Unitary> for Unitary {
    type Output = Unitary;

    fn mul(self, rhs: Unitary) -> Self::Output { &self * &rhs }
}

impl Mul<C64> for &Unitary {
    type Output = Unitary;

    fn mul(self, rhs: C64) -> Self::Output {
        Unitary { mat: &self.mat * rhs }
    }
}

impl Mul<C64> for Unitary {
    type Output = Unitary;

    fn mul(self, rhs: C64) -> Self::Output { &self * rhs }
}

impl Mul<&Unitary> for C64 {
    type Output = Unitary;

    fn mul(self, rhs: &Unitary) -> Self::Output { rhs * self }
}

impl Mul<Unitary> for C64 {
    type Output = Unitary;

    fn mul(self, rhs: Unitary) -> Self::Output { &rhs * self }
}

impl Neg for &Unitary {
    type Output = Unitary;

    fn neg(self) -> Self::Output { Unitary { mat: -&self.mat } }
}

impl Neg for Unitary {
    type Output = Unitary;

    fn neg(self) -> Self::Output { -&self }
}

impl fmt::Display for Unitary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n: usize = self.mat.nrows();
        for (i, row) in self.mat.row_iter().enumerate() {
            write!(f, "[")?;
            for el in row.iter() { write!(f, " {}", el)?; }
            write!(f, " ]")?;
            if i < n - 1 { writeln!(f)?; }
        }
        Ok(())
    }
}

/* Bijection ******************************************************************/

/// An *m*-qubit gate that permutes basis-state indices without touching
/// amplitudes: a classical reversible function on bit patterns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bijection {
    map: Vec<usize>,
}

impl Bijection {
    /// Create a new gate from a lookup table.
    ///
    /// *Panics if the table is not a permutation of `0..map.len()`.*
    pub fn new(map: Vec<usize>) -> Self {
        let n: usize = map.len();
        let mut seen: Vec<bool> = vec![false; n];
        for &y in map.iter() {
            if y >= n || seen[y] {
                panic!("Bijection: table is not a permutation of 0..{}", n);
            }
            seen[y] = true;
        }
        Self { map }
    }

    /// Apply to a single index.
    ///
    /// *Panics if `x` is out of bounds.*
    pub fn apply(&self, x: usize) -> usize {
        if x >= self.map.len() {
            panic!(
                "Bijection: index {} out of bounds for size {}",
                x, self.map.len(),
            );
        }
        self.map[x]
    }

    /// Extend to twice the size: identity when the new leading (control)
    /// qubit is 0, the original when it is 1.
    pub fn controlled(&self) -> Self {
        let n: usize = self.map.len();
        let map: Vec<usize> =
            (0..n).chain(self.map.iter().map(|y| n + y)).collect();
        Self { map }
    }
}

impl LocalOperator for Bijection {
    fn size(&self) -> usize { self.map.len() }

    fn for_each_output<F>(&self, x: usize, mut visit: F)
    where F: FnMut(usize, C64)
    {
        visit(self.apply(x), ONE);
    }
}

/* Rotation *******************************************************************/

/// An *m*-qubit gate that multiplies each basis-state amplitude by a fixed
/// complex phase: a diagonal unitary stored as its diagonal.
///
/// The phases are expected to have unit modulus; like matrix unitarity, this
/// is the caller's responsibility.
#[derive(Clone, Debug, PartialEq)]
pub struct Rotation {
    phases: Vec<C64>,
}

impl Rotation {
    /// Create a new gate from its diagonal.
    pub fn new(phases: Vec<C64>) -> Self { Self { phases } }

    /// Create the single-qubit gate diag(1, e<sup>iθ</sup>).
    pub fn phase_shift(theta: f64) -> Self {
        Self { phases: vec![ONE, C64::cis(theta)] }
    }

    /// Return the phase factor at index `x`.
    ///
    /// *Panics if `x` is out of bounds.*
    pub fn phase(&self, x: usize) -> C64 {
        if x >= self.phases.len() {
            panic!(
                "Rotation: index {} out of bounds for size {}",
                x, self.phases.len(),
            );
        }
        self.phases[x]
    }

    /// Extend to twice the size: identity when the new leading (control)
    /// qubit is 0, the original when it is 1.
    pub fn controlled(&self) -> Self {
        let n: usize = self.phases.len();
        let phases: Vec<C64> =
            (0..n).map(|_| ONE)
            .chain(self.phases.iter().copied())
            .collect();
        Self { phases }
    }
}

impl LocalOperator for Rotation {
    fn size(&self) -> usize { self.phases.len() }

    fn for_each_output<F>(&self, x: usize, mut visit: F)
    where F: FnMut(usize, C64)
    {
        visit(x, self.phase(x));
    }
}

/* Operator *******************************************************************/

/// Any of the three operator representations as one closed type, e.g. for
/// heterogeneous gate sequences.
#[derive(Clone, Debug, PartialEq)]
pub enum Operator {
    /// A dense-matrix gate.
    Unitary(Unitary),
    /// A basis-state permutation.
    Bijection(Bijection),
    /// A diagonal phase gate.
    Rotation(Rotation),
}

impl Operator {
    /// Extend to twice the size: identity when the new leading (control)
    /// qubit is 0, the original when it is 1. The representation is
    /// preserved.
    pub fn controlled(&self) -> Self {
        match self {
            Self::Unitary(u) => Self::Unitary(u.controlled()),
            Self::Bijection(p) => Self::Bijection(p.controlled()),
            Self::Rotation(r) => Self::Rotation(r.controlled()),
        }
    }
}

impl From<Unitary> for Operator {
    fn from(u: Unitary) -> Self { Self::Unitary(u) }
}

impl From<Bijection> for Operator {
    fn from(p: Bijection) -> Self { Self::Bijection(p) }
}

impl From<Rotation> for Operator {
    fn from(r: Rotation) -> Self { Self::Rotation(r) }
}

impl LocalOperator for Operator {
    fn size(&self) -> usize {
        match self {
            Self::Unitary(u) => u.size(),
            Self::Bijection(p) => p.size(),
            Self::Rotation(r) => r.size(),
        }
    }

    fn for_each_output<F>(&self, x: usize, visit: F)
    where F: FnMut(usize, C64)
    {
        match self {
            Self::Unitary(u) => u.for_each_output(x, visit),
            Self::Bijection(p) => p.for_each_output(x, visit),
            Self::Rotation(r) => r.for_each_output(x, visit),
        }
    }
}

/* Named gates ****************************************************************/

/// The single-qubit identity gate.
pub static PAULI_I: Lazy<Unitary> = Lazy::new(|| Unitary::identity(2));

/// The Pauli *X* (NOT) gate.
pub static PAULI_X: Lazy<Unitary> =
    Lazy::new(|| {
        let mut x = na::DMatrix::zeros(2, 2);
        x[(0, 1)] = ONE;
        x[(1, 0)] = ONE;
        Unitary::new(x)
    });

/// The Pauli *Y* gate.
pub static PAULI_Y: Lazy<Unitary> =
    Lazy::new(|| {
        let mut y = na::DMatrix::zeros(2, 2);
        y[(0, 1)] = -C64::i();
        y[(1, 0)] =  C64::i();
        Unitary::new(y)
    });

/// The Pauli *Z* gate.
pub static PAULI_Z: Lazy<Unitary> =
    Lazy::new(|| {
        let mut z = na::DMatrix::zeros(2, 2);
        z[(0, 0)] =  ONE;
        z[(1, 1)] = -ONE;
        Unitary::new(z)
    });

/// The Hadamard gate.
pub static HADAMARD: Lazy<Unitary> =
    Lazy::new(|| {
        let mut h = na::DMatrix::from_element(2, 2, ORT2);
        h[(1, 1)] = -ORT2;
        Unitary::new(h)
    });

/// The controlled-NOT gate; the first qubit is the control.
pub static CNOT: Lazy<Unitary> =
    Lazy::new(|| {
        let mut cx = na::DMatrix::zeros(4, 4);
        cx[(0, 0)] = ONE;
        cx[(1, 1)] = ONE;
        cx[(2, 3)] = ONE;
        cx[(3, 2)] = ONE;
        Unitary::new(cx)
    });

/// The two-qubit swap gate.
pub static SWAP: Lazy<Unitary> =
    Lazy::new(|| {
        let mut sw = na::DMatrix::zeros(4, 4);
        sw[(0, 0)] = ONE;
        sw[(1, 2)] = ONE;
        sw[(2, 1)] = ONE;
        sw[(3, 3)] = ONE;
        Unitary::new(sw)
    });

/// The doubly controlled NOT gate; the first two qubits are the controls.
pub static TOFFOLI: Lazy<Unitary> =
    Lazy::new(|| {
        let mut ccx = na::DMatrix::identity(8, 8);
        ccx[(6, 6)] = ZERO;
        ccx[(7, 7)] = ZERO;
        ccx[(6, 7)] = ONE;
        ccx[(7, 6)] = ONE;
        Unitary::new(ccx)
    });

#[cfg(test)]
mod test {
    use super::*;

    fn c(re: f64) -> C64 { C64::from(re) }

    // most of these matrices are not unitary; whole numbers are just easier
    // to check by hand
    fn mat2(a: f64, b: f64, c_: f64, d: f64) -> Unitary {
        let mut m = na::DMatrix::zeros(2, 2);
        m[(0, 0)] = c(a);
        m[(0, 1)] = c(b);
        m[(1, 0)] = c(c_);
        m[(1, 1)] = c(d);
        Unitary::new(m)
    }

    #[test]
    fn multiply() {
        let a = mat2(1.0, 2.0, 3.0, 4.0);
        let b = mat2(5.0, 6.0, 7.0, 8.0);
        assert_eq!(&a * &b, mat2(19.0, 22.0, 43.0, 50.0));
        assert_eq!(&b * &a, mat2(23.0, 34.0, 31.0, 46.0));
    }

    #[test]
    fn scalar_multiply() {
        let a = mat2(1.0, 2.0, 3.0, 4.0);
        let b = &a * c(2.0);
        assert_eq!(b, mat2(2.0, 4.0, 6.0, 8.0));
        assert_eq!(c(2.0) * &a, b);
        assert_eq!(-&a, mat2(-1.0, -2.0, -3.0, -4.0));
    }

    #[test]
    fn tensor() {
        let a = mat2(1.0, 2.0, 3.0, 4.0);
        let b = mat2(0.0, 5.0, 6.0, 7.0);
        let mut exp = na::DMatrix::zeros(4, 4);
        let entries: [[f64; 4]; 4] = [
            [ 0.0,  5.0,  0.0, 10.0],
            [ 6.0,  7.0, 12.0, 14.0],
            [ 0.0, 15.0,  0.0, 20.0],
            [18.0, 21.0, 24.0, 28.0],
        ];
        for (i, row) in entries.iter().enumerate() {
            for (j, el) in row.iter().enumerate() {
                exp[(i, j)] = c(*el);
            }
        }
        assert_eq!(a.tensor(&b), Unitary::new(exp));
    }

    #[test]
    fn conjugate_transpose() {
        let mut m = na::DMatrix::zeros(2, 2);
        m[(0, 0)] = C64::new(1.0, 1.0);
        m[(0, 1)] = C64::new(0.0, -2.0);
        m[(1, 0)] = c(3.0);
        m[(1, 1)] = C64::new(-1.0, 4.0);
        let u = Unitary::new(m);
        assert_eq!(u.conjugate()[(0, 1)], C64::new(0.0, 2.0));
        assert_eq!(u.transpose()[(0, 1)], c(3.0));
        assert_eq!(u.adjoint()[(1, 0)], C64::new(0.0, 2.0));
        assert_eq!(u.adjoint(), u.conjugate().transpose());
    }

    #[test]
    fn named_gates_are_unitary() {
        assert!(PAULI_I.is_unitary(1e-12));
        assert!(PAULI_X.is_unitary(1e-12));
        assert!(PAULI_Y.is_unitary(1e-12));
        assert!(PAULI_Z.is_unitary(1e-12));
        assert!(HADAMARD.is_unitary(1e-12));
        assert!(CNOT.is_unitary(1e-12));
        assert!(SWAP.is_unitary(1e-12));
        assert!(TOFFOLI.is_unitary(1e-12));
    }

    #[test]
    fn adjoint_inverts() {
        let prod = &HADAMARD.adjoint() * &*HADAMARD;
        assert!(prod.approx_eq(&Unitary::identity(2), 1e-12));
        let prod = &PAULI_Y.adjoint() * &*PAULI_Y;
        assert!(prod.approx_eq(&Unitary::identity(2), 1e-12));
    }

    #[test]
    fn controlled_unitary() {
        assert_eq!(PAULI_X.controlled(), *CNOT);
        assert_eq!(CNOT.controlled(), *TOFFOLI);
    }

    #[test]
    fn controlled_bijection() {
        let f = Bijection::new(vec![2, 0, 3, 1]);
        let g = f.controlled();
        assert_eq!(g.size(), 8);
        for i in 0..4 {
            assert_eq!(g.apply(i), i);
        }
        for i in 4..8 {
            assert_eq!(g.apply(i), f.apply(i - 4) + 4);
        }
    }

    #[test]
    fn controlled_rotation() {
        let r = Rotation::new(vec![C64::i(), -ONE]);
        let g = r.controlled();
        assert_eq!(g.size(), 4);
        assert_eq!(g.phase(0), ONE);
        assert_eq!(g.phase(1), ONE);
        assert_eq!(g.phase(2), C64::i());
        assert_eq!(g.phase(3), -ONE);
    }

    #[test]
    fn phase_shift() {
        let r = Rotation::phase_shift(std::f64::consts::PI);
        assert_eq!(r.phase(0), ONE);
        assert!((r.phase(1) + ONE).norm() < 1e-12);
    }

    #[test]
    fn for_each_output_unitary() {
        let mut hits: Vec<(usize, C64)> = Vec::new();
        HADAMARD.for_each_output(1, |j, a| { hits.push((j, a)); });
        assert_eq!(hits, vec![(0, ORT2), (1, -ORT2)]);

        hits.clear();
        PAULI_X.for_each_output(0, |j, a| { hits.push((j, a)); });
        assert_eq!(hits, vec![(1, ONE)]);
    }

    #[test]
    fn for_each_output_wrapped() {
        let op = Operator::from(Bijection::new(vec![1, 2, 0]));
        assert_eq!(op.size(), 3);
        let mut hits: Vec<(usize, C64)> = Vec::new();
        op.for_each_output(2, |j, a| { hits.push((j, a)); });
        assert_eq!(hits, vec![(0, ONE)]);

        let op = Operator::from(Rotation::new(vec![ONE, -ONE]));
        assert_eq!(op.controlled().size(), 4);
    }

    #[test]
    #[should_panic]
    fn non_square_matrix() {
        let _ = Unitary::new(na::DMatrix::zeros(2, 3));
    }

    #[test]
    #[should_panic]
    fn non_permutation_table() {
        let _ = Bijection::new(vec![0, 0, 1]);
    }
}
