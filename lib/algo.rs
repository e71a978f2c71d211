//! Textbook quantum algorithms driving a [`QuantumRegister`]: Deutsch–Jozsa,
//! Simon, Grover, and Shor, plus the oracle builders and Fourier-transform
//! subroutines they share.
//!
//! Classical functions enter the drivers as oracles: a truth table becomes
//! either a reversible [`Bijection`] via [`bit_oracle`] or a sign-flip
//! [`Rotation`] via [`phase_oracle`]. All randomness is drawn from a
//! caller-supplied generator, so seeded runs reproduce exactly.

use std::f64::consts::PI;
use num_complex::Complex64 as C64;
use rand::Rng;
use thiserror::Error;
use crate::{
    gate::{ Bijection, LocalOperator, Rotation, HADAMARD, PAULI_X, SWAP },
    math::{ continued_fraction, convergents, gcd, mod_pow },
    register::QuantumRegister,
};

const ONE: C64 = C64 { re: 1.0, im: 0.0 };

/* Oracles ********************************************************************/

/// Build the reversible bit oracle of a classical function: the permutation
/// sending `(x, y)` to `(x, y ⊕ f(x))`, with `x` in the leading qubits and
/// `y` in `output_bits` trailing qubits.
///
/// *Panics if the table length is not a power of two or any table value does
/// not fit in `output_bits` bits.*
pub fn bit_oracle(f: &[usize], output_bits: usize) -> Bijection {
    if !f.len().is_power_of_two() {
        panic!("bit_oracle: table length {} is not a power of two", f.len());
    }
    if output_bits == 0 || output_bits >= usize::BITS as usize {
        panic!("bit_oracle: invalid output size {}", output_bits);
    }
    let out_space: usize = 1 << output_bits;
    if let Some(bad) = f.iter().find(|y| **y >= out_space) {
        panic!(
            "bit_oracle: table value {} does not fit in {} output bit(s)",
            bad, output_bits,
        );
    }
    let map: Vec<usize> =
        f.iter()
        .enumerate()
        .flat_map(|(x, &fx)| {
            (0..out_space).map(move |y| x << output_bits | (y ^ fx))
        })
        .collect();
    Bijection::new(map)
}

/// Build the phase oracle of a boolean function: the diagonal with phase −1
/// exactly at the marked indices and +1 elsewhere.
pub fn phase_oracle(f: &[bool]) -> Rotation {
    let phases: Vec<C64> =
        f.iter()
        .map(|&marked| if marked { -ONE } else { ONE })
        .collect();
    Rotation::new(phases)
}

/* Deutsch-Jozsa **************************************************************/

/// The two classes a Deutsch–Jozsa oracle is promised to fall into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeutschJozsaResult {
    /// The function takes one value on every input.
    Constant,
    /// The function takes each of its two values on exactly half its inputs.
    Balanced,
}

/// Decide whether the function behind a bit oracle is constant or balanced
/// with a single oracle query.
///
/// `oracle` must be the [`bit_oracle`] of a one-output-bit function over
/// `2^k` inputs, promised to be either constant or balanced.
///
/// *Panics if the oracle size is not `2^(k+1)`.*
pub fn deutsch_jozsa<R>(oracle: &Bijection, rng: &mut R) -> DeutschJozsaResult
where R: Rng + ?Sized
{
    let size: usize = oracle.size();
    if !size.is_power_of_two() || size < 2 {
        panic!("deutsch_jozsa: oracle size {} is not 2^(k+1)", size);
    }
    let k: usize = size.trailing_zeros() as usize - 1;
    let all: Vec<usize> = (0..=k).collect();
    let inputs: Vec<usize> = (0..k).collect();

    let mut qr = QuantumRegister::new(k + 1);
    // the ancilla starts in ∣−⟩ so the oracle kicks f(x) back as a phase
    qr.apply_unitary(&PAULI_X, &[k]);
    for &i in all.iter() { qr.apply_unitary(&HADAMARD, &[i]); }
    qr.apply_bijection(oracle, &all);
    for &i in inputs.iter() { qr.apply_unitary(&HADAMARD, &[i]); }

    if qr.measure(&inputs, rng).to_integer() == 0 {
        DeutschJozsaResult::Constant
    } else {
        DeutschJozsaResult::Balanced
    }
}

/* Simon **********************************************************************/

/// Recover the hidden period of a two-to-one function from its bit oracle.
///
/// `oracle` must be the [`bit_oracle`] of a function over `2^n` inputs with
/// `n` output bits, promised to satisfy `f(x) = f(x ⊕ s)` for a fixed secret
/// `s`. Each quantum round yields a vector orthogonal to `s` mod 2; once the
/// collected constraints pin a unique candidate it is verified classically
/// against the oracle. Returns `s`, or 0 if the function turns out to be
/// injective.
///
/// *Panics if the oracle size is not `2^(2n)`.*
pub fn simon<R>(oracle: &Bijection, rng: &mut R) -> usize
where R: Rng + ?Sized
{
    let size: usize = oracle.size();
    let bits: usize = size.trailing_zeros() as usize;
    if !size.is_power_of_two() || bits == 0 || bits & 1 == 1 {
        panic!("simon: oracle size {} is not 2^(2n)", size);
    }
    let n: usize = bits / 2;
    let mask: usize = (1 << n) - 1;
    let inputs: Vec<usize> = (0..n).collect();
    let all: Vec<usize> = (0..2 * n).collect();

    let mut rows: Vec<usize> = Vec::with_capacity(n);
    let mut rounds: usize = 0;
    loop {
        if rows.len() == n - 1 {
            let s: usize = null_vector(&rows, n);
            if s != 0 && oracle.apply(s << n) & mask == oracle.apply(0) & mask
            {
                return s;
            }
        }
        if rows.len() == n { return 0; }
        if rounds >= 64 * n {
            panic!("simon: oracle samples failed to span the constraint \
                space");
        }

        let mut qr = QuantumRegister::new(2 * n);
        for &i in inputs.iter() { qr.apply_unitary(&HADAMARD, &[i]); }
        qr.apply_bijection(oracle, &all);
        for &i in inputs.iter() { qr.apply_unitary(&HADAMARD, &[i]); }
        insert_row(&mut rows, qr.measure(&inputs, rng).to_integer());
        rounds += 1;
    }
}

// mask of the highest set bit; x must be nonzero
fn leading(x: usize) -> usize {
    1 << (usize::BITS - 1 - x.leading_zeros())
}

// insert y into a GF(2) row basis kept in reduced echelon form, returning
// false if y is linearly dependent on the rows already present
fn insert_row(rows: &mut Vec<usize>, mut y: usize) -> bool {
    for &row in rows.iter() {
        if leading(row) & y != 0 { y ^= row; }
    }
    if y == 0 { return false; }
    let lead: usize = leading(y);
    for row in rows.iter_mut() {
        if *row & lead != 0 { *row ^= y; }
    }
    rows.push(y);
    true
}

// solve rows · s = 0 for the nonzero vector over n variables; with rank
// n - 1 and reduced echelon form the solution is unique
fn null_vector(rows: &[usize], n: usize) -> usize {
    let leaders: usize = rows.iter().fold(0, |acc, &row| acc | leading(row));
    let free: Option<usize> =
        (0..n).map(|i| 1_usize << i).find(|b| leaders & b == 0);
    let Some(free) = free else { return 0; };
    let mut s: usize = free;
    for &row in rows.iter() {
        if (row & s).count_ones() & 1 == 1 { s |= leading(row); }
    }
    s
}

/* Grover *********************************************************************/

/// Find a marked index with a phase oracle by amplitude amplification.
///
/// `oracle` must flip the sign of exactly `num_answers` marked indices out
/// of its `N = 2^n`; after `⌊(π/4)·√(N/num_answers)⌋` Grover iterations a
/// full measurement returns a marked index with high probability.
///
/// *Panics if the oracle size is not a power of two or `num_answers` is 0.*
pub fn grover<R>(oracle: &Rotation, num_answers: usize, rng: &mut R) -> usize
where R: Rng + ?Sized
{
    let size: usize = oracle.size();
    if !size.is_power_of_two() || size < 2 {
        panic!("grover: oracle size {} is not a power of two", size);
    }
    if num_answers == 0 {
        panic!("grover: need at least one marked index");
    }
    let n: usize = size.trailing_zeros() as usize;
    let all: Vec<usize> = (0..n).collect();

    // reflection about ∣0...0⟩, diagonal so it stays cheap at any size
    let mut phases: Vec<C64> = vec![ONE; size];
    phases[0] = -ONE;
    let reflect = Rotation::new(phases);

    let mut qr = QuantumRegister::new(n);
    for &i in all.iter() { qr.apply_unitary(&HADAMARD, &[i]); }
    let iters: usize =
        (PI / 4.0 * (size as f64 / num_answers as f64).sqrt()) as usize;
    for _ in 0..iters {
        qr.apply_rotation(oracle, &all);
        for &i in all.iter() { qr.apply_unitary(&HADAMARD, &[i]); }
        qr.apply_rotation(&reflect, &all);
        for &i in all.iter() { qr.apply_unitary(&HADAMARD, &[i]); }
    }
    qr.measure(&all, rng).to_integer()
}

/* Fourier ********************************************************************/

/// Apply the quantum Fourier transform to the listed qubit positions, most
/// significant first.
///
/// Maps ∣j⟩ to (1/√N)·Σ<sub>k</sub> e<sup>2πi·jk/N</sup>∣k⟩ over the listed
/// block, built from Hadamards, controlled phase shifts, and swaps.
pub fn qft(qr: &mut QuantumRegister, qubits: &[usize]) {
    let m: usize = qubits.len();
    for i in 0..m {
        qr.apply_unitary(&HADAMARD, &[qubits[i]]);
        for d in 1..m - i {
            let gate = Rotation::phase_shift(PI / (1_u64 << d) as f64)
                .controlled();
            qr.apply_rotation(&gate, &[qubits[i + d], qubits[i]]);
        }
    }
    for i in 0..m / 2 {
        qr.apply_unitary(&SWAP, &[qubits[i], qubits[m - 1 - i]]);
    }
}

/// Apply the inverse quantum Fourier transform to the listed qubit
/// positions: the reversed, phase-conjugated sequence of [`qft`].
pub fn iqft(qr: &mut QuantumRegister, qubits: &[usize]) {
    let m: usize = qubits.len();
    for i in 0..m / 2 {
        qr.apply_unitary(&SWAP, &[qubits[i], qubits[m - 1 - i]]);
    }
    for i in (0..m).rev() {
        for d in (1..m - i).rev() {
            let gate = Rotation::phase_shift(-PI / (1_u64 << d) as f64)
                .controlled();
            qr.apply_rotation(&gate, &[qubits[i + d], qubits[i]]);
        }
        qr.apply_unitary(&HADAMARD, &[qubits[i]]);
    }
}

/* Shor ***********************************************************************/

/// The inconclusive outcomes of a single period-finding trial; each calls
/// for a retry with a different base.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ShorError {
    /// No convergent of the measured phase exposed a period.
    #[error("no usable period in the measured phase")]
    NoPeriod,
    /// The recovered period was odd.
    #[error("recovered period {0} is odd")]
    OddPeriod(u64),
    /// `a^(r/2)` was a trivial square root of 1, yielding factors 1 and n.
    #[error("base {0} gives a trivial square root of unity")]
    TrivialRoot(u64),
}

/// Run one period-finding trial of Shor's algorithm with the given base,
/// returning a nontrivial factor pair of `n` on success.
///
/// A base sharing a factor with `n` short-circuits classically. Otherwise a
/// register of `q + w` qubits (`2^q ≥ n²`, `2^w ≥ n`) runs the order-finding
/// circuit: Hadamards on the `x` block, the modular-multiplication
/// permutation `(x, y) ↦ (x, y·a^x mod n)`, a work-register measurement, and
/// an inverse Fourier transform; the measured phase is fed through its
/// continued-fraction convergents to extract the period of `a`.
///
/// *Panics if `n < 4` or even, or `a` is not in `2..n`.* `n` is assumed
/// composite.
pub fn shor_trial<R>(n: u64, a: u64, rng: &mut R)
    -> Result<(u64, u64), ShorError>
where R: Rng + ?Sized
{
    if n < 4 || n & 1 == 0 {
        panic!("shor_trial: modulus {} is not an odd composite", n);
    }
    if !(2..n).contains(&a) {
        panic!("shor_trial: base {} out of range for modulus {}", a, n);
    }
    let shared: u64 = gcd(a, n);
    if shared != 1 {
        return Ok((shared.min(n / shared), shared.max(n / shared)));
    }

    let nn: u128 = u128::from(n) * u128::from(n);
    let q: usize = (128 - (nn - 1).leading_zeros()) as usize;
    let w: usize = (64 - (n - 1).leading_zeros()) as usize;
    let total: usize = q + w;
    if total >= usize::BITS as usize {
        panic!(
            "shor_trial: modulus {} needs {} qubits, too many to simulate",
            n, total,
        );
    }
    let xs: Vec<usize> = (0..q).collect();
    let ws: Vec<usize> = (q..total).collect();
    let all: Vec<usize> = (0..total).collect();

    // (x, y) ↦ (x, y·a^x mod n) for y < n, identity above; a is invertible
    // mod n, so every x slice is a permutation
    let w_space: usize = 1 << w;
    let map: Vec<usize> =
        (0..1_usize << q)
        .flat_map(|x| {
            let ax: u128 = u128::from(mod_pow(a, x as u64, n));
            (0..w_space).map(move |y| {
                let fy: usize =
                    if (y as u64) < n {
                        (y as u128 * ax % u128::from(n)) as usize
                    } else {
                        y
                    };
                x << w | fy
            })
        })
        .collect();
    let oracle = Bijection::new(map);

    let mut qr = QuantumRegister::new(total);
    for &i in xs.iter() { qr.apply_unitary(&HADAMARD, &[i]); }
    // the work register starts at ∣0...01⟩
    qr.apply_unitary(&PAULI_X, &[total - 1]);
    qr.apply_bijection(&oracle, &all);
    // collapsing the work register keeps one residue class of x
    let _ = qr.measure(&ws, rng);
    iqft(&mut qr, &xs);
    let c: u64 = qr.measure(&xs, rng).to_integer() as u64;

    // c/2^q ≈ k/r: the period surfaces as a convergent denominator
    let expansion: Vec<u64> = continued_fraction(c, 1 << q);
    let period: Option<u64> =
        convergents(&expansion).into_iter()
        .map(|(_, den)| den)
        .find(|&den| den > 1 && den < n && mod_pow(a, den, n) == 1);
    let Some(mut r) = period else { return Err(ShorError::NoPeriod); };

    // shrink to the smallest power-of-two quotient still of full order
    while r & 1 == 0 && mod_pow(a, r / 2, n) == 1 { r /= 2; }
    if r & 1 == 1 {
        return Err(ShorError::OddPeriod(r));
    }
    let half: u64 = mod_pow(a, r / 2, n);
    if half == n - 1 {
        return Err(ShorError::TrivialRoot(a));
    }
    let p: u64 = gcd(half - 1, n);
    Ok((p.min(n / p), p.max(n / p)))
}

/// Factor an odd composite by Shor's algorithm, retrying the period-finding
/// trial with fresh random bases until one is conclusive.
///
/// *Panics if `n < 4` or even.* `n` is assumed composite; primality testing
/// is the caller's concern, and a prime `n` retries forever.
pub fn shor<R>(n: u64, rng: &mut R) -> (u64, u64)
where R: Rng + ?Sized
{
    if n < 4 || n & 1 == 0 {
        panic!("shor: modulus {} is not an odd composite", n);
    }
    loop {
        let a: u64 = rng.gen_range(2..n);
        if let Ok(factors) = shor_trial(n, a, rng) {
            return factors;
        }
    }
}
