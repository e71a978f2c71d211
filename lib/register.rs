//! Registers of qubits held as sparse superpositions of basis states.
//!
//! A [`QuantumRegister`] maps global basis-state indices to complex
//! amplitudes, storing only (effectively) nonzero entries. Operators act on
//! an arbitrary ordered subset of the register's qubits: for each stored
//! entry the bits at the listed positions are gathered into a local index,
//! run through the operator, and scattered back, with contributions to the
//! same output state interfering. After every application, entries whose
//! probability has dropped below [`MIN_PROBABILITY`] are pruned so that
//! iterative circuits don't grow the map with numerical dust.
//!
//! Measurement is projective and partial: any subset of qubits can be
//! measured at once, collapsing the register onto one renormalized branch
//! drawn with Born-rule probability. Measured qubits are retired for good;
//! touching one again is a caller bug and panics.
//!
//! # Example
//! ```
//! use rand::{ rngs::StdRng, SeedableRng };
//! use sparse_sim::{ gate::{ CNOT, HADAMARD }, register::QuantumRegister };
//!
//! // prepare a Bell pair (∣00⟩ + ∣11⟩) / √2
//! let mut qr = QuantumRegister::new(2);
//! qr.apply_unitary(&HADAMARD, &[0]);
//! qr.apply_unitary(&CNOT, &[0, 1]);
//! assert!((qr.probability(0b00) - 0.5).abs() < 1e-9);
//! assert!((qr.probability(0b11) - 0.5).abs() < 1e-9);
//!
//! // measuring one qubit collapses the other to match
//! let mut rng = StdRng::seed_from_u64(10546);
//! let outcome = qr.measure(&[0], &mut rng);
//! let expected: usize = if outcome.qubit(0) { 0b11 } else { 0b00 };
//! assert!((qr.probability(expected) - 1.0).abs() < 1e-9);
//! ```

use std::fmt;
use itertools::Itertools;
use num_complex::Complex64 as C64;
use rand::Rng;
use rustc_hash::{ FxHashMap, FxHashSet };
use crate::{
    basis::BasisState,
    gate::{ Bijection, LocalOperator, Rotation, Unitary },
};

/// Entries whose probability falls below this threshold are dropped from the
/// superposition after every gate application.
pub const MIN_PROBABILITY: f64 = 1e-20;

const ZERO: C64 = C64 { re: 0.0, im: 0.0 };
const ONE:  C64 = C64 { re: 1.0, im: 0.0 };

/// A register of qubits in a (possibly partial) superposition of basis
/// states.
///
/// Qubit index 0 addresses the most significant bit of a global state index,
/// as in [`BasisState`]. Cloning a register yields an independent simulation
/// branch; the engine itself never copies state behind the caller's back.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantumRegister {
    num_qubits: usize,
    superposition: FxHashMap<usize, C64>,
    measured: FxHashSet<usize>,
}

impl QuantumRegister {
    /// Create a new register of `num_qubits` qubits initialized to ∣0...0⟩.
    ///
    /// *Panics if the state space cannot be indexed by a `usize`.*
    pub fn new(num_qubits: usize) -> Self {
        if num_qubits >= usize::BITS as usize {
            panic!(
                "QuantumRegister: cannot index the states of {} qubits",
                num_qubits,
            );
        }
        let mut superposition: FxHashMap<usize, C64> = FxHashMap::default();
        superposition.insert(0, ONE);
        Self { num_qubits, superposition, measured: FxHashSet::default() }
    }

    /// Create a new register with explicit initial amplitudes.
    ///
    /// Amplitudes are taken as given and should square-sum to 1; entries
    /// with probability below [`MIN_PROBABILITY`] are dropped.
    ///
    /// *Panics if any state index is out of range for `num_qubits` qubits.*
    pub fn from_superposition<I>(num_qubits: usize, amplitudes: I) -> Self
    where I: IntoIterator<Item = (usize, C64)>
    {
        if num_qubits >= usize::BITS as usize {
            panic!(
                "QuantumRegister: cannot index the states of {} qubits",
                num_qubits,
            );
        }
        let superposition: FxHashMap<usize, C64> =
            amplitudes.into_iter()
            .inspect(|(state, _)| {
                if state >> num_qubits != 0 {
                    panic!(
                        "QuantumRegister: state index {} out of range for {} \
                        qubit(s)",
                        state, num_qubits,
                    );
                }
            })
            .filter(|(_, amp)| amp.norm_sqr() >= MIN_PROBABILITY)
            .collect();
        Self { num_qubits, superposition, measured: FxHashSet::default() }
    }

    /// Return the number of qubits in the register, measured or not.
    pub fn num_qubits(&self) -> usize { self.num_qubits }

    /// Return the number of basis states currently holding amplitude.
    pub fn num_states(&self) -> usize { self.superposition.len() }

    /// Return `true` if qubit `k` has been measured.
    pub fn is_measured(&self, k: usize) -> bool {
        self.measured.contains(&k)
    }

    /// Return the amplitude on a global state index, zero if absent.
    pub fn coefficient(&self, state: usize) -> C64 {
        self.superposition.get(&state).copied().unwrap_or(ZERO)
    }

    /// Return the probability of a global state index.
    pub fn probability(&self, state: usize) -> f64 {
        self.coefficient(state).norm_sqr()
    }

    // every listed position must be in range, unmeasured, and distinct
    fn check_positions(&self, qubits: &[usize]) {
        for (i, &k) in qubits.iter().enumerate() {
            if k >= self.num_qubits {
                panic!(
                    "QuantumRegister: qubit index {} out of bounds for {} \
                    qubit(s)",
                    k, self.num_qubits,
                );
            }
            if self.measured.contains(&k) {
                panic!(
                    "QuantumRegister: qubit {} has already been measured", k,
                );
            }
            if qubits[..i].contains(&k) {
                panic!("QuantumRegister: duplicate qubit index {}", k);
            }
        }
    }

    /// Apply an operator to the listed qubit positions.
    ///
    /// The list order is significant: the first listed position supplies the
    /// most significant bit of the operator's local input index, and output
    /// bits are written back in the same order. Positions need not be
    /// contiguous or sorted. Contributions from distinct input states may
    /// land on the same output state and interfere; entries whose resulting
    /// probability falls below [`MIN_PROBABILITY`] are dropped.
    ///
    /// *Panics if the operator size is not `2^(qubits.len())` or any listed
    /// position is out of bounds, already measured, or repeated.*
    pub fn apply<O>(&mut self, op: &O, qubits: &[usize]) -> &mut Self
    where O: LocalOperator + ?Sized
    {
        self.check_positions(qubits);
        let m: usize = qubits.len();
        if op.size() != 1 << m {
            panic!(
                "QuantumRegister: operator of size {} cannot act on {} \
                qubit(s)",
                op.size(), m,
            );
        }
        let mut applied: FxHashMap<usize, C64> = FxHashMap::default();
        for (&state, &amp) in self.superposition.iter() {
            let input = BasisState::new(state, self.num_qubits);
            let mut local = BasisState::empty();
            for &k in qubits.iter() { local.push_qubit(input.qubit(k)); }
            op.for_each_output(local.to_integer(), |j, factor| {
                let out_bits = BasisState::new(j, m);
                let mut output = input;
                for (i, &k) in qubits.iter().enumerate() {
                    output = output.with_qubit(k, out_bits.qubit(i));
                }
                *applied.entry(output.to_integer()).or_insert(ZERO) +=
                    amp * factor;
            });
        }
        applied.retain(|_, amp| amp.norm_sqr() >= MIN_PROBABILITY);
        self.superposition = applied;
        self
    }

    /// Apply a dense-matrix gate to the listed qubit positions.
    ///
    /// See [`apply`][Self::apply].
    pub fn apply_unitary(&mut self, u: &Unitary, qubits: &[usize])
        -> &mut Self
    {
        self.apply(u, qubits)
    }

    /// Apply a basis-state permutation to the listed qubit positions.
    ///
    /// See [`apply`][Self::apply].
    pub fn apply_bijection(&mut self, p: &Bijection, qubits: &[usize])
        -> &mut Self
    {
        self.apply(p, qubits)
    }

    /// Apply a diagonal phase gate to the listed qubit positions.
    ///
    /// See [`apply`][Self::apply].
    pub fn apply_rotation(&mut self, r: &Rotation, qubits: &[usize])
        -> &mut Self
    {
        self.apply(r, qubits)
    }

    /// Measure the listed qubit positions jointly, collapsing the register.
    ///
    /// The superposition is partitioned into branches by the bit pattern at
    /// the listed positions (in list order); one branch is drawn with
    /// Born-rule probability, renormalized to unit total probability, and
    /// kept. The listed qubits are retired permanently: any later gate or
    /// measurement touching them panics. The returned outcome has one qubit
    /// per listed position, in list order.
    ///
    /// Branches are enumerated in ascending order of their bit patterns for
    /// the draw. If accumulated floating-point error leaves the cumulative
    /// probability short of the drawn value, the last branch is selected
    /// deterministically.
    ///
    /// *Panics if any listed position is out of bounds, already measured, or
    /// repeated, or if the superposition holds no entries at all.*
    pub fn measure<R>(&mut self, qubits: &[usize], rng: &mut R) -> BasisState
    where R: Rng + ?Sized
    {
        self.check_positions(qubits);
        self.measured.extend(qubits.iter().copied());

        let mut branches: FxHashMap<usize, Branch> = FxHashMap::default();
        for (&state, &amp) in self.superposition.iter() {
            let all = BasisState::new(state, self.num_qubits);
            let mut outcome = BasisState::empty();
            for &k in qubits.iter() { outcome.push_qubit(all.qubit(k)); }
            let branch = branches.entry(outcome.to_integer()).or_default();
            branch.probability += amp.norm_sqr();
            branch.superposition.insert(state, amp);
        }
        if branches.is_empty() {
            panic!("QuantumRegister: measurement on an empty superposition");
        }

        let mut sorted: Vec<(usize, Branch)> =
            branches.into_iter()
            .sorted_by_key(|(outcome, _)| *outcome)
            .collect();
        let r: f64 = rng.gen();
        let selected: usize =
            sorted.iter()
            .scan(0.0_f64, |cum, (_, branch)| {
                *cum += branch.probability;
                Some(*cum)
            })
            .position(|cum| cum >= r)
            .unwrap_or(sorted.len() - 1);
        let (outcome, branch) = sorted.swap_remove(selected);

        let norm: f64 = branch.probability.sqrt();
        let mut superposition = branch.superposition;
        superposition.values_mut().for_each(|amp| { *amp /= norm; });
        self.superposition = superposition;
        BasisState::new(outcome, qubits.len())
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.measured.len() == self.num_qubits {
            return write!(f, "EMPTY");
        }
        let n: usize = self.superposition.len();
        for (k, (&state, &amp)) in
            self.superposition.iter()
                .sorted_by_key(|(state, _)| **state)
                .enumerate()
        {
            let all = BasisState::new(state, self.num_qubits);
            let mut shown = BasisState::empty();
            for i in 0..self.num_qubits {
                if !self.measured.contains(&i) {
                    shown.push_qubit(all.qubit(i));
                }
            }
            if let Some(prec) = f.precision() {
                write!(f, "({:.*})", prec, amp)?;
            } else {
                write!(f, "({})", amp)?;
            }
            write!(f, "{}", shown)?;
            if k < n - 1 { write!(f, " + ")?; }
        }
        Ok(())
    }
}

// one measurement branch: total probability and the entries consistent with
// a particular outcome
#[derive(Clone, Debug, Default)]
struct Branch {
    probability: f64,
    superposition: FxHashMap<usize, C64>,
}

#[cfg(test)]
mod test {
    use std::f64::consts::FRAC_1_SQRT_2;
    use rand::{ rngs::StdRng, SeedableRng };
    use crate::gate::{ CNOT, HADAMARD, PAULI_X };
    use super::*;

    const ORT2: C64 = C64 { re: FRAC_1_SQRT_2, im: 0.0 };

    #[test]
    fn initial_state() {
        for n in 0..6 {
            let qr = QuantumRegister::new(n);
            assert_eq!(qr.num_qubits(), n);
            assert_eq!(qr.num_states(), 1);
            assert_eq!(qr.probability(0), 1.0);
            for s in 1..1_usize << n {
                assert_eq!(qr.probability(s), 0.0);
            }
        }
    }

    #[test]
    fn hadamard_twice_restores() {
        let mut qr = QuantumRegister::new(1);
        qr.apply_unitary(&HADAMARD, &[0]);
        assert!((qr.probability(0) - 0.5).abs() < 1e-9);
        assert!((qr.probability(1) - 0.5).abs() < 1e-9);
        qr.apply_unitary(&HADAMARD, &[0]);
        assert!((qr.probability(0) - 1.0).abs() < 1e-9);
        assert!(qr.probability(1) < 1e-18);
        // the cancelled ∣1⟩ entry is pruned, not stored as dust
        assert_eq!(qr.num_states(), 1);
    }

    #[test]
    fn bijection_preserves_probability_and_count() {
        let mut qr = QuantumRegister::new(3);
        for k in 0..3 { qr.apply_unitary(&HADAMARD, &[k]); }
        assert_eq!(qr.num_states(), 8);
        let before: Vec<f64> = (0..8).map(|s| qr.probability(s)).collect();

        // cyclic shift x -> x + 1 mod 8
        let f = Bijection::new((0..8).map(|x| (x + 1) % 8).collect());
        qr.apply_bijection(&f, &[0, 1, 2]);
        assert_eq!(qr.num_states(), 8);
        let total: f64 = (0..8).map(|s| qr.probability(s)).sum();
        assert!((total - 1.0).abs() < 1e-9);
        for x in 0..8 {
            assert!((qr.probability((x + 1) % 8) - before[x]).abs() < 1e-12);
        }
    }

    #[test]
    fn rotation_preserves_probabilities() {
        let mut qr = QuantumRegister::new(2);
        for k in 0..2 { qr.apply_unitary(&HADAMARD, &[k]); }
        let before: Vec<f64> = (0..4).map(|s| qr.probability(s)).collect();

        let r = Rotation::new(vec![ONE, C64::i(), -ONE, -C64::i()]);
        qr.apply_rotation(&r, &[0, 1]);
        for s in 0..4 {
            assert!((qr.probability(s) - before[s]).abs() < 1e-12);
        }
        // phases did land on the amplitudes
        assert!((qr.coefficient(1) - C64::i() * ORT2 * ORT2).norm() < 1e-12);
    }

    #[test]
    fn list_order_is_significant() {
        // ∣01⟩: CNOT with qubit 0 as control does nothing...
        let mut qr = QuantumRegister::new(2);
        qr.apply_unitary(&PAULI_X, &[1]);
        qr.apply_unitary(&CNOT, &[0, 1]);
        assert_eq!(qr.probability(0b01), 1.0);
        // ...but with qubit 1 as control it flips qubit 0
        qr.apply_unitary(&CNOT, &[1, 0]);
        assert!((qr.probability(0b11) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_contiguous_positions() {
        let mut qr = QuantumRegister::new(3);
        qr.apply_unitary(&PAULI_X, &[2]);
        qr.apply_unitary(&CNOT, &[2, 0]);
        assert!((qr.probability(0b101) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bell_measurement_statistics() {
        let bell = QuantumRegister::from_superposition(
            2, [(0b00, ORT2), (0b11, ORT2)]);
        let mut rng = StdRng::seed_from_u64(10546);
        let mut counts: [usize; 4] = [0; 4];
        for _ in 0..200 {
            let mut qr = bell.clone();
            let outcome = qr.measure(&[0, 1], &mut rng);
            counts[outcome.to_integer()] += 1;
        }
        assert_eq!(counts[0b01], 0);
        assert_eq!(counts[0b10], 0);
        assert_eq!(counts[0b00] + counts[0b11], 200);
        // each roughly half; bounds loose enough to never flake
        assert!(counts[0b00] >= 60 && counts[0b00] <= 140);
    }

    #[test]
    fn collapse_renormalizes() {
        let mut qr = QuantumRegister::new(2);
        qr.apply_unitary(&HADAMARD, &[0]);
        qr.apply_unitary(&CNOT, &[0, 1]);
        let mut rng = StdRng::seed_from_u64(10546);
        let outcome = qr.measure(&[0], &mut rng);
        assert!(qr.is_measured(0));
        assert!(!qr.is_measured(1));
        assert_eq!(qr.num_states(), 1);
        let expected: usize = if outcome.qubit(0) { 0b11 } else { 0b00 };
        assert!((qr.probability(expected) - 1.0).abs() < 1e-9);
        // the surviving qubit is now deterministic
        let partner = qr.measure(&[1], &mut rng);
        assert_eq!(partner.qubit(0), outcome.qubit(0));
    }

    #[test]
    fn measurement_outcome_order() {
        let mut qr = QuantumRegister::new(2);
        qr.apply_unitary(&PAULI_X, &[1]);
        let mut rng = StdRng::seed_from_u64(10546);
        // listing qubit 1 first puts its value in outcome qubit 0
        let outcome = qr.measure(&[1, 0], &mut rng);
        assert_eq!(outcome.width(), 2);
        assert!( outcome.qubit(0));
        assert!(!outcome.qubit(1));
    }

    #[test]
    fn fallback_selects_last_outcome() {
        // probabilities deliberately sum to 1/4; any draw above that takes
        // the documented fallback to the last (only) branch
        let mut qr = QuantumRegister::from_superposition(
            1, [(0, C64 { re: 0.5, im: 0.0 })]);
        let outcome = qr.measure(&[0], &mut MaxRng);
        assert_eq!(outcome.to_integer(), 0);
        assert_eq!(qr.probability(0), 1.0);
    }

    #[test]
    #[should_panic]
    fn measure_requires_amplitude() {
        let mut qr = QuantumRegister::from_superposition(1, []);
        let mut rng = StdRng::seed_from_u64(10546);
        let _ = qr.measure(&[0], &mut rng);
    }

    #[test]
    #[should_panic]
    fn gate_on_measured_qubit() {
        let mut qr = QuantumRegister::new(2);
        let mut rng = StdRng::seed_from_u64(10546);
        qr.measure(&[0], &mut rng);
        qr.apply_unitary(&HADAMARD, &[0]);
    }

    #[test]
    #[should_panic]
    fn remeasured_qubit() {
        let mut qr = QuantumRegister::new(2);
        let mut rng = StdRng::seed_from_u64(10546);
        qr.measure(&[1], &mut rng);
        qr.measure(&[1, 0], &mut rng);
    }

    #[test]
    #[should_panic]
    fn duplicate_position() {
        let mut qr = QuantumRegister::new(2);
        qr.apply_unitary(&CNOT, &[1, 1]);
    }

    #[test]
    #[should_panic]
    fn operator_size_mismatch() {
        let mut qr = QuantumRegister::new(2);
        qr.apply_unitary(&HADAMARD, &[0, 1]);
    }

    #[test]
    #[should_panic]
    fn initial_state_out_of_range() {
        let _ = QuantumRegister::from_superposition(2, [(0b100, ONE)]);
    }

    #[test]
    fn sub_threshold_amplitudes_dropped() {
        let qr = QuantumRegister::from_superposition(
            2, [(0, ONE), (3, C64 { re: 1e-11, im: 0.0 })]);
        assert_eq!(qr.num_states(), 1);
    }

    #[test]
    fn rendering() {
        let mut qr = QuantumRegister::new(2);
        qr.apply_unitary(&HADAMARD, &[0]);
        let exp = format!(
            "({})∣00⟩ + ({})∣10⟩",
            C64::from(FRAC_1_SQRT_2), C64::from(FRAC_1_SQRT_2));
        assert_eq!(qr.to_string(), exp);

        // measured qubits disappear from the printed patterns
        let mut qr = QuantumRegister::new(2);
        qr.apply_unitary(&PAULI_X, &[1]);
        let mut rng = StdRng::seed_from_u64(10546);
        qr.measure(&[1], &mut rng);
        assert_eq!(qr.to_string(), format!("({})∣0⟩", C64::from(1.0)));
        qr.measure(&[0], &mut rng);
        assert_eq!(qr.to_string(), "EMPTY");
    }

    #[test]
    fn equality() {
        let mut a = QuantumRegister::new(2);
        let mut b = QuantumRegister::new(2);
        a.apply_unitary(&HADAMARD, &[0]);
        b.apply_unitary(&HADAMARD, &[0]);
        assert_eq!(a, b);
        assert_eq!(a.clone(), a);
        b.apply_unitary(&HADAMARD, &[1]);
        assert_ne!(a, b);
    }

    // rng stub pinned to the top of the unit interval
    struct MaxRng;

    impl rand::RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 { u32::MAX }
        fn next_u64(&mut self) -> u64 { u64::MAX }
        fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(0xff); }
        fn try_fill_bytes(&mut self, dest: &mut [u8])
            -> Result<(), rand::Error>
        {
            self.fill_bytes(dest);
            Ok(())
        }
    }
}
