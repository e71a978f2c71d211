//! Walk a small register through superposition, entanglement, and
//! measurement: a Bell pair with a shot tally, then a GHZ state.

use std::f64::consts::FRAC_1_SQRT_2;
use num_complex::Complex64 as C64;
use rand::{ rngs::StdRng, SeedableRng };
use rustc_hash::FxHashMap;
use sparse_sim::{
    gate::{ CNOT, HADAMARD },
    register::QuantumRegister,
};

fn main() {
    let shots: usize = 1000;
    let mut rng = StdRng::from_entropy();

    let mut qr = QuantumRegister::new(2);
    println!("fresh register     : {}", qr);
    qr.apply_unitary(&HADAMARD, &[0]);
    println!("after H on qubit 0 : {:.3}", qr);
    qr.apply_unitary(&CNOT, &[0, 1]);
    println!("after CNOT         : {:.3}", qr);
    println!(
        "probabilities      : P(00) = {:.3}, P(11) = {:.3}",
        qr.probability(0b00),
        qr.probability(0b11),
    );

    // the same state written down directly
    let ort2 = C64::from(FRAC_1_SQRT_2);
    let direct = QuantumRegister::from_superposition(
        2, [(0b00, ort2), (0b11, ort2)]);
    println!("gate-built register matches explicit amplitudes: {}",
        qr == direct);

    let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
    (0..shots).for_each(|_| {
        let outcome = qr.clone().measure(&[0, 1], &mut rng);
        *counts.entry(outcome.to_integer()).or_insert(0) += 1;
    });
    println!("{} Bell-pair shots:", shots);
    for state in 0..4 {
        println!(
            "  ∣{:02b}⟩ : {}",
            state,
            counts.get(&state).copied().unwrap_or(0),
        );
    }

    let n: usize = 4;
    let mut ghz = QuantumRegister::new(n);
    ghz.apply_unitary(&HADAMARD, &[0]);
    (0..n - 1).for_each(|k| { ghz.apply_unitary(&CNOT, &[k, k + 1]); });
    println!("{}-qubit GHZ        : {:.3}", n, ghz);
    let all: Vec<usize> = (0..n).collect();
    let outcome = ghz.measure(&all, &mut rng);
    println!("full measurement   : {}", outcome);
    println!("register afterward : {}", ghz);
}
