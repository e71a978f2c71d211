//! Teleport an arbitrary single-qubit state across a shared Bell pair.

use std::f64::consts::PI;
use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::{ rngs::StdRng, Rng, SeedableRng };
use sparse_sim::{
    gate::{ Unitary, CNOT, HADAMARD, PAULI_X, PAULI_Z },
    register::QuantumRegister,
};

fn main() {
    let mut rng = StdRng::from_entropy();
    let theta: f64 = rng.gen_range(0.0..PI);
    println!("payload angle θ    : {:.3}", theta);

    // payload preparation: cos θ ∣0⟩ + sin θ ∣1⟩ on qubit 0
    let mut mat = na::DMatrix::from_element(2, 2, C64::from(0.0));
    mat[(0, 0)] = C64::from(theta.cos());
    mat[(0, 1)] = C64::from(theta.sin());
    mat[(1, 0)] = C64::from(-theta.sin());
    mat[(1, 1)] = C64::from(theta.cos());
    let prep = Unitary::new(mat);

    let mut qr = QuantumRegister::new(3);
    qr.apply_unitary(&prep, &[0]);
    println!("payload            : {:.3}", qr);
    println!(
        "payload probability: P(0) = {:.3}, P(1) = {:.3}",
        theta.cos().powi(2),
        theta.sin().powi(2),
    );

    // share a Bell pair between sender (qubit 1) and receiver (qubit 2)
    qr.apply_unitary(&HADAMARD, &[1]);
    qr.apply_unitary(&CNOT, &[1, 2]);

    // entangle the payload with the sender's half and measure both
    qr.apply_unitary(&CNOT, &[0, 1]);
    qr.apply_unitary(&HADAMARD, &[0]);
    let outcome = qr.measure(&[0, 1], &mut rng);
    println!("sender measured    : {}", outcome);

    // classical corrections on the receiver
    if outcome.qubit(1) { qr.apply_unitary(&PAULI_X, &[2]); }
    if outcome.qubit(0) { qr.apply_unitary(&PAULI_Z, &[2]); }
    println!("receiver now holds : {:.3}", qr);

    let p1: f64 =
        (0..8).filter(|s| s & 1 == 1).map(|s| qr.probability(s)).sum();
    println!(
        "receiver probability: P(0) = {:.3}, P(1) = {:.3}",
        1.0 - p1,
        p1,
    );
}
