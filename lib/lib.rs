//! Tools for simulating registers of qubits as sparse superpositions of
//! computational basis states.
//!
//! States are held as mappings from basis-state index to complex amplitude,
//! with near-zero amplitudes pruned after every gate so that long circuits
//! (e.g. Grover iteration) don't accumulate numerical dust. Gates come in
//! three representations (dense unitary matrices, classical-reversible
//! permutations, and diagonal phase rotations) and can be applied to any
//! ordered subset of a register's qubits.

pub mod basis;
pub mod gate;
pub mod register;
pub mod math;
pub mod algo;
