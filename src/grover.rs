//! Search an unstructured space of 256 indices for a single marked one.

use rand::{ rngs::StdRng, SeedableRng };
use sparse_sim::algo::{ grover, phase_oracle };

fn main() {
    let marked: usize = 123;
    let runs: usize = 20;
    let mut rng = StdRng::from_entropy();

    let mut f: Vec<bool> = vec![false; 256];
    f[marked] = true;
    let oracle = phase_oracle(&f);

    let mut hits: usize = 0;
    for run in 0..runs {
        let found: usize = grover(&oracle, 1, &mut rng);
        if found == marked { hits += 1; }
        println!("run {:2}: found {:3}", run, found);
    }
    println!("{}/{} runs landed on the marked index", hits, runs);
}
