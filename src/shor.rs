//! Factor small odd composites by quantum period finding.

use rand::{ rngs::StdRng, SeedableRng };
use sparse_sim::algo::{ shor, shor_trial };

fn main() {
    let mut rng = StdRng::from_entropy();

    // a fixed base first, to show the per-trial outcomes, retries included
    let n: u64 = 15;
    let a: u64 = 7;
    for trial in 0..4 {
        match shor_trial(n, a, &mut rng) {
            Ok((p, q)) => println!("trial {}: {} = {} × {}", trial, n, p, q),
            Err(err) => println!("trial {}: inconclusive: {}", trial, err),
        }
    }

    // the full loop draws fresh bases until one is conclusive
    for n in [15, 21] {
        let (p, q) = shor(n, &mut rng);
        println!("shor({}) = {} × {}", n, p, q);
    }
}
