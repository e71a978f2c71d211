//! Classify constant and balanced functions with one oracle query each.

use rand::{ rngs::StdRng, SeedableRng };
use sparse_sim::algo::{ bit_oracle, deutsch_jozsa };

fn main() {
    let mut rng = StdRng::from_entropy();

    let constant: Vec<usize> = vec![1; 16];
    let balanced: Vec<usize> =
        vec![1, 0, 0, 0, 0, 1, 1, 0, 1, 1, 0, 1, 0, 0, 1, 1];

    for (name, table) in [("constant", &constant), ("balanced", &balanced)] {
        let oracle = bit_oracle(table, 1);
        let verdict = deutsch_jozsa(&oracle, &mut rng);
        println!("{} table: {:?}", name, table);
        println!("  classified as {:?} after a single query", verdict);
    }
}
