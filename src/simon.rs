//! Recover a hidden xor period from a two-to-one function.

use rand::{ rngs::StdRng, SeedableRng };
use sparse_sim::algo::{ bit_oracle, simon };

fn main() {
    let secret: usize = 0b101;
    let n: usize = 3;
    let mut rng = StdRng::from_entropy();

    // f(x) = f(x ⊕ secret): pair up the inputs and label each pair
    let mut f: Vec<usize> = vec![usize::MAX; 1 << n];
    let mut label: usize = 0;
    for x in 0..1 << n {
        if f[x] == usize::MAX {
            f[x] = label;
            f[x ^ secret] = label;
            label += 1;
        }
    }
    let oracle = bit_oracle(&f, n);

    let found: usize = simon(&oracle, &mut rng);
    println!("table    : {:?}", f);
    println!("secret   : {:03b}", secret);
    println!("recovered: {:03b}", found);
}
