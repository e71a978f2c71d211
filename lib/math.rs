//! Classical number-theory helpers for the pre- and post-processing stages
//! of Shor's algorithm.

/// Return the greatest common divisor of `a` and `b`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Return `base^exp mod modulus` by binary exponentiation.
///
/// *Panics if `modulus` is zero.*
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 0 {
        panic!("mod_pow: modulus must be nonzero");
    }
    let m: u128 = u128::from(modulus);
    let mut acc: u128 = 1 % m;
    let mut b: u128 = u128::from(base) % m;
    while exp != 0 {
        if exp & 1 == 1 { acc = acc * b % m; }
        b = b * b % m;
        exp >>= 1;
    }
    acc as u64
}

/// Return the continued-fraction expansion of `num / den` as its list of
/// integer quotients.
///
/// *Panics if `den` is zero.*
pub fn continued_fraction(mut num: u64, mut den: u64) -> Vec<u64> {
    if den == 0 {
        panic!("continued_fraction: denominator must be nonzero");
    }
    let mut expansion: Vec<u64> = Vec::new();
    while den != 0 {
        expansion.push(num / den);
        (num, den) = (den, num % den);
    }
    expansion
}

/// Return every prefix convergent `h_k / k_k` of a continued-fraction
/// expansion, in order.
///
/// The last convergent reconstructs the expanded fraction in lowest terms;
/// the earlier ones are its best rational approximations with smaller
/// denominators.
pub fn convergents(expansion: &[u64]) -> Vec<(u64, u64)> {
    let mut acc: Vec<(u64, u64)> = Vec::with_capacity(expansion.len());
    let (mut h0, mut k0): (u64, u64) = (0, 1);
    let (mut h1, mut k1): (u64, u64) = (1, 0);
    for &a in expansion.iter() {
        let h: u64 = a * h1 + h0;
        let k: u64 = a * k1 + k0;
        acc.push((h, k));
        (h0, k0) = (h1, k1);
        (h1, k1) = (h, k);
    }
    acc
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(48, 18), 6);
        assert_eq!(gcd(18, 48), 6);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(5, 0), 5);
        assert_eq!(gcd(221, 19 * 13), 13);
    }

    #[test]
    fn mod_pow_agrees_with_naive() {
        let m: u64 = 1_000_003;
        let mut naive: u64 = 1;
        for exp in 0..20 {
            assert_eq!(mod_pow(3, exp, m), naive);
            naive = naive * 3 % m;
        }
        assert_eq!(mod_pow(7, 4, 15), 1);
        assert_eq!(mod_pow(19, 0, 221), 1);
        assert_eq!(mod_pow(10, 2, 1), 0);
        // intermediate squares overflow 64 bits without widening
        assert_eq!(mod_pow(u64::MAX - 1, 2, u64::MAX), 1);
    }

    #[test]
    fn continued_fraction_quotients() {
        assert_eq!(continued_fraction(64, 256), vec![0, 4]);
        assert_eq!(continued_fraction(192, 256), vec![0, 1, 3]);
        assert_eq!(continued_fraction(415, 93), vec![4, 2, 6, 7]);
        assert_eq!(continued_fraction(0, 7), vec![0]);
    }

    #[test]
    fn convergent_reconstruction() {
        assert_eq!(convergents(&[0, 4]), vec![(0, 1), (1, 4)]);
        assert_eq!(convergents(&[0, 1, 3]).last(), Some(&(3, 4)));
        assert_eq!(
            convergents(&[4, 2, 6, 7]),
            vec![(4, 1), (9, 2), (58, 13), (415, 93)],
        );
        // the final convergent is the original fraction in lowest terms
        let exp = continued_fraction(6, 4);
        assert_eq!(convergents(&exp).last(), Some(&(3, 2)));
    }
}
