//! Uniform draws of reaction participants from eligible slot lists.

use rand::Rng;

/// A uniformly random member of `slots`, or `None` if there is none.
pub fn uniform_slot<R: Rng + ?Sized>(rng: &mut R, slots: &[usize]) -> Option<usize> {
    if slots.is_empty() {
        return None;
    }
    Some(slots[rng.random_range(0..slots.len())])
}

/// An ordered pair `(i, j)` of distinct members of `slots`, uniformly
/// distributed over all `n * (n - 1)` such pairs. `None` if `slots` has
/// fewer than two members.
///
/// The second position is drawn from the `n - 1` positions left after
/// the first one and shifted past it, so no draw is ever discarded.
pub fn distinct_pair<R: Rng + ?Sized>(rng: &mut R, slots: &[usize]) -> Option<(usize, usize)> {
    let n = slots.len();
    if n < 2 {
        return None;
    }
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    Some((slots[a], slots[b]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use nohash_hasher::IntMap;

    #[test]
    fn test_uniform_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(uniform_slot(&mut rng, &[]), None);
        assert_eq!(uniform_slot(&mut rng, &[7]), Some(7));
        for _ in 0..100 {
            let s = uniform_slot(&mut rng, &[2, 4, 8]).unwrap();
            assert!([2, 4, 8].contains(&s));
        }
    }

    #[test]
    fn test_distinct_pair_edge_cases() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(distinct_pair(&mut rng, &[]), None);
        assert_eq!(distinct_pair(&mut rng, &[3]), None);
        for _ in 0..100 {
            let (i, j) = distinct_pair(&mut rng, &[3, 9]).unwrap();
            assert_ne!(i, j);
        }
    }

    #[test]
    fn test_distinct_pair_is_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let slots = [10, 20, 30];
        let draws = 60_000;
        let mut counts: IntMap<usize, usize> = IntMap::default();
        for _ in 0..draws {
            let (i, j) = distinct_pair(&mut rng, &slots).unwrap();
            assert_ne!(i, j);
            *counts.entry(i * 100 + j).or_insert(0) += 1;
        }
        // six ordered pairs, 10000 expected each
        assert_eq!(counts.len(), 6);
        for (&pair, &count) in counts.iter() {
            assert!((9_400..10_600).contains(&count), "pair {pair} drawn {count} times");
        }
    }
}
