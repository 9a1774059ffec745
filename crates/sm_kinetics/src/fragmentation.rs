use rand::Rng;
use sm_population::Mass;

use crate::Channel;
use crate::CoagulationKernel;
use crate::DetailedBalance;
use crate::SimulationState;
use crate::SystemParameters;
use crate::sampling::uniform_slot;

/// The molecule in slot `k` of mass `mk` breaks into `m1` and `m2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCandidate {
    pub k: usize,
    pub mk: Mass,
    pub m1: Mass,
    pub m2: Mass,
}

/// The fragmentation channel: a polymer breaks at one of its `mk - 1`
/// bonds. The propensity of a candidate is `(mk - 1) * F(m1, m2)`, the
/// total breaking propensity of the molecule as estimated from the
/// sampled bond.
#[derive(Debug, Clone, Copy)]
pub struct Fragmentation<K: CoagulationKernel> {
    rate: DetailedBalance<K>,
    params: SystemParameters,
}

impl<K: CoagulationKernel> Fragmentation<K> {
    pub fn new(rate: DetailedBalance<K>, params: SystemParameters) -> Self {
        Self { rate, params }
    }

    pub fn k_d(&self) -> f64 {
        self.rate.k_d()
    }
}

impl<K, S> Channel<S> for Fragmentation<K>
where
    K: CoagulationKernel,
    S: SimulationState,
{
    type Candidate = SplitCandidate;

    fn name(&self) -> &'static str {
        "fragmentation"
    }

    /// N * n_poly
    fn weight(&self, state: &S) -> f64 {
        self.params.n_total() as f64 * state.chains().n_poly() as f64
    }

    fn is_eligible(&self, state: &S) -> bool {
        state.chains().n_poly() >= 1
    }

    /// The propensity of a dimer.
    fn initial_bound(&self) -> f64 {
        self.rate.rate(1, 1)
    }

    fn draw<R: Rng + ?Sized>(&self, state: &S, rng: &mut R) -> Option<SplitCandidate> {
        let chains = state.chains();
        let k = uniform_slot(rng, chains.splittable_slots())?;
        let mk = chains.mass(k);
        let m1 = rng.random_range(1..mk);
        Some(SplitCandidate { k, mk, m1, m2: mk - m1 })
    }

    fn propensity(&self, _state: &S, c: &SplitCandidate) -> f64 {
        (c.mk - 1) as f64 * self.rate.rate(c.m1, c.m2)
    }

    fn waiting_time(&self, state: &S, _c: &SplitCandidate, propensity: f64) -> f64 {
        self.params.fragmentation_waiting_time(state.chains().n_poly(), propensity)
    }

    fn apply(&self, state: &mut S, c: &SplitCandidate) {
        state.chains_mut().split(c.k, c.m1, c.m2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sm_population::Population;
    use crate::InverseMass;

    fn channel(k_d: f64) -> Fragmentation<InverseMass> {
        let params = SystemParameters::new(6, 0.1, 0.5).unwrap();
        Fragmentation::new(DetailedBalance::new(InverseMass, k_d).unwrap(), params)
    }

    #[test]
    fn test_fragmentation_draws_valid_partitions() {
        let frag = channel(1e-3);
        let mut rng = StdRng::seed_from_u64(5);
        let pop = Population::try_from(vec![1, 5, 0, 0, 0, 0]).unwrap();
        assert_eq!(frag.weight(&pop), 6.);

        let mut seen = [false; 5];
        for _ in 0..1000 {
            let c = frag.draw(&pop, &mut rng).unwrap();
            assert_eq!(c.k, 1);
            assert_eq!(c.mk, 5);
            assert!((1..5).contains(&c.m1));
            assert_eq!(c.m1 + c.m2, 5);
            seen[c.m1 as usize] = true;
        }
        assert!(seen[1..].iter().all(|&s| s));
    }

    #[test]
    fn test_fragmentation_propensity() {
        let frag = channel(1e-2);
        let pop = Population::try_from(vec![4, 0, 0, 0, 0, 0]).unwrap();
        let c = SplitCandidate { k: 0, mk: 4, m1: 1, m2: 3 };
        let f = 0.5 * 1e-2 * (1. + 1. / 3.);
        assert!((frag.propensity(&pop, &c) - 3. * f).abs() < 1e-15);
        // 2 * (1 - 0.5) / (1 * 3f)
        assert!((frag.waiting_time(&pop, &c, 3. * f) - 1. / (3. * f)).abs() < 1e-9);
        assert!((<Fragmentation<InverseMass> as Channel<Population>>::initial_bound(&frag) - 1e-2).abs() < 1e-15);
    }

    #[test]
    fn test_monomers_cannot_fragment() {
        let frag = channel(1e-3);
        let mut rng = StdRng::seed_from_u64(5);
        let pop = Population::monomers(6);
        assert!(!frag.is_eligible(&pop));
        assert_eq!(frag.weight(&pop), 0.);
        assert!(frag.draw(&pop, &mut rng).is_none());
    }
}
