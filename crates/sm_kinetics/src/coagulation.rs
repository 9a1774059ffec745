use rand::Rng;
use sm_population::Mass;

use crate::Channel;
use crate::CoagulationKernel;
use crate::SimulationState;
use crate::SystemParameters;
use crate::sampling::distinct_pair;

/// Two molecules, `i` merges into `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCandidate {
    pub i: usize,
    pub j: usize,
    pub mi: Mass,
    pub mj: Mass,
}

/// The merge channel: any two chain molecules may coagulate with
/// propensity K(mi, mj).
#[derive(Debug, Clone, Copy)]
pub struct Coagulation<K: CoagulationKernel> {
    kernel: K,
    params: SystemParameters,
}

impl<K: CoagulationKernel> Coagulation<K> {
    pub fn new(kernel: K, params: SystemParameters) -> Self {
        Self { kernel, params }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

impl<K, S> Channel<S> for Coagulation<K>
where
    K: CoagulationKernel,
    S: SimulationState,
{
    type Candidate = MergeCandidate;

    fn name(&self) -> &'static str {
        "coagulation"
    }

    /// n_mol * (n_mol - 1) * density
    fn weight(&self, state: &S) -> f64 {
        let n = state.chains().n_mol();
        n as f64 * n.saturating_sub(1) as f64 * self.params.density()
    }

    fn is_eligible(&self, state: &S) -> bool {
        state.chains().n_mol() >= 2
    }

    fn initial_bound(&self) -> f64 {
        self.kernel.initial_bound()
    }

    fn draw<R: Rng + ?Sized>(&self, state: &S, rng: &mut R) -> Option<MergeCandidate> {
        let chains = state.chains();
        let (i, j) = distinct_pair(rng, chains.occupied_slots())?;
        Some(MergeCandidate { i, j, mi: chains.mass(i), mj: chains.mass(j) })
    }

    fn propensity(&self, _state: &S, c: &MergeCandidate) -> f64 {
        self.kernel.rate(c.mi, c.mj)
    }

    fn waiting_time(&self, state: &S, _c: &MergeCandidate, propensity: f64) -> f64 {
        self.params.merge_waiting_time(state.chains().n_mol(), propensity)
    }

    fn apply(&self, state: &mut S, c: &MergeCandidate) {
        state.chains_mut().merge(c.i, c.j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sm_population::Population;
    use crate::InverseMass;

    fn channel() -> Coagulation<InverseMass> {
        Coagulation::new(InverseMass, SystemParameters::new(4, 0.5, 1.0).unwrap())
    }

    #[test]
    fn test_coagulation_weight_and_eligibility() {
        let coag = channel();
        let pop = Population::monomers(4);
        assert_eq!(coag.weight(&pop), 4. * 3. * 0.5);
        assert!(coag.is_eligible(&pop));

        let single = Population::try_from(vec![0, 4, 0, 0]).unwrap();
        assert_eq!(coag.weight(&single), 0.);
        assert!(!coag.is_eligible(&single));
    }

    #[test]
    fn test_coagulation_draw_and_apply() {
        let coag = channel();
        let mut rng = StdRng::seed_from_u64(11);
        let mut pop = Population::try_from(vec![1, 0, 2, 0]).unwrap();

        let c = coag.draw(&pop, &mut rng).unwrap();
        assert_ne!(c.i, c.j);
        assert_eq!(c.mi + c.mj, 3);
        assert_eq!(coag.propensity(&pop, &c), 1.5);
        // 2 * 1 * 4 / (2 * 1 * 0.5 * 1.5)
        assert!((coag.waiting_time(&pop, &c, 1.5) - 8. / 1.5).abs() < 1e-12);

        coag.apply(&mut pop, &c);
        assert_eq!(pop.mass(c.j), 3);
        assert_eq!(pop.mass(c.i), 0);
        assert_eq!(pop.n_mol(), 1);
        assert!(coag.draw(&pop, &mut rng).is_none());
    }
}
