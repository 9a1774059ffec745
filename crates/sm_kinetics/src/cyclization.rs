use rand::Rng;
use sm_population::Mass;

use crate::Channel;
use crate::ChainsAndRings;
use crate::CyclizationRate;
use crate::SystemParameters;
use crate::sampling::uniform_slot;

/// The chain in slot `k` of mass `mk` closes into a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclizeCandidate {
    pub k: usize,
    pub mk: Mass,
}

/// The cyclization channel: any chain closes into a ring with
/// propensity R(m). Rings leave the population for good.
#[derive(Debug, Clone, Copy)]
pub struct Cyclization {
    rate: CyclizationRate,
    params: SystemParameters,
}

impl Cyclization {
    pub fn new(rate: CyclizationRate, params: SystemParameters) -> Self {
        Self { rate, params }
    }

    pub fn prefactor(&self) -> f64 {
        self.rate.prefactor()
    }
}

impl Channel<ChainsAndRings> for Cyclization {
    type Candidate = CyclizeCandidate;

    fn name(&self) -> &'static str {
        "cyclization"
    }

    /// 2 * N * n_chains
    fn weight(&self, state: &ChainsAndRings) -> f64 {
        2. * self.params.n_total() as f64 * state.n_chains() as f64
    }

    fn is_eligible(&self, state: &ChainsAndRings) -> bool {
        state.n_chains() >= 1
    }

    fn initial_bound(&self) -> f64 {
        0.5 * self.rate.prefactor()
    }

    fn draw<R: Rng + ?Sized>(&self, state: &ChainsAndRings, rng: &mut R) -> Option<CyclizeCandidate> {
        let k = uniform_slot(rng, state.chains.occupied_slots())?;
        Some(CyclizeCandidate { k, mk: state.chains.mass(k) })
    }

    fn propensity(&self, _state: &ChainsAndRings, c: &CyclizeCandidate) -> f64 {
        self.rate.rate(c.mk)
    }

    fn waiting_time(&self, state: &ChainsAndRings, _c: &CyclizeCandidate, propensity: f64) -> f64 {
        self.params.cyclization_waiting_time(state.n_chains(), propensity)
    }

    fn apply(&self, state: &mut ChainsAndRings, c: &CyclizeCandidate) {
        state.chains.move_to_ring(c.k, &mut state.rings);
    }
}
