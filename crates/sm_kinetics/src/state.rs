use sm_population::Mass;
use sm_population::Population;
use sm_population::PopulationError;
use sm_population::RingStore;

/// The mutable state a simulation operates on. Chain molecules, i.e.
/// everything that can still merge, live in a [`Population`].
pub trait SimulationState {
    fn chains(&self) -> &Population;
    fn chains_mut(&mut self) -> &mut Population;

    /// True if no further step may be taken from this state.
    fn is_halted(&self) -> bool {
        false
    }
}

impl SimulationState for Population {
    fn chains(&self) -> &Population {
        self
    }

    fn chains_mut(&mut self) -> &mut Population {
        self
    }
}

/// Linear chains together with the rings that have formed from them.
#[derive(Debug, Clone)]
pub struct ChainsAndRings {
    pub chains: Population,
    pub rings: RingStore,
}

impl From<Population> for ChainsAndRings {
    fn from(chains: Population) -> Self {
        Self { chains, rings: RingStore::default() }
    }
}

impl ChainsAndRings {
    /// Rebuild from the restart dumps of chains and rings, which together
    /// must hold exactly `expected` monomers.
    pub fn from_dumps(
        chains: Vec<Mass>,
        rings: Vec<Mass>,
        expected: u64,
    ) -> Result<Self, PopulationError> {
        let chains = Population::try_from(chains)?;
        let rings = RingStore::try_from(rings)?;
        let found = chains.total_mass() + rings.total_mass();
        if found != expected {
            return Err(PopulationError::MassMismatch { found, expected });
        }
        Ok(Self { chains, rings })
    }

    pub fn n_chains(&self) -> usize {
        self.chains.n_mol()
    }

    pub fn n_rings(&self) -> usize {
        self.rings.len()
    }

    /// Monomers in chains and rings together.
    pub fn total_mass(&self) -> u64 {
        self.chains.total_mass() + self.rings.total_mass()
    }
}

impl SimulationState for ChainsAndRings {
    fn chains(&self) -> &Population {
        &self.chains
    }

    fn chains_mut(&mut self) -> &mut Population {
        &mut self.chains
    }

    /// A single chain has no coagulation partner left.
    fn is_halted(&self) -> bool {
        self.chains.n_mol() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chains_and_rings_from_dumps() {
        let state = ChainsAndRings::from_dumps(vec![2, 0, 1, 0, 0], vec![2], 5).unwrap();
        assert_eq!(state.n_chains(), 2);
        assert_eq!(state.n_rings(), 1);
        assert_eq!(state.total_mass(), 5);
        assert!(!state.is_halted());

        let err = ChainsAndRings::from_dumps(vec![2, 0, 1, 0, 0], vec![], 5).unwrap_err();
        assert_eq!(err, PopulationError::MassMismatch { found: 3, expected: 5 });

        let err = ChainsAndRings::from_dumps(vec![1, 0], vec![0], 1).unwrap_err();
        assert_eq!(err, PopulationError::ZeroRing(0));
    }

    #[test]
    fn test_single_chain_is_halted() {
        let state = ChainsAndRings::from_dumps(vec![3, 0, 0, 0], vec![1], 4).unwrap();
        assert!(state.is_halted());
        assert!(!Population::monomers(1).is_halted());
    }
}
