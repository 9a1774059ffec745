use std::fmt;
use serde::{Serialize, Deserialize};
use sm_population::Population;

use crate::ChainsAndRings;

/// Summary statistics of a state, recorded after every accepted event.
pub trait Observe {
    type Record: fmt::Display + Serialize;

    fn observe(&self, time: f64) -> Self::Record;

    /// The quantity tracked by a [`crate::timeline::Timeline`].
    fn mean_mass(&self) -> f64;
}

/// One line of the merge/fragmentation time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentationRecord {
    pub time: f64,
    /// Mean mass over occupied slots.
    pub mean_mass: f64,
    /// Extent of reaction, `1 - n_mol / N`.
    pub extent: f64,
}

impl Observe for Population {
    type Record = FragmentationRecord;

    fn observe(&self, time: f64) -> FragmentationRecord {
        let extent = if self.is_empty() {
            0.0
        } else {
            1.0 - self.n_mol() as f64 / self.len() as f64
        };
        FragmentationRecord {
            time,
            mean_mass: Population::mean_mass(self),
            extent,
        }
    }

    fn mean_mass(&self) -> f64 {
        Population::mean_mass(self)
    }
}

impl fmt::Display for FragmentationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4e} {:.4e} {:.4e}", self.time, self.mean_mass, self.extent)
    }
}

/// One line of the merge/cyclization time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclizationRecord {
    pub time: f64,
    /// Mean mass over chains and rings together.
    pub mean_mass: f64,
    pub mean_chain_mass: f64,
    /// 0 while there are no rings.
    pub mean_ring_mass: f64,
    pub n_chains: usize,
    pub n_rings: usize,
}

impl CyclizationRecord {
    /// The molecule counts of this record, written to a separate series.
    pub fn counts(&self) -> MoleculeCounts {
        MoleculeCounts {
            time: self.time,
            n_chains: self.n_chains,
            n_rings: self.n_rings,
        }
    }
}

impl Observe for ChainsAndRings {
    type Record = CyclizationRecord;

    fn observe(&self, time: f64) -> CyclizationRecord {
        CyclizationRecord {
            time,
            mean_mass: Observe::mean_mass(self),
            mean_chain_mass: self.chains.mean_mass(),
            mean_ring_mass: self.rings.mean_mass(),
            n_chains: self.n_chains(),
            n_rings: self.n_rings(),
        }
    }

    fn mean_mass(&self) -> f64 {
        let molecules = self.n_chains() + self.n_rings();
        if molecules == 0 {
            0.0
        } else {
            self.total_mass() as f64 / molecules as f64
        }
    }
}

impl fmt::Display for CyclizationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4e} {:.4e} {:.4e} {:.4e}",
            self.time, self.mean_mass, self.mean_chain_mass, self.mean_ring_mass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoleculeCounts {
    pub time: f64,
    pub n_chains: usize,
    pub n_rings: usize,
}

impl fmt::Display for MoleculeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4e} {} {}", self.time, self.n_chains, self.n_rings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_population::RingStore;

    #[test]
    fn test_fragmentation_record() {
        let pop = Population::try_from(vec![3, 0, 0, 1]).unwrap();
        let record = pop.observe(12.5);
        assert_eq!(record.mean_mass, 2.0);
        assert_eq!(record.extent, 0.5);
        assert_eq!(format!("{}", record), "1.2500e1 2.0000e0 5.0000e-1");
    }

    #[test]
    fn test_fresh_population_has_zero_extent() {
        let record = Population::monomers(10).observe(0.0);
        assert_eq!(record.extent, 0.0);
        assert_eq!(record.mean_mass, 1.0);
    }

    #[test]
    fn test_cyclization_record() {
        let mut state = ChainsAndRings::from(Population::monomers(6));
        state.chains.merge(0, 1);
        state.chains.merge(2, 3);
        let record = state.observe(1.0);
        assert_eq!(record.mean_ring_mass, 0.0);
        assert_eq!(record.n_rings, 0);
        assert_eq!(record.mean_mass, 1.5);

        let ChainsAndRings { chains, rings } = &mut state;
        chains.move_to_ring(3, rings);
        let record = state.observe(2.0);
        assert_eq!(record.n_chains, 3);
        assert_eq!(record.n_rings, 1);
        assert_eq!(record.mean_ring_mass, 2.0);
        assert_eq!(record.mean_chain_mass, 4.0 / 3.0);
        assert_eq!(record.mean_mass, 1.5);
        assert_eq!(format!("{}", record.counts()), "2.0000e0 3 1");

        let empty = RingStore::default();
        assert_eq!(empty.mean_mass(), 0.0);
    }
}
