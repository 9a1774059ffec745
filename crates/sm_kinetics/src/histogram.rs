use std::fmt;
use nohash_hasher::IntMap;
use serde::{Serialize, Deserialize};
use sm_population::Mass;
use sm_population::Population;

/// The distribution of occupied masses at one step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassHistogram {
    pub step: u64,
    pub time: f64,
    /// (mass, number of molecules) pairs, sorted by mass.
    pub bins: Vec<(Mass, usize)>,
}

impl MassHistogram {
    pub fn new(step: u64, time: f64, population: &Population) -> Self {
        Self::from_masses(step, time, population.occupied_masses())
    }

    pub fn from_masses<I>(step: u64, time: f64, masses: I) -> Self
    where
        I: IntoIterator<Item = Mass>,
    {
        let mut counts: IntMap<Mass, usize> = IntMap::default();
        for m in masses {
            *counts.entry(m).or_insert(0) += 1;
        }
        let mut bins: Vec<(Mass, usize)> = counts.into_iter().collect();
        bins.sort_unstable_by_key(|&(m, _)| m);
        Self { step, time, bins }
    }

    /// Number of molecules counted.
    pub fn molecules(&self) -> usize {
        self.bins.iter().map(|&(_, c)| c).sum()
    }

    /// Total mass counted.
    pub fn total_mass(&self) -> u64 {
        self.bins.iter().map(|&(m, c)| m as u64 * c as u64).sum()
    }
}

/// One `mass count` pair per line.
impl fmt::Display for MassHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (m, c) in &self.bins {
            writeln!(f, "{} {}", m, c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_of_population() {
        let pop = Population::try_from(vec![3, 0, 1, 2, 0, 1, 0, 3, 0, 0, 0]).unwrap();
        let hist = MassHistogram::new(20, 0.5, &pop);
        assert_eq!(hist.bins, vec![(1, 2), (2, 1), (3, 2)]);
        assert_eq!(hist.molecules(), pop.n_mol());
        assert_eq!(hist.total_mass(), pop.total_mass());
        assert_eq!(format!("{}", hist), "1 2\n2 1\n3 2\n");
    }

    #[test]
    fn test_histogram_ignores_empty_slots() {
        let hist = MassHistogram::from_masses(0, 0.0, Vec::<Mass>::new());
        assert!(hist.bins.is_empty());
        assert_eq!(format!("{}", hist), "");
    }
}
