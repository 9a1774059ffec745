use std::fmt;
use std::convert::TryFrom;

use crate::Mass;
use crate::PopulationError;
use crate::parse_masses;

/// Masses of molecules that have cyclized. Rings never react again, so
/// the store only ever grows.
#[derive(Debug, Clone, Default)]
pub struct RingStore {
    masses: Vec<Mass>,
    total: u64,
}

impl RingStore {
    pub fn push(&mut self, mass: Mass) {
        debug_assert!(mass > 0, "rings must have positive mass");
        self.masses.push(mass);
        self.total += mass as u64;
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn total_mass(&self) -> u64 {
        self.total
    }

    /// Mean ring mass, 0 if no ring has formed yet.
    pub fn mean_mass(&self) -> f64 {
        if self.masses.is_empty() {
            0.0
        } else {
            self.total as f64 / self.masses.len() as f64
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Mass> + '_ {
        self.masses.iter().copied()
    }
}

impl TryFrom<Vec<Mass>> for RingStore {
    type Error = PopulationError;

    fn try_from(masses: Vec<Mass>) -> Result<Self, Self::Error> {
        if let Some(i) = masses.iter().position(|&m| m == 0) {
            return Err(PopulationError::ZeroRing(i));
        }
        let total = masses.iter().map(|&m| m as u64).sum();
        Ok(Self { masses, total })
    }
}

impl TryFrom<&str> for RingStore {
    type Error = PopulationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        RingStore::try_from(parse_masses(s)?)
    }
}

impl fmt::Display for RingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.masses {
            writeln!(f, "{}", m)?;
        }
        Ok(())
    }
}
