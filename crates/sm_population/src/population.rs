use std::fmt;
use std::convert::TryFrom;

use crate::Mass;
use crate::SlotSet;
use crate::RingStore;
use crate::PopulationError;

/// The molecules of a simulation, stored as a fixed-length array of slots.
///
/// Every slot either holds the mass of one molecule or 0 (no molecule).
/// The number of slots never changes during a run. Occupied, splittable
/// (mass > 1) and empty slots are tracked in [`SlotSet`]s, which keeps
/// `n_mol` and `n_poly` consistent with the array after every mutation
/// and allows uniform sampling of eligible slots in O(1).
#[derive(Debug, Clone)]
pub struct Population {
    masses: Vec<Mass>,
    occupied: SlotSet,
    splittable: SlotSet,
    empty: SlotSet,
    total: u64,
}

impl Population {
    /// `n` monomers, one per slot.
    pub fn monomers(n: usize) -> Self {
        let mut occupied = SlotSet::with_capacity(n);
        for slot in 0..n {
            occupied.insert(slot);
        }
        Self {
            masses: vec![1; n],
            occupied,
            splittable: SlotSet::with_capacity(n),
            empty: SlotSet::with_capacity(n),
            total: n as u64,
        }
    }

    /// Rebuild a population from a restart dump, requiring that the
    /// occupied masses add up to `expected` monomers.
    pub fn from_dump(masses: Vec<Mass>, expected: u64) -> Result<Self, PopulationError> {
        let population = Self::try_from(masses)?;
        if population.total != expected {
            return Err(PopulationError::MassMismatch {
                found: population.total,
                expected,
            });
        }
        Ok(population)
    }

    /// Number of slots (the monomer budget N of a fresh run).
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn masses(&self) -> &[Mass] {
        &self.masses
    }

    pub fn mass(&self, slot: usize) -> Mass {
        self.masses[slot]
    }

    /// Number of molecules.
    pub fn n_mol(&self) -> usize {
        self.occupied.len()
    }

    /// Number of molecules that can still fragment (mass > 1).
    pub fn n_poly(&self) -> usize {
        self.splittable.len()
    }

    /// Sum over all occupied slots.
    pub fn total_mass(&self) -> u64 {
        self.total
    }

    /// Mean mass over occupied slots, 0 if there are none.
    pub fn mean_mass(&self) -> f64 {
        if self.occupied.is_empty() {
            0.0
        } else {
            self.total as f64 / self.occupied.len() as f64
        }
    }

    pub fn occupied_slots(&self) -> &[usize] {
        &self.occupied
    }

    pub fn splittable_slots(&self) -> &[usize] {
        &self.splittable
    }

    pub fn empty_slot(&self) -> Option<usize> {
        self.empty.last().copied()
    }

    pub fn occupied_masses(&self) -> impl Iterator<Item = Mass> + '_ {
        self.masses.iter().copied().filter(|&m| m > 0)
    }

    /// Count molecules and polymers by scanning the whole array.
    pub fn recount(&self) -> (usize, usize) {
        self.masses.iter().fold((0, 0), |(n_mol, n_poly), &m| {
            (n_mol + (m > 0) as usize, n_poly + (m > 1) as usize)
        })
    }

    /// Merge the molecule in slot `i` into slot `j`. Slot `i` becomes
    /// empty. Returns the merged mass.
    pub fn merge(&mut self, i: usize, j: usize) -> Mass {
        debug_assert!(i != j, "cannot merge slot {i} with itself");
        debug_assert!(self.masses[i] > 0 && self.masses[j] > 0, "merge of empty slot");

        let merged = self.masses[i] + self.masses[j];
        self.masses[j] = merged;
        self.masses[i] = 0;

        self.occupied.remove(i);
        self.splittable.remove(i);
        self.empty.insert(i);
        self.splittable.insert(j);
        merged
    }

    /// Split the molecule in slot `k` into fragments `m1` (kept in `k`)
    /// and `m2` (written into an empty slot). Returns the slot of `m2`.
    pub fn split(&mut self, k: usize, m1: Mass, m2: Mass) -> usize {
        debug_assert!(m1 > 0 && m2 > 0, "fragments must have positive mass");
        debug_assert_eq!(self.masses[k], m1 + m2, "fragments must add up");

        let slot = self.empty_slot()
            .expect("A molecule with mass > 1 implies an empty slot.");

        self.masses[k] = m1;
        if m1 == 1 {
            self.splittable.remove(k);
        }

        self.masses[slot] = m2;
        self.empty.remove(slot);
        self.occupied.insert(slot);
        if m2 > 1 {
            self.splittable.insert(slot);
        }
        slot
    }

    /// Remove the molecule in slot `k` from the population and store it
    /// as a ring. Returns the mass of the ring.
    pub fn move_to_ring(&mut self, k: usize, rings: &mut RingStore) -> Mass {
        let mass = self.masses[k];
        debug_assert!(mass > 0, "cannot cyclize empty slot {k}");

        self.masses[k] = 0;
        self.occupied.remove(k);
        self.splittable.remove(k);
        self.empty.insert(k);
        self.total -= mass as u64;
        rings.push(mass);
        mass
    }
}

impl TryFrom<Vec<Mass>> for Population {
    type Error = PopulationError;

    fn try_from(masses: Vec<Mass>) -> Result<Self, Self::Error> {
        if masses.is_empty() {
            return Err(PopulationError::Empty);
        }
        let n = masses.len();
        let mut occupied = SlotSet::with_capacity(n);
        let mut splittable = SlotSet::with_capacity(n);
        let mut empty = SlotSet::with_capacity(n);
        let mut total = 0u64;
        for (slot, &m) in masses.iter().enumerate() {
            total += m as u64;
            match m {
                0 => { empty.insert(slot); }
                1 => { occupied.insert(slot); }
                _ => {
                    occupied.insert(slot);
                    splittable.insert(slot);
                }
            }
        }
        if total > n as u64 {
            return Err(PopulationError::Overfull { slots: n, mass: total });
        }
        Ok(Self { masses, occupied, splittable, empty, total })
    }
}

/// Parses a restart dump: one mass per line, zeros included. Blank lines
/// are skipped.
impl TryFrom<&str> for Population {
    type Error = PopulationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Population::try_from(parse_masses(s)?)
    }
}

/// One mass per line; blank lines are skipped.
pub fn parse_masses(s: &str) -> Result<Vec<Mass>, PopulationError> {
    let mut masses = Vec::new();
    for (i, line) in s.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        let m = token.parse::<Mass>().map_err(|_| PopulationError::InvalidEntry {
            line: i + 1,
            token: token.to_string(),
        })?;
        masses.push(m);
    }
    Ok(masses)
}

/// The restart dump format.
impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.masses {
            writeln!(f, "{}", m)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(pop: &Population) {
        assert_eq!(pop.recount(), (pop.n_mol(), pop.n_poly()));
        assert_eq!(pop.occupied_masses().map(|m| m as u64).sum::<u64>(), pop.total_mass());
        for &s in pop.occupied_slots() {
            assert!(pop.mass(s) > 0);
        }
        for &s in pop.splittable_slots() {
            assert!(pop.mass(s) > 1);
        }
    }

    #[test]
    fn test_monomers() {
        let pop = Population::monomers(5);
        assert_eq!(pop.len(), 5);
        assert_eq!(pop.n_mol(), 5);
        assert_eq!(pop.n_poly(), 0);
        assert_eq!(pop.total_mass(), 5);
        assert_eq!(pop.empty_slot(), None);
        assert_eq!(pop.mean_mass(), 1.0);
        assert_consistent(&pop);
    }

    #[test]
    fn test_merge_updates_polymer_count() {
        // monomer + monomer: a new polymer
        let mut pop = Population::try_from(vec![1, 1, 2, 3, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(pop.n_poly(), 2);
        assert_eq!(pop.merge(0, 1), 2);
        assert_eq!(pop.n_poly(), 3);
        assert_eq!(pop.n_mol(), 3);
        assert_consistent(&pop);

        // polymer + polymer: one polymer less
        let mut pop = Population::try_from(vec![1, 1, 2, 3, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(pop.merge(2, 3), 5);
        assert_eq!(pop.n_poly(), 1);
        assert_consistent(&pop);

        // monomer + polymer, either way round: unchanged
        let mut pop = Population::try_from(vec![1, 1, 2, 3, 0, 0, 0, 0, 0]).unwrap();
        pop.merge(0, 2);
        assert_eq!(pop.n_poly(), 2);
        pop.merge(3, 1);
        assert_eq!(pop.n_poly(), 2);
        assert_eq!(pop.masses(), &[0, 4, 3, 0, 0, 0, 0, 0, 0]);
        assert_consistent(&pop);
    }

    #[test]
    fn test_split_updates_polymer_count() {
        let mut pop = Population::try_from(vec![2, 0, 4, 0, 0, 0]).unwrap();
        let was_empty: Vec<usize> = (0..pop.len()).filter(|&k| pop.mass(k) == 0).collect();
        let slot = pop.split(0, 1, 1);
        assert!(was_empty.contains(&slot));
        assert_eq!(pop.mass(slot), 1);
        assert_eq!(pop.mass(0), 1);
        assert_eq!(pop.n_poly(), 1);
        assert_eq!(pop.n_mol(), 3);
        assert_consistent(&pop);

        let slot = pop.split(2, 2, 2);
        assert_eq!(pop.mass(slot), 2);
        assert_eq!(pop.n_poly(), 2);
        assert_eq!(pop.n_mol(), 4);
        assert_eq!(pop.total_mass(), 6);
        assert_consistent(&pop);
    }

    #[test]
    fn test_merge_then_split_restores_monomers() {
        let mut pop = Population::monomers(4);
        pop.merge(0, 1);
        assert_eq!(pop.n_poly(), 1);
        assert_eq!(pop.n_mol(), 3);

        // the only partition of a dimer
        let slot = pop.split(1, 1, 1);
        assert_eq!(slot, 0);
        assert_eq!(pop.masses(), &[1, 1, 1, 1]);
        assert_eq!(pop.n_poly(), 0);
        assert_eq!(pop.n_mol(), 4);
        assert_consistent(&pop);
    }

    #[test]
    fn test_move_to_ring() {
        let mut pop = Population::monomers(3);
        let mut rings = RingStore::default();
        pop.merge(0, 1);
        assert_eq!(pop.move_to_ring(1, &mut rings), 2);
        assert_eq!(pop.n_mol(), 1);
        assert_eq!(pop.n_poly(), 0);
        assert_eq!(pop.total_mass(), 1);
        assert_eq!(rings.len(), 1);
        assert_eq!(pop.total_mass() + rings.total_mass(), 3);
        assert_consistent(&pop);
    }

    #[test]
    fn test_population_from_dump() {
        let pop = Population::try_from("3\n0\n0\n1\n\n").unwrap();
        assert_eq!(pop.masses(), &[3, 0, 0, 1]);
        assert_eq!(pop.n_poly(), 1);
        assert_eq!(format!("{}", pop), "3\n0\n0\n1\n");

        let err = Population::from_dump(vec![3, 0, 0, 0], 4).unwrap_err();
        assert_eq!(err, PopulationError::MassMismatch { found: 3, expected: 4 });

        let err = Population::try_from("1\nx\n").unwrap_err();
        assert!(matches!(err, PopulationError::InvalidEntry { line: 2, .. }));

        let err = Population::try_from(vec![5, 0]).unwrap_err();
        assert!(matches!(err, PopulationError::Overfull { .. }));

        assert_eq!(Population::try_from(vec![]).unwrap_err(), PopulationError::Empty);
    }
}
