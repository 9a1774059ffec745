mod error;
mod slot_set;
mod population;
mod rings;

pub use error::*;
pub use slot_set::*;
pub use population::*;
pub use rings::*;

/// Molecule masses count monomers. A u32 holds any monomer budget that
/// fits into memory as one slot per monomer; sums over a population are
/// accumulated as u64.
pub type Mass = u32;
