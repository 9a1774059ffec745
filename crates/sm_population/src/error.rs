use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum PopulationError {
    Empty,                                      // a population needs at least one slot
    Overfull { slots: usize, mass: u64 },       // more monomers than slots
    MassMismatch { found: u64, expected: u64 }, // restart dump does not add up
    InvalidEntry { line: usize, token: String },
    ZeroRing(usize),                            // ring store entry without mass
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulationError::Empty => {
                write!(f, "Population must have at least one slot")
            }
            PopulationError::Overfull { slots, mass } => {
                write!(f, "Total mass {} does not fit into {} slots", mass, slots)
            }
            PopulationError::MassMismatch { found, expected } => {
                write!(f, "Total mass {} does not match the configured {} monomers", found, expected)
            }
            PopulationError::InvalidEntry { line, token } => {
                write!(f, "Invalid mass '{}' at line {}", token, line)
            }
            PopulationError::ZeroRing(i) => {
                write!(f, "Ring {} has zero mass", i)
            }
        }
    }
}

impl std::error::Error for PopulationError {}

