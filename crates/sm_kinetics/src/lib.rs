pub mod sampling;
pub mod coagulation;
pub mod fragmentation;
pub mod cyclization;
pub mod observables;
pub mod histogram;
pub mod timeline;
pub mod timeline_io;
pub mod timeline_plotting;

mod error;
mod rate_model;
mod parameters;
mod clock;
mod bounds;
mod state;
mod channel;
mod stochastic_simulation;

pub use error::*;
pub use rate_model::*;
pub use parameters::*;
pub use clock::*;
pub use bounds::*;
pub use state::*;
pub use channel::*;
pub use stochastic_simulation::*;

pub use coagulation::{Coagulation, MergeCandidate};
pub use fragmentation::{Fragmentation, SplitCandidate};
pub use cyclization::{Cyclization, CyclizeCandidate};
pub use observables::{Observe, FragmentationRecord, CyclizationRecord, MoleculeCounts};
pub use histogram::MassHistogram;
