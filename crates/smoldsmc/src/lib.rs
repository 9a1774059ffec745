//! # smoldsmc
//!
//! Kinetic Monte Carlo of Smoluchowski coagulation competing with
//! fragmentation or cyclization.
//!
//! This crate re-exports the main functionality from its submodules.

pub mod input_parsers;
pub mod kinetics_parsers;
pub mod output;
pub mod driver;

pub mod population {
    pub use ::sm_population::*;
}

pub mod kinetics {
    pub use ::sm_kinetics::*;
}

use std::io::Write;
use env_logger::Builder;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use log::info;
use log::warn;
use rand::Rng;
use rand::rng;
use sm_kinetics::SystemParameters;

pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(buf, "{}", record.args())
        })
        .init();
}

/// The given seed, or a fresh one from the thread generator.
pub fn acquire_seed(seed: Option<u64>) -> u64 {
    let seed = seed.unwrap_or_else(|| rng().random());
    info!("Using seed {}", seed);
    seed
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Warn if Alpha leaves no share of the clock to the backward reaction.
/// Returns whether the warning was issued.
pub fn warn_frozen_backward_clock(params: &SystemParameters, reaction: &str) -> bool {
    let frozen = params.alpha() == 1.0;
    if frozen {
        warn!("Alpha = 1: {} events do not advance the clock.", reaction);
    }
    frozen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_backward_clock() {
        let frozen = SystemParameters::new(100, 0.1, 1.0).unwrap();
        let shared = SystemParameters::new(100, 0.1, 0.5).unwrap();
        assert!(warn_frozen_backward_clock(&frozen, "cyclization"));
        assert!(warn_frozen_backward_clock(&frozen, "fragmentation"));
        assert!(!warn_frozen_backward_clock(&shared, "cyclization"));
    }

    #[test]
    fn test_acquire_given_seed() {
        assert_eq!(acquire_seed(Some(17)), 17);
    }
}
