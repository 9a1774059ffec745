use serde::{Serialize, Deserialize};

use crate::ConfigError;
use crate::error::check_positive;
use crate::error::check_unit_interval;

/// Parameters shared by both reaction channels of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemParameters {
    /// Total monomer budget N.
    n_total: usize,
    /// Reduced monomer number density.
    density: f64,
    /// Share of the clock attributed to coagulation events.
    alpha: f64,
}

impl SystemParameters {
    pub fn new(n_total: usize, density: f64, alpha: f64) -> Result<Self, ConfigError> {
        if n_total == 0 {
            return Err(ConfigError::NoMonomers);
        }
        let density = check_positive("density", density)?;
        let alpha = check_unit_interval("Alpha", alpha)?;
        Ok(Self { n_total, density, alpha })
    }

    pub fn n_total(&self) -> usize {
        self.n_total
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Time increment of an accepted merge with true rate `k` among `n_mol` molecules.
    pub fn merge_waiting_time(&self, n_mol: usize, k: f64) -> f64 {
        let n = n_mol as f64;
        increment(
            2. * self.alpha * self.n_total as f64,
            n * (n - 1.) * self.density * k,
        )
    }

    /// Time increment of an accepted fragmentation whose molecule-level
    /// propensity is `(mk - 1) * F(m1, m2)`, among `n_poly` polymers.
    pub fn fragmentation_waiting_time(&self, n_poly: usize, propensity: f64) -> f64 {
        increment(2. * (1. - self.alpha), n_poly as f64 * propensity)
    }

    /// Time increment of an accepted cyclization with rate `r` among `n_chains` chains.
    pub fn cyclization_waiting_time(&self, n_chains: usize, r: f64) -> f64 {
        increment(1. - self.alpha, n_chains as f64 * r)
    }
}

// A zero denominator means the channel had no eligible candidates, which
// never reaches acceptance. No time passes in that case.
fn increment(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0. {
        numerator / denominator
    } else {
        0.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_parameters_validation() {
        assert!(SystemParameters::new(100, 0.1, 1.0).is_ok());
        assert_eq!(SystemParameters::new(0, 0.1, 1.0).unwrap_err(), ConfigError::NoMonomers);
        assert!(SystemParameters::new(100, 0.0, 1.0).is_err());
        assert!(SystemParameters::new(100, -0.1, 0.5).is_err());
        assert!(SystemParameters::new(100, 0.1, 1.01).is_err());
        assert!(SystemParameters::new(100, 0.1, -0.01).is_err());
    }

    #[test]
    fn test_waiting_times() {
        let p = SystemParameters::new(10, 0.5, 0.5).unwrap();
        // 2 * 0.5 * 10 / (4 * 3 * 0.5 * 2)
        assert!((p.merge_waiting_time(4, 2.0) - 10. / 12.).abs() < 1e-12);
        // 2 * 0.5 / (2 * 0.25)
        assert!((p.fragmentation_waiting_time(2, 0.25) - 2.0).abs() < 1e-12);
        // 0.5 / (5 * 0.1)
        assert!((p.cyclization_waiting_time(5, 0.1) - 1.0).abs() < 1e-12);

        assert_eq!(p.merge_waiting_time(1, 2.0), 0.0);
        assert_eq!(p.fragmentation_waiting_time(0, 0.25), 0.0);
    }

    #[test]
    fn test_alpha_one_freezes_the_backward_clock() {
        let p = SystemParameters::new(10, 0.5, 1.0).unwrap();
        assert_eq!(p.fragmentation_waiting_time(3, 0.5), 0.0);
        assert_eq!(p.cyclization_waiting_time(3, 0.5), 0.0);
        assert!(p.merge_waiting_time(3, 1.0) > 0.0);
    }
}
