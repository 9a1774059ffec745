use sm_population::Mass;

use crate::ConfigError;
use crate::error::check_positive;
use crate::error::check_unit_interval;

/// Propensity K(mi, mj) of two molecules to merge into one.
pub trait CoagulationKernel {
    fn rate(&self, mi: Mass, mj: Mass) -> f64;

    /// Starting estimate for the upper bound on K. The bound is raised
    /// during a simulation whenever a larger value is observed.
    fn initial_bound(&self) -> f64 {
        self.rate(1, 1)
    }
}

/// K(mi, mj) = 1/mi + 1/mj
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseMass;

impl CoagulationKernel for InverseMass {
    fn rate(&self, mi: Mass, mj: Mass) -> f64 {
        1. / mi as f64 + 1. / mj as f64
    }
}

/// The De Gennes kernel for Gaussian chains:
/// K(mi, mj) = (sqrt(mi) + sqrt(mj)) * (1/mi + 1/mj)
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianChain;

impl CoagulationKernel for GaussianChain {
    fn rate(&self, mi: Mass, mj: Mass) -> f64 {
        let (mi, mj) = (mi as f64, mj as f64);
        (mi.sqrt() + mj.sqrt()) * (1. / mi + 1. / mj)
    }
}

/// Fragmentation rate F(m1, m2) = K_d / 2 * K(m1, m2) for breaking a
/// molecule of mass m1 + m2 into m1 and m2. Detailed balance with the
/// coagulation kernel K holds by construction.
#[derive(Debug, Clone, Copy)]
pub struct DetailedBalance<K: CoagulationKernel> {
    kernel: K,
    k_d: f64,
}

impl<K: CoagulationKernel> DetailedBalance<K> {
    pub fn new(kernel: K, k_d: f64) -> Result<Self, ConfigError> {
        let k_d = check_unit_interval("K_d", k_d)?;
        Ok(Self { kernel, k_d })
    }

    pub fn k_d(&self) -> f64 {
        self.k_d
    }

    pub fn rate(&self, m1: Mass, m2: Mass) -> f64 {
        0.5 * self.k_d * self.kernel.rate(m1, m2)
    }
}

/// Cyclization rate R(m) = prefactor * m^(-3/2).
#[derive(Debug, Clone, Copy)]
pub struct CyclizationRate {
    prefactor: f64,
}

impl CyclizationRate {
    pub fn new(prefactor: f64) -> Result<Self, ConfigError> {
        let prefactor = check_positive("ring_prefactor", prefactor)?;
        Ok(Self { prefactor })
    }

    pub fn prefactor(&self) -> f64 {
        self.prefactor
    }

    pub fn rate(&self, m: Mass) -> f64 {
        self.prefactor * (m as f64).powf(-1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernels() {
        assert_eq!(InverseMass.rate(1, 1), 2.0);
        assert_eq!(InverseMass.rate(2, 4), 0.75);
        assert_eq!(InverseMass.initial_bound(), 2.0);

        assert_eq!(GaussianChain.rate(1, 1), 4.0);
        assert!((GaussianChain.rate(4, 4) - 2.0).abs() < 1e-12);
        assert_eq!(GaussianChain.initial_bound(), 4.0);
    }

    #[test]
    fn test_detailed_balance() {
        let f = DetailedBalance::new(InverseMass, 1e-3).unwrap();
        assert!((f.rate(1, 1) - 1e-3).abs() < 1e-15);
        assert!((f.rate(3, 5) - 0.5e-3 * InverseMass.rate(3, 5)).abs() < 1e-15);
        assert!(DetailedBalance::new(InverseMass, 0.0).is_ok());
        assert!(DetailedBalance::new(InverseMass, 1.0).is_ok());
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert_eq!(
            DetailedBalance::new(InverseMass, 1.5).unwrap_err(),
            ConfigError::OutOfUnitInterval { name: "K_d", value: 1.5 }
        );
        assert!(DetailedBalance::new(InverseMass, -1e-3).is_err());
        assert!(DetailedBalance::new(InverseMass, f64::NAN).is_err());
        assert!(CyclizationRate::new(0.0).is_err());
        assert!(CyclizationRate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_cyclization_rate() {
        let r = CyclizationRate::new(2.0).unwrap();
        assert_eq!(r.rate(1), 2.0);
        assert!((r.rate(4) - 0.25).abs() < 1e-12);
    }
}
