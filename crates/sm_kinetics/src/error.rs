use std::fmt;

/// Invalid model or run parameters. These are rejected when a model is
/// built and are never clamped into range.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NotFinite { name: &'static str, value: f64 },
    NotPositive { name: &'static str, value: f64 },
    OutOfUnitInterval { name: &'static str, value: f64 },
    NoMonomers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFinite { name, value } => {
                write!(f, "Parameter {} must be finite (got {})", name, value)
            }
            ConfigError::NotPositive { name, value } => {
                write!(f, "Parameter {} must be positive (got {})", name, value)
            }
            ConfigError::OutOfUnitInterval { name, value } => {
                write!(f, "Parameter {} must be in interval [0,1] (got {})", name, value)
            }
            ConfigError::NoMonomers => {
                write!(f, "The number of monomers must be positive")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { name, value });
    }
    if value <= 0. {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(value)
}

pub(crate) fn check_unit_interval(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !(0. ..=1.).contains(&value) {
        return Err(ConfigError::OutOfUnitInterval { name, value });
    }
    Ok(value)
}
