use thiserror::Error;

/// Errors surfaced by the simulation API.
#[derive(Debug, Error)]
pub enum SimError {
    /// An aggregate was requested over an empty body set.
    #[error("operation requires at least one body")]
    EmptyInput,

    /// A construction or spawn parameter is outside its valid range.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A scenario file could not be parsed.
    #[error("failed to parse scenario: {0}")]
    Config(#[from] toml::de::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value, "must be finite and positive"))
    }
}

/// Fails unless `value` is finite and not negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value, "must be finite and non-negative"))
    }
}

/// Fails unless `value` is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::invalid(name, value, "must be finite"))
    }
}
