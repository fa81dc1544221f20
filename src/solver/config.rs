//! Configuration shared by the marching passes.

use super::SolverError;

/// Guard value added to pressures and energies to keep divisions finite.
pub const SOLVCON_TINY: f64 = 1.0e-60;

/// How the passes react to non-finite results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FloatingPointMode {
    /// NaN and infinity flow into the outputs unchecked.
    #[default]
    Propagate,
    /// Every pass scans its outputs and fails with
    /// [`SolverError::NumericalFault`] at the lowest offending cell.
    Trap,
}

/// Per-stage parameters of the explicit march.
///
/// # Example
///
/// ```
/// use cese_rs::{CeseConfig, FloatingPointMode};
///
/// let config = CeseConfig::new(1e-3).with_fp_mode(FloatingPointMode::Trap);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.half_dt(), 5e-4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CeseConfig {
    /// Full time increment of the current stage.
    pub time_increment: f64,
    /// Pressure/energy guard value.
    pub tiny: f64,
    /// Floating-point fault handling.
    pub fp_mode: FloatingPointMode,
}

impl Default for CeseConfig {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl CeseConfig {
    /// Create a configuration with the given time increment.
    pub fn new(time_increment: f64) -> Self {
        Self {
            time_increment,
            tiny: SOLVCON_TINY,
            fp_mode: FloatingPointMode::Propagate,
        }
    }

    /// Set the time increment.
    pub fn with_time_increment(mut self, time_increment: f64) -> Self {
        self.time_increment = time_increment;
        self
    }

    /// Set the guard value.
    pub fn with_tiny(mut self, tiny: f64) -> Self {
        self.tiny = tiny;
        self
    }

    /// Set the floating-point mode.
    pub fn with_fp_mode(mut self, fp_mode: FloatingPointMode) -> Self {
        self.fp_mode = fp_mode;
        self
    }

    /// `time_increment / 2`.
    #[inline]
    pub fn half_dt(&self) -> f64 {
        self.time_increment * 0.5
    }

    /// `time_increment / 4`.
    #[inline]
    pub fn quarter_dt(&self) -> f64 {
        self.time_increment * 0.25
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.time_increment.is_finite() || self.time_increment < 0.0 {
            return Err(SolverError::invalid_config(format!(
                "time increment must be finite and non-negative, got {}",
                self.time_increment
            )));
        }
        if !self.tiny.is_finite() || self.tiny <= 0.0 {
            return Err(SolverError::invalid_config(format!(
                "tiny must be finite and positive, got {}",
                self.tiny
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let c = CeseConfig::new(0.1).with_tiny(1e-30).with_time_increment(0.2);
        assert_eq!(c.time_increment, 0.2);
        assert_eq!(c.tiny, 1e-30);
        assert_eq!(c.fp_mode, FloatingPointMode::Propagate);
        assert_eq!(c.quarter_dt(), 0.05);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(CeseConfig::new(-1.0).validate().is_err());
        assert!(CeseConfig::new(f64::NAN).validate().is_err());
        assert!(CeseConfig::new(1.0).with_tiny(0.0).validate().is_err());
        assert!(CeseConfig::new(0.0).validate().is_ok());
    }
}
