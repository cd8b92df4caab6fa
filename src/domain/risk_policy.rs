//! Per-trade risk percentage policy.
//!
//! A trader risks `nominal_percent` of the balance per trade and drops to
//! `reduced_percent` while flagged as being on a losing streak (three stop-outs
//! in a row under the FTMO playbook). The flag is supplied per calculation and
//! never stored.

use crate::domain::error::SentinelError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_NOMINAL_PERCENT: f64 = 1.0;
pub const DEFAULT_REDUCED_PERCENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPolicy {
    pub nominal_percent: f64,
    pub reduced_percent: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            nominal_percent: DEFAULT_NOMINAL_PERCENT,
            reduced_percent: DEFAULT_REDUCED_PERCENT,
        }
    }
}

impl RiskPolicy {
    pub fn new(nominal_percent: f64, reduced_percent: f64) -> Result<Self, SentinelError> {
        let policy = Self {
            nominal_percent,
            reduced_percent,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Read `[risk] nominal_percent` and `[risk] reduced_percent`, defaulting to 1.0 / 0.5.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SentinelError> {
        Self::new(
            config.get_double("risk", "nominal_percent", DEFAULT_NOMINAL_PERCENT),
            config.get_double("risk", "reduced_percent", DEFAULT_REDUCED_PERCENT),
        )
    }

    pub fn effective_percent(&self, losing_streak: bool) -> f64 {
        if losing_streak {
            self.reduced_percent
        } else {
            self.nominal_percent
        }
    }

    fn validate(&self) -> Result<(), SentinelError> {
        for (key, value) in [
            ("nominal_percent", self.nominal_percent),
            ("reduced_percent", self.reduced_percent),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(SentinelError::ConfigInvalid {
                    section: "risk".to_string(),
                    key: key.to_string(),
                    reason: format!("{key} must be between 0 and 100"),
                });
            }
        }
        if self.reduced_percent > self.nominal_percent {
            return Err(SentinelError::ConfigInvalid {
                section: "risk".to_string(),
                key: "reduced_percent".to_string(),
                reason: "reduced_percent must not exceed nominal_percent".to_string(),
            });
        }
        Ok(())
    }
}
