//! Configuration validation.
//!
//! Validates every section a sizing run reads before any calculation happens,
//! so a malformed file fails once at load time.

use crate::domain::error::SentinelError;
use crate::domain::instrument::is_currency_code;
use crate::domain::instrument_table::{InstrumentTable, has_symbol_sections};
use crate::domain::risk_policy::RiskPolicy;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SentinelError> {
    validate_account_config(config)?;
    RiskPolicy::from_config(config)?;
    if has_symbol_sections(config) {
        InstrumentTable::from_config(config)?;
    }
    Ok(())
}

pub fn validate_account_config(config: &dyn ConfigPort) -> Result<(), SentinelError> {
    validate_balance(config)?;
    validate_currency(config)?;
    Ok(())
}

fn validate_balance(config: &dyn ConfigPort) -> Result<(), SentinelError> {
    let Some(raw) = config.get_string("account", "balance") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(()),
        _ => Err(SentinelError::ConfigInvalid {
            section: "account".to_string(),
            key: "balance".to_string(),
            reason: format!("'{}' is not a number", raw.trim()),
        }),
    }
}

fn validate_currency(config: &dyn ConfigPort) -> Result<(), SentinelError> {
    match config.get_string("account", "currency") {
        Some(c) if !is_currency_code(c.trim()) => Err(SentinelError::ConfigInvalid {
            section: "account".to_string(),
            key: "currency".to_string(),
            reason: format!("'{}' is not a 3-letter currency code", c.trim()),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_config(&adapter("")).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let config = adapter(
            r#"
[account]
balance = 100000
currency = usd

[risk]
nominal_percent = 1.0
reduced_percent = 0.5

[symbol.XAUUSD]
contract_size = 100
tick_size = 0.01
tick_value = 1.0
quote_currency = USD
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn negative_balance_is_accepted() {
        // A blown account sizes with a zero budget; it is not a config error.
        let config = adapter("[account]\nbalance = -1\n");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_numeric_balance_is_rejected() {
        let err = validate_config(&adapter("[account]\nbalance = plenty\n")).unwrap_err();
        assert!(matches!(err, SentinelError::ConfigInvalid { ref key, .. } if key == "balance"));
    }

    #[test]
    fn infinite_balance_is_rejected() {
        assert!(validate_config(&adapter("[account]\nbalance = inf\n")).is_err());
    }

    #[test]
    fn zero_balance_is_accepted() {
        assert!(validate_config(&adapter("[account]\nbalance = 0\n")).is_ok());
    }

    #[test]
    fn bad_currency_is_rejected() {
        let err = validate_config(&adapter("[account]\ncurrency = dollars\n")).unwrap_err();
        assert!(matches!(err, SentinelError::ConfigInvalid { ref key, .. } if key == "currency"));
    }

    #[test]
    fn bad_risk_section_is_rejected() {
        let config = adapter("[risk]\nnominal_percent = 0.5\nreduced_percent = 2\n");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bad_symbol_section_is_rejected() {
        let config = adapter(
            "[symbol.GER40]\ncontract_size = 1\ntick_size = 0.01\ntick_value = 0\nquote_currency = EUR\n",
        );
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, SentinelError::ConfigInvalid { ref key, .. } if key == "tick_value"));
    }
}
