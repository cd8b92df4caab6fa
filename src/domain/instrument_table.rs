//! Immutable symbol → contract specification table.
//!
//! The table is built once, validated on construction, and only read
//! afterwards. A malformed entry is a configuration error for the whole table.

use crate::domain::error::SentinelError;
use crate::domain::instrument::{DEFAULT_PRICE_DIGITS, InstrumentSpec, is_currency_code};
use crate::ports::config_port::ConfigPort;
use std::collections::BTreeMap;

/// Prefix of config sections that describe an instrument, e.g. `[symbol.XAUUSD]`.
pub const SYMBOL_SECTION_PREFIX: &str = "symbol.";

#[derive(Debug, Clone)]
pub struct InstrumentTable {
    specs: BTreeMap<String, InstrumentSpec>,
}

impl InstrumentTable {
    /// Build a table from explicit entries, rejecting any malformed spec.
    pub fn new<I>(entries: I) -> Result<Self, SentinelError>
    where
        I: IntoIterator<Item = (String, InstrumentSpec)>,
    {
        let mut specs = BTreeMap::new();
        for (symbol, spec) in entries {
            let symbol = symbol.trim().to_uppercase();
            validate_spec(&symbol, &spec)?;
            specs.insert(symbol, spec);
        }
        if specs.is_empty() {
            return Err(SentinelError::ConfigInvalid {
                section: format!("{SYMBOL_SECTION_PREFIX}*"),
                key: "symbol".to_string(),
                reason: "instrument table is empty".to_string(),
            });
        }
        Ok(Self { specs })
    }

    /// FTMO contract specifications for the default symbol set.
    pub fn builtin() -> Self {
        let entries = [
            (
                "XAUUSD",
                InstrumentSpec::new(100.0, 0.01, 1.00, "USD").with_feed_ticker("GC=F"),
            ),
            (
                "XAGUSD",
                InstrumentSpec::new(5000.0, 0.001, 5.00, "USD")
                    .with_price_digits(3)
                    .with_feed_ticker("SI=F"),
            ),
            (
                // The copper future is quoted in dollars per pound, the CFD in cents.
                "XCUUSD",
                InstrumentSpec::new(100.0, 0.01, 1.00, "USD")
                    .with_price_multiplier(100.0)
                    .with_feed_ticker("HG=F"),
            ),
            (
                "EURUSD",
                InstrumentSpec::new(100_000.0, 0.00001, 1.00, "USD")
                    .with_price_digits(5)
                    .with_feed_ticker("EURUSD=X"),
            ),
            (
                "US100",
                InstrumentSpec::new(1.0, 0.01, 0.01, "USD").with_feed_ticker("NQ=F"),
            ),
            (
                "US500",
                InstrumentSpec::new(1.0, 0.01, 0.01, "USD").with_feed_ticker("ES=F"),
            ),
            (
                "GER40",
                InstrumentSpec::new(1.0, 0.01, 0.01, "EUR").with_feed_ticker("^GDAXI"),
            ),
            (
                "AUS200",
                InstrumentSpec::new(1.0, 1.0, 1.00, "AUD").with_feed_ticker("^AXJO"),
            ),
            (
                "DXY",
                InstrumentSpec::new(100.0, 0.001, 0.10, "USD")
                    .with_price_digits(3)
                    .with_feed_ticker("DX-Y.NYB"),
            ),
            (
                "JP225",
                InstrumentSpec::new(10.0, 1.0, 10.0, "JPY").with_feed_ticker("^N225"),
            ),
        ];

        Self {
            specs: entries
                .into_iter()
                .map(|(symbol, spec)| (symbol.to_string(), spec))
                .collect(),
        }
    }

    /// Load every `[symbol.*]` section from `config`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SentinelError> {
        let mut entries = Vec::new();
        for section in config.sections() {
            let Some(symbol) = section.strip_prefix(SYMBOL_SECTION_PREFIX) else {
                continue;
            };
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                return Err(SentinelError::ConfigInvalid {
                    section,
                    key: "symbol".to_string(),
                    reason: "symbol section needs a name".to_string(),
                });
            }
            let spec = spec_from_config(config, &symbol)?;
            entries.push((symbol, spec));
        }
        let table = Self::new(entries)?;
        tracing::info!(symbols = table.len(), "loaded instrument table from config");
        Ok(table)
    }

    /// Load from `config` when it defines any `[symbol.*]` section, otherwise
    /// use the built-in table.
    pub fn from_config_or_builtin(config: &dyn ConfigPort) -> Result<Self, SentinelError> {
        if has_symbol_sections(config) {
            Self::from_config(config)
        } else {
            tracing::debug!("no symbol sections in config, using built-in instrument table");
            Ok(Self::builtin())
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentSpec> {
        self.specs.get(&symbol.trim().to_uppercase())
    }

    pub fn require(&self, symbol: &str) -> Result<&InstrumentSpec, SentinelError> {
        self.get(symbol)
            .ok_or_else(|| SentinelError::UnknownSymbol(symbol.trim().to_uppercase()))
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstrumentSpec)> {
        self.specs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

pub fn has_symbol_sections(config: &dyn ConfigPort) -> bool {
    config
        .sections()
        .iter()
        .any(|s| s.starts_with(SYMBOL_SECTION_PREFIX))
}

/// Check the invariants every spec must satisfy before it can be used for sizing.
pub fn validate_spec(symbol: &str, spec: &InstrumentSpec) -> Result<(), SentinelError> {
    let section = format!("{SYMBOL_SECTION_PREFIX}{symbol}");
    let positive = [
        ("contract_size", spec.contract_size),
        ("tick_size", spec.tick_size),
        ("tick_value", spec.tick_value),
        ("price_multiplier", spec.price_multiplier),
    ];
    for (key, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(SentinelError::ConfigInvalid {
                section,
                key: key.to_string(),
                reason: format!("{key} must be positive"),
            });
        }
    }
    if !is_currency_code(&spec.quote_currency) {
        return Err(SentinelError::ConfigInvalid {
            section,
            key: "quote_currency".to_string(),
            reason: format!("'{}' is not a 3-letter currency code", spec.quote_currency),
        });
    }
    Ok(())
}

fn spec_from_config(config: &dyn ConfigPort, symbol: &str) -> Result<InstrumentSpec, SentinelError> {
    let section = format!("{SYMBOL_SECTION_PREFIX}{symbol}");

    let contract_size = required_number(config, &section, "contract_size")?;
    let tick_size = required_number(config, &section, "tick_size")?;
    let tick_value = required_number(config, &section, "tick_value")?;
    let quote_currency = config
        .get_string(&section, "quote_currency")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| SentinelError::ConfigMissing {
            section: section.clone(),
            key: "quote_currency".to_string(),
        })?;

    let digits = config.get_int(&section, "price_digits", DEFAULT_PRICE_DIGITS as i64);
    if !(0..=10).contains(&digits) {
        return Err(SentinelError::ConfigInvalid {
            section,
            key: "price_digits".to_string(),
            reason: "price_digits must be between 0 and 10".to_string(),
        });
    }

    let mut spec = InstrumentSpec::new(contract_size, tick_size, tick_value, &quote_currency)
        .with_price_digits(digits as usize)
        .with_price_multiplier(config.get_double(&section, "price_multiplier", 1.0));
    if let Some(ticker) = config
        .get_string(&section, "feed_ticker")
        .filter(|t| !t.trim().is_empty())
    {
        spec = spec.with_feed_ticker(ticker.trim());
    }
    Ok(spec)
}

fn required_number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, SentinelError> {
    let raw = config
        .get_string(section, key)
        .ok_or_else(|| SentinelError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| SentinelError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not a number", raw.trim()),
        })
}
