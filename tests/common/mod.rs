#![allow(dead_code)]

use sentinel::domain::error::SentinelError;
use sentinel::domain::instrument::InstrumentSpec;
use sentinel::ports::quote_port::QuotePort;
use std::collections::HashMap;
use std::io::Write;

pub struct MockQuotePort {
    pub prices: HashMap<String, f64>,
    pub rates: HashMap<(String, String), f64>,
    pub error: Option<String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            rates: HashMap::new(),
            error: None,
        }
    }

    pub fn with_price(mut self, feed_symbol: &str, price: f64) -> Self {
        self.prices.insert(feed_symbol.to_string(), price);
        self
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    fn check(&self) -> Result<(), SentinelError> {
        match &self.error {
            Some(reason) => Err(SentinelError::Quote {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl QuotePort for MockQuotePort {
    fn latest_price(&self, feed_symbol: &str) -> Result<Option<f64>, SentinelError> {
        self.check()?;
        Ok(self.prices.get(feed_symbol).copied())
    }

    fn conversion_rate(&self, from: &str, to: &str) -> Result<Option<f64>, SentinelError> {
        self.check()?;
        Ok(self.rates.get(&(from.to_string(), to.to_string())).copied())
    }
}

/// XAUUSD-like: 0.01 tick worth 1.00 USD per lot.
pub fn gold_spec() -> InstrumentSpec {
    InstrumentSpec::new(100.0, 0.01, 1.00, "USD").with_feed_ticker("GC=F")
}

/// GER40-like: 0.01 tick worth 0.01 EUR per lot.
pub fn dax_spec() -> InstrumentSpec {
    InstrumentSpec::new(1.0, 0.01, 0.01, "EUR").with_feed_ticker("^GDAXI")
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const VALID_INI: &str = r#"
[account]
balance = 10000
currency = USD

[risk]
nominal_percent = 1.0
reduced_percent = 0.5
"#;
