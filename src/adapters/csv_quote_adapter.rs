//! CSV quote snapshot adapter.
//!
//! Reads a `symbol,timestamp,price` file and keeps the most recent price per
//! symbol. Conversion rates are looked up as currency-pair symbols
//! (`EURUSD=X`, then `EURUSD`), falling back to the inverse pair.

use crate::domain::error::SentinelError;
use crate::ports::quote_port::QuotePort;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
struct Quote {
    at: NaiveDateTime,
    price: f64,
}

pub struct CsvQuoteAdapter {
    quotes: HashMap<String, Quote>,
}

impl CsvQuoteAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SentinelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SentinelError::Quote {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let adapter = Self::from_csv(&content)?;
        tracing::info!(
            path = %path.display(),
            symbols = adapter.quotes.len(),
            "loaded quote snapshot"
        );
        Ok(adapter)
    }

    pub fn from_csv(content: &str) -> Result<Self, SentinelError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut quotes: HashMap<String, Quote> = HashMap::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SentinelError::Quote {
                reason: format!("CSV parse error: {}", e),
            })?;

            let symbol = record
                .get(0)
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| SentinelError::Quote {
                    reason: "missing symbol column".into(),
                })?;

            let at = record
                .get(1)
                .ok_or_else(|| SentinelError::Quote {
                    reason: "missing timestamp column".into(),
                })
                .and_then(parse_timestamp)?;

            let price: f64 = record
                .get(2)
                .ok_or_else(|| SentinelError::Quote {
                    reason: "missing price column".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| SentinelError::Quote {
                    reason: format!("invalid price value: {}", e),
                })?;

            let quote = Quote { at, price };
            match quotes.get(&symbol) {
                Some(existing) if existing.at > quote.at => {}
                _ => {
                    quotes.insert(symbol, quote);
                }
            }
        }

        Ok(Self { quotes })
    }

    fn price(&self, symbol: &str) -> Option<f64> {
        self.quotes.get(&symbol.trim().to_uppercase()).map(|q| q.price)
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, SentinelError> {
    let raw = raw.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| SentinelError::Quote {
            reason: format!("invalid timestamp format: {}", raw),
        })
}

impl QuotePort for CsvQuoteAdapter {
    fn latest_price(&self, feed_symbol: &str) -> Result<Option<f64>, SentinelError> {
        Ok(self.price(feed_symbol))
    }

    fn conversion_rate(&self, from: &str, to: &str) -> Result<Option<f64>, SentinelError> {
        let (from, to) = (from.to_uppercase(), to.to_uppercase());
        if from == to {
            return Ok(Some(1.0));
        }

        let direct = self
            .price(&format!("{from}{to}=X"))
            .or_else(|| self.price(&format!("{from}{to}")));
        if direct.is_some() {
            return Ok(direct);
        }

        let inverse = self
            .price(&format!("{to}{from}=X"))
            .or_else(|| self.price(&format!("{to}{from}")));
        Ok(inverse.filter(|p| *p > 0.0).map(|p| 1.0 / p))
    }
}
