//! Market quote port trait.
//!
//! Implementations answer with the most recent known value; `Ok(None)` means
//! the feed has nothing for that symbol or pair.

use crate::domain::error::SentinelError;

pub trait QuotePort {
    /// Latest price for a feed symbol, e.g. `GC=F`.
    fn latest_price(&self, feed_symbol: &str) -> Result<Option<f64>, SentinelError>;

    /// Multiplier converting an amount in `from` into `to`, e.g. EUR → USD.
    fn conversion_rate(&self, from: &str, to: &str) -> Result<Option<f64>, SentinelError>;
}
