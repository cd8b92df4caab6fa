//! Conversion-rate and reference-price resolution.
//!
//! The sizing formula never talks to a feed. Callers resolve the conversion
//! rate here first; when the feed cannot supply one the rate falls back to
//! `1.0`, which misstates risk for instruments not quoted in the account
//! currency. The fallback is tagged on the result so callers can warn.

use std::fmt;

use crate::domain::error::SizingError;
use crate::domain::instrument::InstrumentSpec;
use crate::ports::quote_port::QuotePort;

/// Rate used when no live conversion rate is available.
pub const FALLBACK_RATE: f64 = 1.0;

/// Default account currency.
pub const DEFAULT_ACCOUNT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Quote currency is the account currency.
    Identity,
    /// Supplied by the quote feed.
    Live,
    /// Given explicitly by the caller.
    Manual,
    /// Feed had no usable rate; `FALLBACK_RATE` was substituted.
    Fallback,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RateSource::Identity => "identity",
            RateSource::Live => "live",
            RateSource::Manual => "manual",
            RateSource::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub source: RateSource,
}

impl ConversionRate {
    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }

    /// A caller-supplied rate. Must be positive and finite.
    pub fn manual(spec: &InstrumentSpec, account_currency: &str, rate: f64) -> Result<Self, SizingError> {
        if !(rate > 0.0) || !rate.is_finite() {
            return Err(SizingError::InvalidConversionRate(rate));
        }
        Ok(Self {
            from: spec.quote_currency.clone(),
            to: account_currency.to_uppercase(),
            rate,
            source: RateSource::Manual,
        })
    }

    fn with_source(spec: &InstrumentSpec, account_currency: &str, rate: f64, source: RateSource) -> Self {
        Self {
            from: spec.quote_currency.clone(),
            to: account_currency.to_uppercase(),
            rate,
            source,
        }
    }
}

/// Resolve the quote → account currency rate for `spec`.
///
/// `quotes` may be `None` when no feed is configured, which counts as the
/// rate being unavailable.
pub fn resolve_conversion_rate(
    spec: &InstrumentSpec,
    account_currency: &str,
    quotes: Option<&dyn QuotePort>,
) -> ConversionRate {
    if spec.is_quoted_in(account_currency) {
        return ConversionRate::with_source(spec, account_currency, 1.0, RateSource::Identity);
    }

    let looked_up = match quotes {
        Some(port) => match port.conversion_rate(&spec.quote_currency, account_currency) {
            Ok(rate) => rate,
            Err(e) => {
                tracing::warn!(error = %e, "conversion rate lookup failed");
                None
            }
        },
        None => None,
    };

    match looked_up {
        Some(rate) if rate > 0.0 && rate.is_finite() => {
            ConversionRate::with_source(spec, account_currency, rate, RateSource::Live)
        }
        other => {
            tracing::warn!(
                from = %spec.quote_currency,
                to = %account_currency,
                received = ?other,
                fallback = FALLBACK_RATE,
                "conversion rate unavailable, using fallback"
            );
            ConversionRate::with_source(spec, account_currency, FALLBACK_RATE, RateSource::Fallback)
        }
    }
}

/// Current feed price for `symbol`, scaled by the spec's `price_multiplier`.
///
/// Only used to pre-fill entry and stop prices. Feed errors and non-positive
/// prices yield `None`.
pub fn reference_price(spec: &InstrumentSpec, symbol: &str, quotes: &dyn QuotePort) -> Option<f64> {
    let feed_symbol = spec.feed_symbol(symbol);
    match quotes.latest_price(feed_symbol) {
        Ok(Some(price)) if price > 0.0 && price.is_finite() => Some(price * spec.price_multiplier),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(feed_symbol, error = %e, "reference price lookup failed");
            None
        }
    }
}
