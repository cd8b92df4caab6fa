//! Instrument contract specifications.

/// Default number of decimal places used to display prices.
pub const DEFAULT_PRICE_DIGITS: usize = 2;

/// Contract specification for one tradable symbol.
///
/// `tick_value` is the monetary value, in `quote_currency`, of a one-tick move
/// on a 1.0 lot position. It is never divided by `tick_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSpec {
    pub contract_size: f64,
    pub tick_size: f64,
    pub tick_value: f64,
    pub quote_currency: String,
    /// Decimal places used to display and step prices.
    pub price_digits: usize,
    /// Factor applied to feed prices before they are used as a reference price.
    pub price_multiplier: f64,
    /// Name of this instrument in the quote feed, if it differs from the symbol.
    pub feed_ticker: Option<String>,
}

impl InstrumentSpec {
    pub fn new(contract_size: f64, tick_size: f64, tick_value: f64, quote_currency: &str) -> Self {
        Self {
            contract_size,
            tick_size,
            tick_value,
            quote_currency: quote_currency.to_uppercase(),
            price_digits: DEFAULT_PRICE_DIGITS,
            price_multiplier: 1.0,
            feed_ticker: None,
        }
    }

    pub fn with_price_digits(mut self, digits: usize) -> Self {
        self.price_digits = digits;
        self
    }

    pub fn with_price_multiplier(mut self, multiplier: f64) -> Self {
        self.price_multiplier = multiplier;
        self
    }

    pub fn with_feed_ticker(mut self, ticker: &str) -> Self {
        self.feed_ticker = Some(ticker.to_string());
        self
    }

    pub fn format_price(&self, price: f64) -> String {
        format!("{:.*}", self.price_digits, price)
    }

    /// Feed symbol to query for this instrument, falling back to `symbol`.
    pub fn feed_symbol<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.feed_ticker.as_deref().unwrap_or(symbol)
    }

    pub fn is_quoted_in(&self, currency: &str) -> bool {
        self.quote_currency.eq_ignore_ascii_case(currency)
    }
}

/// Three ASCII letters, e.g. `USD`.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}
