//! Risk-based lot sizing.
//!
//! The lot is chosen so that a stop-out loses at most
//! `balance × risk_percent / 100` in the account currency:
//!
//! ```text
//! ticks    = |entry − stop| / tick_size
//! raw_lot  = risk_budget / (ticks × tick_value × conversion_rate)
//! lot      = max(round(raw_lot, 2), 0.01)
//! ```
//!
//! Entry equal to stop is the one case that breaks the 0.01 floor: it yields a
//! lot of exactly `0.0` so callers can tell "no stop defined" apart from a
//! valid but tiny position.

use crate::domain::error::{SentinelError, SizingError};
use crate::domain::instrument::InstrumentSpec;
use crate::domain::instrument_table::InstrumentTable;

/// Smallest tradeable lot and the lot-step granularity.
pub const MIN_LOT: f64 = 0.01;

/// Inputs for one sizing calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRequest {
    pub symbol: String,
    pub balance: f64,
    pub entry_price: f64,
    pub stop_price: f64,
    /// Effective risk percentage after policy resolution, e.g. `1.0`.
    pub risk_percent: f64,
    /// Quote currency → account currency multiplier; `1.0` when identical.
    pub conversion_rate: f64,
}

/// Result of a sizing calculation, with the intermediates shown alongside the lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotCalculation {
    pub lot: f64,
    pub raw_lot: f64,
    pub risk_budget: f64,
    pub price_distance: f64,
    pub stop_distance_ticks: f64,
}

impl LotCalculation {
    /// True when entry and stop coincide and the lot was forced to zero.
    pub fn is_degenerate(&self) -> bool {
        self.stop_distance_ticks == 0.0
    }
}

/// Compute the lot size for a single trade.
///
/// Errors on a non-positive `tick_size`, `tick_value` or `conversion_rate`,
/// and on non-finite inputs. A zero or negative balance gives a zero risk
/// budget and therefore the minimum lot.
pub fn compute_lot(
    spec: &InstrumentSpec,
    balance: f64,
    risk_percent: f64,
    entry_price: f64,
    stop_price: f64,
    conversion_rate: f64,
) -> Result<LotCalculation, SizingError> {
    if !(spec.tick_size > 0.0) || !spec.tick_size.is_finite() {
        return Err(SizingError::InvalidTickSize(spec.tick_size));
    }
    if !(spec.tick_value > 0.0) || !spec.tick_value.is_finite() {
        return Err(SizingError::InvalidTickValue(spec.tick_value));
    }
    if !(conversion_rate > 0.0) || !conversion_rate.is_finite() {
        return Err(SizingError::InvalidConversionRate(conversion_rate));
    }
    for (field, value) in [
        ("balance", balance),
        ("risk_percent", risk_percent),
        ("entry_price", entry_price),
        ("stop_price", stop_price),
    ] {
        if !value.is_finite() {
            return Err(SizingError::NonFinite { field });
        }
    }

    let price_distance = (entry_price - stop_price).abs();
    let stop_distance_ticks = price_distance / spec.tick_size;
    let risk_budget = (balance * (risk_percent / 100.0)).max(0.0);

    if stop_distance_ticks == 0.0 {
        return Ok(LotCalculation {
            lot: 0.0,
            raw_lot: 0.0,
            risk_budget,
            price_distance,
            stop_distance_ticks,
        });
    }

    let raw_lot = risk_budget / (stop_distance_ticks * spec.tick_value * conversion_rate);
    let lot = round_lot(raw_lot).max(MIN_LOT);

    tracing::debug!(
        price_distance,
        stop_distance_ticks,
        risk_budget,
        raw_lot,
        lot,
        "computed lot size"
    );

    Ok(LotCalculation {
        lot,
        raw_lot,
        risk_budget,
        price_distance,
        stop_distance_ticks,
    })
}

/// Convenience wrapper returning only the lot.
pub fn lot_size(
    spec: &InstrumentSpec,
    balance: f64,
    risk_percent: f64,
    entry_price: f64,
    stop_price: f64,
    conversion_rate: f64,
) -> Result<f64, SizingError> {
    compute_lot(spec, balance, risk_percent, entry_price, stop_price, conversion_rate)
        .map(|calc| calc.lot)
}

/// Resolve the request's symbol against `table` and size the trade.
pub fn size_trade(
    table: &InstrumentTable,
    request: &TradeRequest,
) -> Result<LotCalculation, SentinelError> {
    let spec = table.require(&request.symbol)?;
    Ok(compute_lot(
        spec,
        request.balance,
        request.risk_percent,
        request.entry_price,
        request.stop_price,
        request.conversion_rate,
    )?)
}

/// Round to the two-decimal lot step, ties to even.
fn round_lot(lot: f64) -> f64 {
    (lot * 100.0).round_ties_even() / 100.0
}
