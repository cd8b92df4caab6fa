//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_quote_adapter::CsvQuoteAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::conversion::{
    ConversionRate, DEFAULT_ACCOUNT_CURRENCY, FALLBACK_RATE, reference_price,
    resolve_conversion_rate,
};
use crate::domain::error::SentinelError;
use crate::domain::instrument::InstrumentSpec;
use crate::domain::instrument_table::InstrumentTable;
use crate::domain::risk_policy::RiskPolicy;
use crate::domain::sizing::{LotCalculation, TradeRequest, compute_lot};
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(name = "sentinel", about = "Risk-based position sizing for CFD and forex trades")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the lot size for a trade
    Lot(LotArgs),
    /// List the instrument table
    Symbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LotArgs {
    #[arg(short, long)]
    pub symbol: String,
    /// Account balance; defaults to [account] balance
    #[arg(short, long, allow_hyphen_values = true)]
    pub balance: Option<f64>,
    /// Entry price; defaults to the reference price from --quotes
    #[arg(short, long, allow_hyphen_values = true)]
    pub entry: Option<f64>,
    /// Stop-loss price; defaults to the reference price from --quotes
    #[arg(long, allow_hyphen_values = true)]
    pub stop: Option<f64>,
    /// Use the reduced risk percentage after a losing streak
    #[arg(long)]
    pub losing_streak: bool,
    /// Risk percentage override, ignoring the risk policy
    #[arg(long)]
    pub risk: Option<f64>,
    /// Quote → account currency rate override
    #[arg(long)]
    pub rate: Option<f64>,
    /// Quote snapshot CSV (symbol,timestamp,price)
    #[arg(short, long)]
    pub quotes: Option<PathBuf>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Everything resolved for one sizing run, ready to print.
#[derive(Debug, Clone)]
pub struct TradePlan {
    pub request: TradeRequest,
    pub spec: InstrumentSpec,
    pub rate: ConversionRate,
    pub reference_price: Option<f64>,
    pub calculation: LotCalculation,
}

pub fn run(cli: Cli) -> ExitCode {
    if let Err(e) = telemetry::init_logging(&cli.log_level) {
        eprintln!("warning: {e}");
    }

    match cli.command {
        Command::Lot(args) => run_lot(&args),
        Command::Symbols { config } => run_symbols(config.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SentinelError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    path.map(load_config).transpose()
}

fn run_lot(args: &LotArgs) -> ExitCode {
    let config = match load_optional_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let quotes = match args.quotes.as_ref().map(CsvQuoteAdapter::from_file).transpose() {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let plan = match plan_trade(
        args,
        config.as_ref().map(|c| c as &dyn ConfigPort),
        quotes.as_ref().map(|q| q as &dyn QuotePort),
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if plan.rate.is_fallback() {
        eprintln!(
            "warning: no {}->{} rate available, using {:.1}; risk for this trade may be misstated",
            plan.rate.from, plan.rate.to, FALLBACK_RATE
        );
    }
    if plan.calculation.is_degenerate() {
        eprintln!("warning: entry equals stop, no stop distance defined");
    }

    print!("{}", render_plan(&plan));
    ExitCode::SUCCESS
}

/// Resolve the instrument, balance, risk, prices and rate, then size the trade.
pub fn plan_trade(
    args: &LotArgs,
    config: Option<&dyn ConfigPort>,
    quotes: Option<&dyn QuotePort>,
) -> Result<TradePlan, SentinelError> {
    let table = match config {
        Some(c) => InstrumentTable::from_config_or_builtin(c)?,
        None => InstrumentTable::builtin(),
    };
    let policy = match config {
        Some(c) => RiskPolicy::from_config(c)?,
        None => RiskPolicy::default(),
    };
    let account_currency = resolve_account_currency(config);

    let symbol = args.symbol.trim().to_uppercase();
    let spec = table.require(&symbol)?.clone();

    let balance = match args.balance {
        Some(b) => b,
        None => resolve_balance(config)?,
    };
    let risk_percent = args
        .risk
        .unwrap_or_else(|| policy.effective_percent(args.losing_streak));

    let reference = quotes.and_then(|q| reference_price(&spec, &symbol, q));
    let entry_price = args
        .entry
        .or(reference)
        .ok_or_else(|| SentinelError::MissingInput("entry price".into()))?;
    let stop_price = args
        .stop
        .or(reference)
        .ok_or_else(|| SentinelError::MissingInput("stop price".into()))?;

    let rate = match args.rate {
        Some(r) => ConversionRate::manual(&spec, &account_currency, r)?,
        None => resolve_conversion_rate(&spec, &account_currency, quotes),
    };

    let request = TradeRequest {
        symbol,
        balance,
        entry_price,
        stop_price,
        risk_percent,
        conversion_rate: rate.rate,
    };
    let calculation = compute_lot(
        &spec,
        request.balance,
        request.risk_percent,
        request.entry_price,
        request.stop_price,
        request.conversion_rate,
    )?;

    tracing::info!(
        symbol = %request.symbol,
        lot = calculation.lot,
        rate_source = %rate.source,
        "sized trade"
    );

    Ok(TradePlan {
        request,
        spec,
        rate,
        reference_price: reference,
        calculation,
    })
}

pub fn resolve_balance(config: Option<&dyn ConfigPort>) -> Result<f64, SentinelError> {
    let raw = config
        .and_then(|c| c.get_string("account", "balance"))
        .ok_or_else(|| SentinelError::ConfigMissing {
            section: "account".into(),
            key: "balance".into(),
        })?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| SentinelError::ConfigInvalid {
            section: "account".into(),
            key: "balance".into(),
            reason: format!("'{}' is not a number", raw.trim()),
        })
}

pub fn resolve_account_currency(config: Option<&dyn ConfigPort>) -> String {
    config
        .and_then(|c| c.get_string("account", "currency"))
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_ACCOUNT_CURRENCY.to_string())
}

pub fn render_plan(plan: &TradePlan) -> String {
    let spec = &plan.spec;
    let calc = &plan.calculation;
    let mut out = String::new();

    let _ = writeln!(out, "Symbol:        {}", plan.request.symbol);
    if let Some(price) = plan.reference_price {
        let _ = writeln!(out, "Reference:     {}", spec.format_price(price));
    }
    let _ = writeln!(out, "Entry:         {}", spec.format_price(plan.request.entry_price));
    let _ = writeln!(out, "Stop:          {}", spec.format_price(plan.request.stop_price));
    let _ = writeln!(
        out,
        "Risk:          {:.2}% = {:.2} {}",
        plan.request.risk_percent, calc.risk_budget, plan.rate.to
    );
    let _ = writeln!(out, "Distance:      {:.1} ticks", calc.stop_distance_ticks);
    let _ = writeln!(
        out,
        "Rate:          {:.4} {}->{} ({})",
        plan.rate.rate, plan.rate.from, plan.rate.to, plan.rate.source
    );
    if calc.is_degenerate() {
        let _ = writeln!(out, "Lot:           {:.2} (no stop distance)", calc.lot);
    } else {
        let _ = writeln!(out, "Lot:           {:.2}", calc.lot);
    }
    out
}

fn run_symbols(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let table = match config.as_ref() {
        Some(c) => match InstrumentTable::from_config_or_builtin(c) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => InstrumentTable::builtin(),
    };

    print!("{}", render_table(&table));
    eprintln!("{} symbols", table.len());
    ExitCode::SUCCESS
}

pub fn render_table(table: &InstrumentTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>10} {:<4} {:>6}  {}",
        "SYMBOL", "CONTRACT", "TICK", "TICK_VAL", "CCY", "DIGITS", "FEED"
    );
    for (symbol, spec) in table.iter() {
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>10} {:>10} {:<4} {:>6}  {}",
            symbol,
            spec.contract_size,
            spec.tick_size,
            spec.tick_value,
            spec.quote_currency,
            spec.price_digits,
            spec.feed_symbol(symbol)
        );
    }
    out
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let table = match InstrumentTable::from_config_or_builtin(&adapter) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let policy = match RiskPolicy::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  account currency: {}", resolve_account_currency(Some(&adapter as &dyn ConfigPort)));
    eprintln!(
        "  risk: {:.2}% nominal, {:.2}% after losing streak",
        policy.nominal_percent, policy.reduced_percent
    );
    eprintln!("  instruments: {}", table.symbols().collect::<Vec<_>>().join(", "));
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
