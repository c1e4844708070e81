//! SignalBot CLI: single-cycle, dry-run and indicator commands.
//!
//! Commands:
//! - `cycle`: one live cycle: Binance candles, BtcTurk order, Telegram message
//! - `dry-run`: one cycle with paper orders and stdout messages
//! - `indicators`: print the indicator bundle for a CSV candle file
//!
//! Scheduling is external (cron, systemd timer): each invocation runs one
//! cycle and exits 0 whatever the cycle outcome.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use signalbot_core::config::BotConfig;
use signalbot_core::controller::{Controller, CycleReport};
use signalbot_core::data::{BinanceKlines, CsvCandleSource, MarketDataSource};
use signalbot_core::decision::{classify_oscillator, classify_trend};
use signalbot_core::engine::{EngineParams, IndicatorEngine};
use signalbot_core::exchange::{BtcTurkExecutor, OrderExecutor, PaperExecutor};
use signalbot_core::notify::{Notifier, StdoutNotifier, TelegramNotifier};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "signalbot",
    about = "SignalBot: Stochastic RSI market-order bot"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one live cycle: fetch candles, maybe place an order, notify.
    Cycle {
        /// Path to the bot TOML config.
        #[arg(long)]
        config: PathBuf,
    },
    /// Run one cycle with paper orders and stdout notifications.
    DryRun {
        /// Path to the bot TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Read candles from a CSV file instead of Binance.
        #[arg(long)]
        candles: Option<PathBuf>,
    },
    /// Print indicators and signals for a CSV candle file as JSON.
    Indicators {
        /// CSV file: open_time,open,high,low,close,volume,close_time.
        #[arg(long)]
        candles: PathBuf,

        /// RSI length and Stochastic RSI window.
        #[arg(long, default_value_t = 14)]
        period: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Cycle { config } => run_cycle_cmd(&config),
        Commands::DryRun { config, candles } => run_dry_run_cmd(&config, candles.as_deref()),
        Commands::Indicators { candles, period } => run_indicators_cmd(&candles, period),
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: &Path) -> Result<BotConfig> {
    let config = BotConfig::from_file(path)
        .with_context(|| format!("loading config {}", path.display()))?;
    info!(
        path = %path.display(),
        symbol = %config.market.symbol,
        fingerprint = %config.fingerprint(),
        "config loaded"
    );
    Ok(config)
}

fn run_cycle_cmd(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    let Some(exchange) = &config.btcturk else {
        bail!("live cycles need a [btcturk] section; use dry-run to trade on paper");
    };
    let executor = BtcTurkExecutor::new(
        &exchange.credentials,
        exchange.base_url.as_str(),
        config.order.client_order_id.as_str(),
    )?;

    let notifier: Box<dyn Notifier> = match &config.telegram {
        Some(settings) => Box::new(TelegramNotifier::new(settings)?),
        None => Box::new(StdoutNotifier),
    };

    let source = BinanceKlines::new(config.market.base_url.as_str(), config.market.limit)?;
    let report = run_once(&config, Box::new(executor), notifier, &source);
    print_report(&report)
}

fn run_dry_run_cmd(config_path: &Path, candles: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    let source: Box<dyn MarketDataSource> = match candles {
        Some(path) => Box::new(CsvCandleSource::new(path)),
        None => Box::new(BinanceKlines::new(
            config.market.base_url.as_str(),
            config.market.limit,
        )?),
    };

    let report = run_once(
        &config,
        Box::new(PaperExecutor::new()),
        Box::new(StdoutNotifier),
        source.as_ref(),
    );
    print_report(&report)
}

fn run_once(
    config: &BotConfig,
    executor: Box<dyn OrderExecutor>,
    notifier: Box<dyn Notifier>,
    source: &dyn MarketDataSource,
) -> CycleReport {
    info!(
        source = source.name(),
        executor = executor.name(),
        notifier = notifier.name(),
        "starting cycle"
    );
    let mut controller = Controller::new(
        config.cycle_settings(),
        &config.strategy,
        executor,
        notifier,
    );
    controller.run_cycle(source)
}

fn run_indicators_cmd(candles_path: &Path, period: usize) -> Result<()> {
    if period < 2 {
        bail!("--period must be >= 2, got {period}");
    }

    let candles = CsvCandleSource::new(candles_path)
        .fetch_candles("", "")
        .with_context(|| format!("reading candles {}", candles_path.display()))?;

    let params = EngineParams {
        period,
        ..EngineParams::default()
    };
    let evaluation = IndicatorEngine::new(&params).evaluate(&candles)?;
    let bundle = &evaluation.bundle;

    let output = serde_json::json!({
        "candles": candles.len(),
        "bundle": bundle,
        "boundary_events": evaluation.boundary_events,
        "oscillator": classify_oscillator(bundle.k, bundle.d),
        "trend": classify_trend(bundle.last_close, bundle.trend_stop),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_report(report: &CycleReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
