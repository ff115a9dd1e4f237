use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{BrokerSession, Config};
use engine::{BotConfig, TradeExecutor, TradingLoop};
use paper::{PaperConfig, PaperSession};
use risk::RiskManager;
use strategy::build_strategy;

#[tokio::main]
async fn main() -> ExitCode {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("OptionBot terminated: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let bot = BotConfig::load(&cfg.bot_config_path)
        .with_context(|| format!("loading {}", cfg.bot_config_path))?;

    let strategy = build_strategy(&bot.strategy).context("building strategy")?;
    let risk = RiskManager::new(&bot.risk).context("building risk manager")?;

    // ── Session ───────────────────────────────────────────────────────────────
    let session_id = match cfg.session_id.clone() {
        Some(id) => id,
        None => prompt_session_id().context("reading session id")?,
    };
    let session = Arc::new(PaperSession::new(
        &session_id,
        PaperConfig {
            start_price: cfg.paper_start_price,
            volatility: cfg.paper_volatility,
            payout_ratio: cfg.paper_payout_ratio,
            seed: cfg.paper_seed,
            ..PaperConfig::default()
        },
    ));

    info!(
        symbol = %bot.symbol,
        granularity = ?bot.granularity(),
        expiry = ?bot.expiry(),
        window = bot.window_capacity,
        "OptionBot starting"
    );
    info!(
        strategy = %strategy.name(),
        params = %strategy.describe(),
        "Strategy"
    );
    info!(
        initial_stake = bot.risk.initial_stake,
        martingale_steps = bot.risk.martingale_step_cap,
        max_stake = bot.risk.max_stake(),
        consecutive_loss_cap = bot.risk.consecutive_loss_cap,
        cooldown = bot.risk.cooldown_duration,
        "Risk"
    );

    // ── Trading loop ──────────────────────────────────────────────────────────
    let executor = TradeExecutor::new(session.clone());
    let (engine, handle) = TradingLoop::new(
        bot.symbol.clone(),
        bot.expiry(),
        bot.window_capacity,
        strategy,
        risk,
        executor,
    )?;

    let candles = session
        .open_timed_stream(&bot.symbol, bot.granularity())
        .await
        .context("opening candle stream")?;

    // Held until the loop returns: dropping every handle stops the loop.
    let interrupt = handle.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after the current candle");
                interrupt.stop();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    let summary = engine.run(candles).await?;
    anyhow::ensure!(handle.is_stopped(), "trading loop exited without a stop request");
    info!(summary = %summary, "Bot stopped by user");
    Ok(())
}

fn prompt_session_id() -> anyhow::Result<String> {
    print!("Please enter your session id: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let id = line.trim().to_string();
    anyhow::ensure!(!id.is_empty(), "session id must not be empty");
    Ok(id)
}
