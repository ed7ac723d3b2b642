use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, GlobalArgs};
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::ProgressBar;
use std::time::Duration;
use tickerboard_client::{
    config::timeout_from_secs,
    prelude::*,
    render::{self, DEFAULT_CHART_HEIGHT, DEFAULT_WIDTH},
    state::BUSY_LABEL,
    ui,
};
use tokio::time::MissedTickBehavior;

mod cli;

fn preprocess(level: log::LevelFilter) {
    // grant access to .env
    dotenv::dotenv().ok();

    // initialise logger; RUST_LOG, when set, wins over --log-level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Everything derived from the environment and the global flags.
struct Settings {
    config: Config,
    fetch: FetchOptions,
    render: RenderOptions,
}

fn settings(opts: &GlobalArgs) -> Result<Settings> {
    let mut config = Config::from_env()?;
    if let Some(endpoint) = &opts.endpoint {
        config.set_endpoint(endpoint)?;
    }
    if let Some(concurrency) = opts.concurrency {
        config.concurrency = concurrency.max(1);
    }
    if let Some(secs) = opts.timeout {
        config.timeout = timeout_from_secs(secs);
    }

    let fetch = FetchOptions {
        concurrency: config.concurrency,
        closes: if opts.keep_zero_closes {
            CloseFilter::DropMissing
        } else {
            CloseFilter::DropFalsy
        },
    };

    let render = RenderOptions {
        width: opts.width.unwrap_or_else(terminal_width),
        chart_height: opts.chart_height.unwrap_or(DEFAULT_CHART_HEIGHT),
        color: !opts.no_color,
    };

    Ok(Settings {
        config,
        fetch,
        render,
    })
}

fn terminal_width() -> usize {
    dotenv::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse().ok())
        .unwrap_or(DEFAULT_WIDTH)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    preprocess(cli.opts.log_level.into());
    log::trace!("Command line input recorded: {cli:#?}");

    let settings = settings(&cli.opts)?;
    log::debug!("Configuration: {:#?}", settings.config);

    // cli framework:
    // "> tickerboard [COMMAND]"
    match cli.command {
        // "> tickerboard show [TICKERS] [--json]"
        // one refresh, then print
        Some(Commands::Show { tickers, json }) => {
            let raw = tickers.unwrap_or_else(|| settings.config.tickers.clone());
            show(&settings, &raw, json).await?;
        }

        // "> tickerboard watch [TICKERS] --every <SECS>"
        // refresh on a timer until Ctrl-C
        Some(Commands::Watch { tickers, every }) => {
            let raw = tickers.unwrap_or_else(|| settings.config.tickers.clone());
            watch(&settings, &raw, every).await?;
        }

        // "> tickerboard [prompt [TICKERS]]"
        // interactive input panel
        Some(Commands::Prompt { tickers }) => {
            let raw = tickers.unwrap_or_else(|| settings.config.tickers.clone());
            prompt(&settings, &raw).await?;
        }
        None => {
            let raw = settings.config.tickers.clone();
            prompt(&settings, &raw).await?;
        }
    }

    Ok(())
}

async fn show(settings: &Settings, raw: &str, json: bool) -> Result<()> {
    let yahoo = YahooFinance::from_config(&settings.config)?;
    let pb = if json {
        ProgressBar::hidden()
    } else {
        ui::refresh_pb(0)
    };

    let cards = refresh(&yahoo, raw, &settings.fetch, &pb).await;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        println!("{}", render::grid(&cards, &settings.render));
    }
    Ok(())
}

async fn watch(settings: &Settings, raw: &str, every: u64) -> Result<()> {
    let yahoo = YahooFinance::from_config(&settings.config)?;
    let dashboard = Dashboard::new(yahoo, settings.fetch, raw);
    let mut view = dashboard.subscribe();
    let mut timer = tokio::time::interval(Duration::from_secs(every.max(1)));
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut shown = 0;

    loop {
        tokio::select! {
            _ = timer.tick() => {
                // a refresh still running from the last tick is left to finish
                let _ = dashboard.refresh_if_idle();
            }
            changed = view.changed() => {
                changed?;
                let vm = view.borrow_and_update().clone();
                if vm.busy || vm.generation == shown {
                    continue;
                }
                shown = vm.generation;
                if settings.render.color {
                    // clear screen, cursor home
                    print!("\x1b[2J\x1b[H");
                }
                println!("{}", render::dashboard(&vm, &settings.render));
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted; stopping watch");
                break;
            }
        }
    }
    Ok(())
}

async fn prompt(settings: &Settings, raw: &str) -> Result<()> {
    let yahoo = YahooFinance::from_config(&settings.config)?;
    let dashboard = Dashboard::new(yahoo, settings.fetch, raw);

    loop {
        let current = dashboard.view();
        let label = current.button_label();
        let input = tokio::task::spawn_blocking(move || {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Tickers (Enter: {label}, q: quit)"))
                .with_initial_text(current.input)
                .allow_empty(true)
                .interact_text()
        })
        .await??;

        if matches!(input.trim(), "q" | "quit") {
            break;
        }

        dashboard.set_input(&input);
        let pb = ui::spinner(BUSY_LABEL);
        let outcome = dashboard.refresh().await;
        pb.finish_and_clear();
        if let Err(e) = outcome {
            if !e.is_cancelled() {
                return Err(e.into());
            }
        }

        println!("{}", render::dashboard(&dashboard.view(), &settings.render));
    }
    Ok(())
}
