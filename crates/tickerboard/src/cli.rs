use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub opts: GlobalArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the tickers once and print the card grid.
    Show {
        /// Comma-separated ticker list, e.g. "AAPL,MSFT".
        tickers: Option<String>,

        /// Print the records as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Refresh on a timer until interrupted.
    Watch {
        /// Comma-separated ticker list, e.g. "AAPL,MSFT".
        tickers: Option<String>,

        /// Seconds between refreshes.
        #[arg(long, default_value_t = 60)]
        every: u64,
    },

    /// Edit the ticker list interactively; Enter refreshes. (default)
    Prompt {
        /// Initial ticker list.
        tickers: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Sets the level of logging
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LogLevel,

    /// Requests in flight at once; 1 fetches tickers one after another.
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Chart endpoint, without the ticker.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Terminal width to lay the grid out in.
    #[arg(long, global = true)]
    pub width: Option<usize>,

    /// Plot rows per chart.
    #[arg(long, global = true)]
    pub chart_height: Option<usize>,

    /// Disable colours.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Keep zero closing prices on the chart (only nulls are dropped).
    #[arg(long, global = true)]
    pub keep_zero_closes: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
