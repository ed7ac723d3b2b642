use crate::endp::yahoo_finance as yf;
use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_TICKERS: &str = "AAPL,MSFT,GOOGL,TSLA,NVDA";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from the environment (and `.env`) and then
/// overridden by command-line flags.
///
/// | variable                   | default                                  |
/// |----------------------------|------------------------------------------|
/// | `TICKERBOARD_ENDPOINT`     | Yahoo Finance v8 chart endpoint          |
/// | `USER_AGENT`               | a desktop browser user agent             |
/// | `TICKERBOARD_CONCURRENCY`  | number of CPUs                           |
/// | `TICKERBOARD_TIMEOUT_SECS` | `30`; `0` disables the timeout           |
/// | `TICKERBOARD_INTERVAL`     | `1d`                                     |
/// | `TICKERBOARD_RANGE`        | `3mo`                                    |
/// | `TICKERBOARD_TICKERS`      | `AAPL,MSFT,GOOGL,TSLA,NVDA`              |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: String,
    pub user_agent: String,
    pub concurrency: usize,
    pub timeout: Option<Duration>,
    pub interval: String,
    pub range: String,
    pub tickers: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: yf::ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: num_cpus::get(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            interval: yf::INTERVAL.to_string(),
            range: yf::RANGE.to_string(),
            tickers: DEFAULT_TICKERS.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Build a config from any key lookup; unset or blank keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(endpoint) = var("TICKERBOARD_ENDPOINT") {
            config.endpoint = parse_endpoint("TICKERBOARD_ENDPOINT", endpoint)?;
        }
        if let Some(user_agent) = var("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(concurrency) = var("TICKERBOARD_CONCURRENCY") {
            config.concurrency = parse_number("TICKERBOARD_CONCURRENCY", &concurrency)? as usize;
        }
        if let Some(secs) = var("TICKERBOARD_TIMEOUT_SECS") {
            config.timeout = timeout_from_secs(parse_number("TICKERBOARD_TIMEOUT_SECS", &secs)?);
        }
        if let Some(interval) = var("TICKERBOARD_INTERVAL") {
            config.interval = interval;
        }
        if let Some(range) = var("TICKERBOARD_RANGE") {
            config.range = range;
        }
        if let Some(tickers) = var("TICKERBOARD_TICKERS") {
            config.tickers = tickers;
        }

        // a pool with no slots would never finish a refresh
        if config.concurrency == 0 {
            config.concurrency = 1;
        }

        Ok(config)
    }

    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<(), ConfigError> {
        self.endpoint = parse_endpoint("--endpoint", endpoint.to_string())?;
        Ok(())
    }
}

/// `0` means no timeout.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    match secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        key,
        value: value.to_string(),
    })
}

fn parse_endpoint(key: &'static str, value: String) -> Result<String, ConfigError> {
    match reqwest::Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value.trim().to_string()),
        _ => Err(ConfigError::BadEndpoint { key, value }),
    }
}
