use crate::config::Config;
use crate::endp::yahoo_finance::{self as yf, ChartEnvelope};
use crate::error::FetchError;
pub use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Anything that can produce a chart envelope for a ticker.
///
/// [`YahooFinance`] is the real implementation; the fetch sequence and the
/// dashboard are generic over this trait so they can run against canned
/// responses.
pub trait ChartSource: Send + Sync {
    fn fetch_chart(
        &self,
        ticker: &str,
    ) -> impl Future<Output = Result<ChartEnvelope, FetchError>> + Send;
}

/// Add-on method for [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
pub trait ClientChartExt {
    fn get_chart(&self, url: reqwest::Url) -> impl Future<Output = Result<ChartEnvelope, FetchError>> + Send;
}

impl ClientChartExt for Client {
    /// GET a chart url and decode the body, failing on any non-2xx status.
    async fn get_chart(&self, url: reqwest::Url) -> Result<ChartEnvelope, FetchError> {
        let response = self.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("{url} answered {status}");
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport(e)
            }
        })?;

        log::trace!("Deserializing {} bytes from {url}", body.len());
        let envelope = serde_json::from_slice::<ChartEnvelope>(&body)?;
        Ok(envelope)
    }
}

/// Build the http client every request goes through.
pub fn build_client(user_agent: &str, timeout: Option<Duration>) -> Result<Client, FetchError> {
    let mut builder = reqwest::ClientBuilder::new().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// The Yahoo Finance chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooFinance {
    client: Client,
    endpoint: String,
    interval: String,
    range: String,
}

impl YahooFinance {
    pub fn new(client: Client, endpoint: &str, interval: &str, range: &str) -> Self {
        YahooFinance {
            client,
            endpoint: endpoint.to_string(),
            interval: interval.to_string(),
            range: range.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self::new(client, &config.endpoint, &config.interval, &config.range))
    }
}

impl ChartSource for YahooFinance {
    async fn fetch_chart(&self, ticker: &str) -> Result<ChartEnvelope, FetchError> {
        let url = yf::chart_url(&self.endpoint, ticker, &self.interval, &self.range)?;
        log::trace!("Fetching chart data for [{ticker}] from {url}");
        self.client.get_chart(url).await
    }
}
