use crate::client_ext::ChartSource;
use crate::endp::yahoo_finance::ChartEnvelope;
use crate::error::FetchError;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Canned chart responses keyed by ticker. Unknown tickers fail with a
/// 404, the way Yahoo answers for a symbol it does not know.
#[derive(Default)]
pub(crate) struct StubSource {
    bodies: HashMap<String, serde_json::Value>,
    delays: HashMap<String, Duration>,
    gates: HashMap<String, Arc<Notify>>,
}

impl StubSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn quote(mut self, ticker: &str, price: f64, previous_close: f64, volume: u64) -> Self {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": {
                        "regularMarketPrice": price,
                        "previousClose": previous_close,
                        "regularMarketVolume": volume
                    },
                    "indicators": { "quote": [{ "close": [previous_close, null, price] }] }
                }],
                "error": null
            }
        });
        self.bodies.insert(ticker.to_string(), body);
        self
    }

    pub(crate) fn delay(mut self, ticker: &str, delay: Duration) -> Self {
        self.delays.insert(ticker.to_string(), delay);
        self
    }

    /// Hold `ticker`'s response until the returned handle is notified.
    pub(crate) fn gate(&mut self, ticker: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.insert(ticker.to_string(), notify.clone());
        notify
    }
}

impl ChartSource for StubSource {
    async fn fetch_chart(&self, ticker: &str) -> Result<ChartEnvelope, FetchError> {
        if let Some(delay) = self.delays.get(ticker) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(gate) = self.gates.get(ticker) {
            gate.notified().await;
        }
        match self.bodies.get(ticker) {
            Some(body) => Ok(serde_json::from_value(body.clone())?),
            None => Err(FetchError::Status(reqwest::StatusCode::NOT_FOUND)),
        }
    }
}
