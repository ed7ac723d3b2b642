use crate::error::FetchError;
use crate::schema::{Change, ChartPoint, Price, StockCard, Volume};
use reqwest::Url;
use serde::Deserialize;

pub const ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const INTERVAL: &str = "1d";
pub const RANGE: &str = "3mo";

/// `{endpoint}/{ticker}?interval={interval}&range={range}`, with the ticker
/// encoded as a single path segment (`^GSPC`, `BRK B`, and the empty ticker
/// all produce valid urls).
pub fn chart_url(endpoint: &str, ticker: &str, interval: &str, range: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(endpoint).map_err(|e| FetchError::Url(format!("{endpoint}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::Url(format!("{endpoint}: cannot be a base")))?
        .pop_if_empty()
        .push(ticker);
    url.query_pairs_mut()
        .clear()
        .append_pair("interval", interval)
        .append_pair("range", range);
    Ok(url)
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Transformation
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Which closing prices survive onto the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloseFilter {
    /// Drop nulls and zeros alike; a zero close never reaches the chart.
    #[default]
    DropFalsy,
    /// Drop nulls only.
    DropMissing,
}

impl CloseFilter {
    fn keeps(self, close: f64) -> bool {
        match self {
            CloseFilter::DropFalsy => close != 0.0 && !close.is_nan(),
            CloseFilter::DropMissing => !close.is_nan(),
        }
    }

    /// Filter a raw close series and index what is left.
    pub fn apply(self, closes: &[Option<f64>]) -> Vec<ChartPoint> {
        closes
            .iter()
            .filter_map(|close| close.filter(|close| self.keeps(*close)))
            .enumerate()
            .map(|(index, close)| ChartPoint { index, close })
            .collect()
    }
}

impl ChartEnvelope {
    /// Turn a decoded response into the card for `ticker`.
    pub fn into_card(self, ticker: &str, filter: CloseFilter) -> Result<StockCard, FetchError> {
        if let Some(err) = self.chart.error {
            return Err(FetchError::Api {
                code: err.code,
                description: err.description,
            });
        }

        let base = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or(FetchError::MissingResult)?;
        let quote = base
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or(FetchError::MissingQuote)?;
        let meta = base.meta;

        // a zero price displays as none, but the change is still computed from it
        let price = match meta.regular_market_price {
            Some(price) if price != 0.0 => Price::Quoted(price),
            _ => Price::Unavailable,
        };

        Ok(StockCard {
            ticker: ticker.to_string(),
            price,
            change: Change::between(meta.regular_market_price, meta.previous_close),
            volume: meta
                .regular_market_volume
                .map_or(Volume::Unavailable, Volume::Traded),
            chart_data: filter.apply(&quote.close),
        })
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

// Input: Yahoo Finance
#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartResponse,
}

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartApiError {
    pub code: String,
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: Meta,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub regular_market_volume: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    pub quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
pub struct Quote {
    pub close: Vec<Option<f64>>,
}
