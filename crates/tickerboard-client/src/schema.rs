use serde::{Serialize, Serializer};
use std::fmt;

/// Final output for a single ticker: everything one dashboard card shows.
/// ```text
/// {
///     "ticker": "AAPL",
///     "price": "189.84",
///     "change": "1.23",
///     "volume": "52345100",
///     "chartData": [
///         { "index": 0, "price": "181.02" },
///         { "index": 1, "price": "182.55" },
///         // ...
///     ]
/// }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockCard {
    pub ticker: String,
    pub price: Price,
    pub change: Change,
    pub volume: Volume,
    pub chart_data: Vec<ChartPoint>,
}

impl StockCard {
    /// Placeholder shown in place of a ticker whose fetch failed.
    pub fn error(ticker: &str) -> Self {
        StockCard {
            ticker: ticker.to_string(),
            price: Price::Error,
            change: Change::Unavailable,
            volume: Volume::Unavailable,
            chart_data: vec![],
        }
    }

    pub fn is_error(&self) -> bool {
        self.price == Price::Error
    }

    /// Closing prices formatted the way the card labels them.
    pub fn chart_labels(&self) -> Vec<String> {
        self.chart_data.iter().map(ToString::to_string).collect()
    }
}

/// Latest market price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Quoted(f64),
    /// The response carried no usable `regularMarketPrice`.
    Unavailable,
    /// The request for this ticker failed.
    Error,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Quoted(price) => write!(f, "{price}"),
            Price::Unavailable => f.write_str("N/A"),
            Price::Error => f.write_str("Error"),
        }
    }
}

/// Percent change against the previous close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    Percent(f64),
    Unavailable,
}

impl Change {
    /// `(price - previous_close) / previous_close * 100`, or `Unavailable`
    /// when either side is missing or the result is not finite.
    pub fn between(price: Option<f64>, previous_close: Option<f64>) -> Self {
        match (price, previous_close) {
            (Some(price), Some(previous_close)) => {
                let pct = (price - previous_close) / previous_close * 100.0;
                if pct.is_finite() {
                    Change::Percent(pct)
                } else {
                    Change::Unavailable
                }
            }
            _ => Change::Unavailable,
        }
    }

    /// Zero counts as a gain.
    pub fn is_gain(&self) -> bool {
        matches!(self, Change::Percent(pct) if *pct >= 0.0)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Percent(pct) => f.write_str(&to_fixed2(*pct)),
            Change::Unavailable => f.write_str("N/A"),
        }
    }
}

/// Latest traded volume, as whatever number the response carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volume {
    Traded(f64),
    Unavailable,
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volume::Traded(volume) => write!(f, "{volume}"),
            Volume::Unavailable => f.write_str("N/A"),
        }
    }
}

/// One closing price on the card's chart, keyed by its position in the
/// filtered series.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub index: usize,
    #[serde(rename = "price", serialize_with = "se_two_decimals")]
    pub close: f64,
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_fixed2(self.close))
    }
}

/// Two decimal places, with exact ties rounded away from zero.
///
/// `{:.2}` already rounds every other value to the nearest cent. A double
/// sits exactly on a half cent only when it is an odd number of eighths
/// (`x.125`, `x.375`, ...), and for those `{:.2}` picks the even digit.
pub fn to_fixed2(value: f64) -> String {
    let eighths = value.abs() * 8.0;
    let is_tie = eighths.fract() == 0.0 && eighths % 2.0 == 1.0 && eighths < 2f64.powi(50);
    if !is_tie {
        return format!("{value:.2}");
    }

    let cents = (value.abs() * 100.0).ceil() as u64;
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

fn se_two_decimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&to_fixed2(*value))
}

// the display strings double as the json representation
macro_rules! serialize_as_display {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_display!(Price, Change, Volume);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_renders_like_a_plain_number() {
        assert_eq!(Price::Quoted(189.84).to_string(), "189.84");
        assert_eq!(Price::Quoted(190.0).to_string(), "190");
        assert_eq!(Price::Unavailable.to_string(), "N/A");
        assert_eq!(Price::Error.to_string(), "Error");
    }

    #[test]
    fn change_is_rounded_to_two_places() {
        let change = Change::between(Some(110.0), Some(100.0));
        assert_eq!(change.to_string(), "10.00");

        let change = Change::between(Some(99.0), Some(101.0));
        assert_eq!(change.to_string(), "-1.98");
    }

    #[test]
    fn change_without_a_baseline_is_unavailable() {
        assert_eq!(Change::between(None, Some(100.0)), Change::Unavailable);
        assert_eq!(Change::between(Some(100.0), None), Change::Unavailable);
        assert_eq!(Change::between(Some(100.0), Some(0.0)), Change::Unavailable);
    }

    #[test]
    fn zero_change_counts_as_gain() {
        assert!(Change::Percent(0.0).is_gain());
        assert!(Change::Percent(0.5).is_gain());
        assert!(!Change::Percent(-0.01).is_gain());
        assert!(!Change::Unavailable.is_gain());
    }

    #[test]
    fn half_cents_round_away_from_zero() {
        assert_eq!(to_fixed2(100.125), "100.13");
        assert_eq!(to_fixed2(12.625), "12.63");
        assert_eq!(to_fixed2(0.375), "0.38");
        assert_eq!(to_fixed2(-0.125), "-0.13");
        assert_eq!(to_fixed2(-12.625), "-12.63");
    }

    #[test]
    fn values_off_the_half_cent_round_to_nearest() {
        // 101.555 is stored as 101.55500000000000682..., so it rounds up
        assert_eq!(to_fixed2(101.555), "101.56");
        // 1.005 is stored as 1.00499999999999989..., so it rounds down
        assert_eq!(to_fixed2(1.005), "1.00");
        assert_eq!(to_fixed2(100.001), "100.00");
        assert_eq!(to_fixed2(102.0), "102.00");
        assert_eq!(to_fixed2(0.25), "0.25");
        assert_eq!(to_fixed2(-1.98019801980198), "-1.98");
    }

    #[test]
    fn every_two_decimal_output_shares_the_tie_rule() {
        assert_eq!(Change::Percent(12.625).to_string(), "12.63");
        assert_eq!(ChartPoint { index: 0, close: 100.125 }.to_string(), "100.13");
        assert_eq!(
            serde_json::to_value(ChartPoint { index: 3, close: 12.625 }).unwrap(),
            json!({ "index": 3, "price": "12.63" })
        );
    }

    #[test]
    fn volume_shows_the_number_as_sent() {
        assert_eq!(Volume::Traded(52345100.0).to_string(), "52345100");
        assert_eq!(Volume::Traded(1200.5).to_string(), "1200.5");
        assert_eq!(Volume::Unavailable.to_string(), "N/A");
    }

    #[test]
    fn error_card_serializes_to_placeholder_record() {
        let card = StockCard::error("ZZZZ");
        assert!(card.is_error());
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({
                "ticker": "ZZZZ",
                "price": "Error",
                "change": "N/A",
                "volume": "N/A",
                "chartData": []
            })
        );
    }

    #[test]
    fn chart_points_serialize_with_index_and_rounded_price() {
        let card = StockCard {
            ticker: "AAPL".to_string(),
            price: Price::Quoted(101.5),
            change: Change::Percent(1.5),
            volume: Volume::Traded(1200.0),
            chart_data: vec![
                ChartPoint { index: 0, close: 100.001 },
                ChartPoint { index: 1, close: 101.555 },
            ],
        };
        // 101.555 is stored as 101.55500000000000682..., so it rounds up
        assert_eq!(card.chart_labels(), vec!["100.00", "101.56"]);
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({
                "ticker": "AAPL",
                "price": "101.5",
                "change": "1.50",
                "volume": "1200",
                "chartData": [
                    { "index": 0, "price": "100.00" },
                    { "index": 1, "price": "101.56" }
                ]
            })
        );
    }
}
