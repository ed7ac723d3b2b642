use crate::client_ext::ChartSource;
use crate::endp::yahoo_finance::CloseFilter;
use crate::error::FetchError;
use crate::schema::StockCard;
use futures::{stream, Stream, StreamExt};
use indicatif::ProgressBar;
use std::ops::Deref;
use std::pin::pin;

/// Knobs shared by every refresh.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Requests in flight at once; `1` fetches strictly one after another.
    pub concurrency: usize,
    pub closes: CloseFilter,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            concurrency: num_cpus::get(),
            closes: CloseFilter::default(),
        }
    }
}

/// Split raw input on commas and trim each piece.
///
/// Nothing else is done: empty pieces stay, duplicates stay, case is kept.
pub fn parse_tickers(raw: &str) -> Vec<String> {
    raw.split(',').map(|ticker| ticker.trim().to_string()).collect()
}

/// Fetch and transform one ticker, surfacing the failure.
pub async fn try_fetch_card<S: ChartSource>(
    source: &S,
    ticker: &str,
    closes: CloseFilter,
) -> Result<StockCard, FetchError> {
    source.fetch_chart(ticker).await?.into_card(ticker, closes)
}

/// Fetch one ticker, logging how it went; a failure is logged as the
/// ticker falling back to its error card.
pub async fn fetch_logged<S: ChartSource>(
    source: &S,
    ticker: &str,
    closes: CloseFilter,
) -> Result<StockCard, FetchError> {
    let outcome = try_fetch_card(source, ticker, closes).await;
    match &outcome {
        Ok(_) => log::trace!("Chart data fetched & transformed successfully for [{ticker}]"),
        Err(e) => log::warn!("[{ticker}] falling back to an error card: {e}"),
    }
    outcome
}

/// Fetch one ticker; any failure becomes the error placeholder.
pub async fn fetch_card<S: ChartSource>(source: &S, ticker: &str, closes: CloseFilter) -> StockCard {
    fetch_logged(source, ticker, closes)
        .await
        .unwrap_or_else(|_| StockCard::error(ticker))
}

/// Fetch every ticker with at most `options.concurrency` requests in flight.
///
/// Outcomes arrive in completion order, each tagged with its position in
/// `tickers`. `source` is any cloneable handle to the source (`&S`,
/// `Arc<S>`), cloned once per ticker.
pub fn fetch_each<S, H>(
    source: H,
    tickers: Vec<String>,
    options: FetchOptions,
) -> impl Stream<Item = (usize, String, Result<StockCard, FetchError>)>
where
    S: ChartSource,
    H: Deref<Target = S> + Clone,
{
    stream::iter(tickers.into_iter().enumerate())
        .map(move |(index, ticker)| {
            let source = source.clone();
            async move {
                let outcome = fetch_logged(&*source, &ticker, options.closes).await;
                (index, ticker, outcome)
            }
        })
        .buffer_unordered(options.concurrency.max(1))
}

/// Parse `raw` and fetch every ticker, returning one card per ticker in
/// input order.
///
/// Up to `options.concurrency` requests run at once. A failed ticker never
/// stops the others.
pub async fn refresh<S: ChartSource>(
    source: &S,
    raw: &str,
    options: &FetchOptions,
    pb: &ProgressBar,
) -> Vec<StockCard> {
    let time = std::time::Instant::now();
    let tickers = parse_tickers(raw);
    pb.set_length(tickers.len() as u64);

    let mut slots: Vec<Option<StockCard>> = vec![None; tickers.len()];
    let mut results = pin!(fetch_each(source, tickers, *options));
    while let Some((index, ticker, outcome)) = results.next().await {
        slots[index] = Some(outcome.unwrap_or_else(|_| StockCard::error(&ticker)));
        pb.inc(1);
    }
    let cards: Vec<StockCard> = slots.into_iter().flatten().collect();

    log::debug!(
        "{} tickers refreshed. Elapsed time: {} ms",
        cards.len(),
        time.elapsed().as_millis()
    );
    cards
}
