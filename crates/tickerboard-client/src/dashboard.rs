use crate::client_ext::ChartSource;
use crate::fetch::{fetch_each, FetchOptions};
use crate::state::{Action, ViewModel};
use futures::StreamExt;
use std::pin::pin;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

/// Drives refreshes against a [`ChartSource`] and publishes every new
/// [`ViewModel`] to its subscribers.
///
/// Starting a refresh while another is in flight aborts the older task;
/// anything it still manages to report is dropped by the view model because
/// its generation is no longer current.
pub struct Dashboard<S> {
    source: Arc<S>,
    options: FetchOptions,
    view: Arc<watch::Sender<ViewModel>>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl<S: ChartSource + 'static> Dashboard<S> {
    pub fn new(source: S, options: FetchOptions, input: &str) -> Self {
        let (view, _) = watch::channel(ViewModel::new(input));
        Dashboard {
            source: Arc::new(source),
            options,
            view: Arc::new(view),
            in_flight: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.view.subscribe()
    }

    /// Snapshot of the current state.
    pub fn view(&self) -> ViewModel {
        self.view.borrow().clone()
    }

    pub fn dispatch(&self, action: Action) {
        dispatch(&self.view, action);
    }

    pub fn set_input(&self, raw: &str) {
        self.dispatch(Action::Edit(raw.to_string()));
    }

    /// Parse the current input and fetch it as a new generation.
    ///
    /// The returned handle resolves once the generation has published its
    /// cards; it resolves with a cancellation error if a later refresh
    /// superseded it.
    pub fn refresh(&self) -> JoinHandle<()> {
        // held until the new task is registered, so generations and aborts
        // line up even when refreshes race
        let mut in_flight = match self.in_flight.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut generation = 0;
        let mut tickers = vec![];
        self.view.send_modify(|vm| {
            let parsed = vm.apply(Action::Parse);
            generation = parsed.generation + 1;
            *vm = parsed.apply(Action::FetchStart { generation });
            tickers = vm.tickers.clone();
        });
        log::debug!("Refresh generation {generation} started for {} tickers", tickers.len());

        let source = self.source.clone();
        let view = self.view.clone();
        let options = self.options;
        let task = tokio::spawn(async move {
            let time = std::time::Instant::now();
            let mut results = pin!(fetch_each(source, tickers, options));

            while let Some((index, ticker, outcome)) = results.next().await {
                let action = match outcome {
                    Ok(card) => Action::FetchSuccess {
                        generation,
                        index,
                        card,
                    },
                    Err(e) => Action::FetchError {
                        generation,
                        index,
                        ticker,
                        reason: e.to_string(),
                    },
                };
                dispatch(&view, action);
            }

            dispatch(&view, Action::FetchComplete { generation });
            log::debug!(
                "Refresh generation {generation} completed. Elapsed time: {} ms",
                time.elapsed().as_millis()
            );
        });

        if let Some(previous) = in_flight.replace(task.abort_handle()) {
            previous.abort();
        }
        task
    }

    /// Start a refresh only when none is in flight.
    ///
    /// Periodic callers use this so a slow generation is allowed to finish
    /// instead of being superseded on every tick.
    pub fn refresh_if_idle(&self) -> Option<JoinHandle<()>> {
        if self.view.borrow().busy {
            log::debug!("Refresh still in flight; skipping");
            return None;
        }
        Some(self.refresh())
    }
}

fn dispatch(view: &watch::Sender<ViewModel>, action: Action) {
    view.send_modify(|vm| *vm = vm.apply(action));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endp::yahoo_finance::CloseFilter;
    use crate::schema::StockCard;
    use crate::testing::StubSource;

    fn options() -> FetchOptions {
        FetchOptions {
            concurrency: 4,
            closes: CloseFilter::DropFalsy,
        }
    }

    #[tokio::test]
    async fn refresh_publishes_cards_and_clears_busy() {
        let source = StubSource::new()
            .quote("AAPL", 190.0, 188.0, 10)
            .quote("MSFT", 420.0, 421.0, 20);
        let dashboard = Dashboard::new(source, options(), "AAPL, ZZZZ ,MSFT");

        let handle = dashboard.refresh();
        assert!(dashboard.view().busy);
        handle.await.unwrap();

        let vm = dashboard.view();
        assert!(!vm.busy);
        assert_eq!(vm.button_label(), "Refresh Data");
        assert_eq!(vm.generation, 1);
        let tickers: Vec<_> = vm.cards.iter().map(|c| c.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "ZZZZ", "MSFT"]);
        assert_eq!(vm.cards[1], StockCard::error("ZZZZ"));
        assert!(!vm.cards[0].is_error());
        assert!(!vm.cards[2].is_error());
    }

    #[tokio::test]
    async fn back_to_back_refreshes_keep_the_latest() {
        let mut source = StubSource::new()
            .quote("SLOW", 1.0, 1.0, 1)
            .quote("AAPL", 190.0, 188.0, 10);
        let gate = source.gate("SLOW");
        let dashboard = Dashboard::new(source, options(), "SLOW");

        let first = dashboard.refresh();
        dashboard.set_input("AAPL");
        let second = dashboard.refresh();

        // release the superseded request; whatever it reports is ignored
        gate.notify_one();
        second.await.unwrap();
        assert!(first.await.unwrap_err().is_cancelled());

        let vm = dashboard.view();
        assert!(!vm.busy);
        assert_eq!(vm.generation, 2);
        assert_eq!(vm.tickers, vec!["AAPL"]);
        assert_eq!(vm.cards.len(), 1);
        assert_eq!(vm.cards[0].ticker, "AAPL");
    }

    #[tokio::test]
    async fn many_overlapping_refreshes_stay_consistent() {
        let source = StubSource::new().quote("AAPL", 190.0, 188.0, 10);
        let dashboard = Dashboard::new(source, options(), "AAPL,AAPL");

        let handles: Vec<_> = (0..5).map(|_| dashboard.refresh()).collect();
        let mut completed = 0;
        for handle in handles {
            if handle.await.is_ok() {
                completed += 1;
            }
        }
        assert!(completed >= 1);

        let vm = dashboard.view();
        assert!(!vm.busy);
        assert_eq!(vm.generation, 5);
        assert_eq!(vm.cards.len(), 2);
    }

    #[tokio::test]
    async fn idle_refresh_waits_for_the_running_generation() {
        let mut source = StubSource::new().quote("SLOW", 1.0, 1.0, 1);
        let gate = source.gate("SLOW");
        let dashboard = Dashboard::new(source, options(), "SLOW");

        let running = dashboard.refresh_if_idle().expect("nothing was in flight");
        assert!(dashboard.refresh_if_idle().is_none());
        assert!(dashboard.refresh_if_idle().is_none());

        gate.notify_one();
        running.await.unwrap();
        let vm = dashboard.view();
        assert!(!vm.busy);
        assert_eq!(vm.generation, 1);
        assert!(!vm.cards[0].is_error());

        // idle again, so the next tick goes through
        dashboard.refresh_if_idle().expect("previous refresh finished").await.unwrap();
        assert_eq!(dashboard.view().generation, 2);
    }

    #[tokio::test]
    async fn subscribers_see_busy_then_idle() {
        let source = StubSource::new().quote("AAPL", 190.0, 188.0, 10);
        let dashboard = Dashboard::new(source, options(), "AAPL");
        let mut rx = dashboard.subscribe();

        dashboard.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        let vm = rx.borrow_and_update().clone();
        assert!(!vm.busy);
        assert_eq!(vm.cards.len(), 1);
    }
}
