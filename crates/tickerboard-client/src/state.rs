use crate::fetch::parse_tickers;
use crate::schema::StockCard;

pub const IDLE_LABEL: &str = "Refresh Data";
pub const BUSY_LABEL: &str = "Loading...";

/// Everything the dashboard shows, as one value.
///
/// A view model is never mutated in place; [`ViewModel::apply`] returns the
/// next one, so a sequence of [`Action`]s can be replayed to rebuild any
/// state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    /// Raw text of the ticker field.
    pub input: String,
    /// Tickers parsed from `input` by the last `Parse`.
    pub tickers: Vec<String>,
    /// Cards of the last completed refresh.
    pub cards: Vec<StockCard>,
    pub busy: bool,
    /// Refresh generation currently in flight (or last completed).
    pub generation: u64,
    /// Per-index results of the in-flight generation.
    pending: Vec<Option<StockCard>>,
}

/// A discrete change to the [`ViewModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The ticker text changed.
    Edit(String),
    /// Split the current text into tickers.
    Parse,
    /// A refresh over the current tickers began.
    FetchStart { generation: u64 },
    FetchSuccess {
        generation: u64,
        index: usize,
        card: StockCard,
    },
    FetchError {
        generation: u64,
        index: usize,
        ticker: String,
        reason: String,
    },
    /// Every ticker of the generation has reported; publish its cards.
    FetchComplete { generation: u64 },
}

impl ViewModel {
    pub fn new(input: &str) -> Self {
        ViewModel {
            input: input.to_string(),
            ..Default::default()
        }
    }

    /// Rebuild a view model from scratch.
    pub fn replay<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = Action>,
    {
        actions
            .into_iter()
            .fold(ViewModel::default(), |vm, action| vm.apply(action))
    }

    /// Label of the refresh trigger.
    pub fn button_label(&self) -> &'static str {
        if self.busy {
            BUSY_LABEL
        } else {
            IDLE_LABEL
        }
    }

    /// Number of tickers of the in-flight generation that have reported.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.pending.iter().filter(|slot| slot.is_some()).count();
        (done, self.pending.len())
    }

    /// Compute the state after `action`.
    ///
    /// Actions tagged with any generation other than the current one are
    /// ignored, and so is a `FetchStart` that does not move the generation
    /// forward.
    pub fn apply(&self, action: Action) -> ViewModel {
        let mut next = self.clone();
        match action {
            Action::Edit(input) => next.input = input,

            Action::Parse => next.tickers = parse_tickers(&next.input),

            Action::FetchStart { generation } if generation > self.generation => {
                next.generation = generation;
                next.busy = true;
                next.pending = vec![None; next.tickers.len()];
            }

            Action::FetchSuccess {
                generation,
                index,
                card,
            } if self.is_current(generation) => {
                if let Some(slot) = next.pending.get_mut(index) {
                    *slot = Some(card);
                }
            }

            Action::FetchError {
                generation,
                index,
                ticker,
                reason,
            } if self.is_current(generation) => {
                log::trace!("[{ticker}] recorded as error: {reason}");
                if let Some(slot) = next.pending.get_mut(index) {
                    *slot = Some(StockCard::error(&ticker));
                }
            }

            Action::FetchComplete { generation } if self.is_current(generation) => {
                let pending = std::mem::take(&mut next.pending);
                next.cards = pending
                    .into_iter()
                    .zip(&next.tickers)
                    .map(|(slot, ticker)| slot.unwrap_or_else(|| StockCard::error(ticker)))
                    .collect();
                next.busy = false;
            }

            stale => log::trace!("Ignoring stale action: {stale:?}"),
        }
        next
    }

    fn is_current(&self, generation: u64) -> bool {
        self.busy && generation == self.generation
    }
}
