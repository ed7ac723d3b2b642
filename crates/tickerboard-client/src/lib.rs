//! Fetch recent daily prices for a list of tickers from the Yahoo Finance
//! chart endpoint and render them as a grid of terminal cards.
//!
//! - [`fetch`]: parse the ticker list and run one refresh.
//! - [`state`]: the view model and the actions that update it.
//! - [`dashboard`]: refresh generations, cancellation and publishing.
//! - [`render`]: cards, charts and the grid.

pub mod client_ext;
pub mod config;
pub mod dashboard;
pub mod endp;
pub mod error;
pub mod fetch;
pub mod render;
pub mod schema;
pub mod state;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    pub use crate::client_ext::{build_client, ChartSource, Client, YahooFinance};
    pub use crate::config::Config;
    pub use crate::dashboard::Dashboard;
    pub use crate::endp::yahoo_finance::CloseFilter;
    pub use crate::error::{ConfigError, FetchError};
    pub use crate::fetch::{parse_tickers, refresh, FetchOptions};
    pub use crate::render::RenderOptions;
    pub use crate::schema::StockCard;
    pub use crate::state::{Action, ViewModel};
}
