//! Plain-text rendering of the dashboard: a title, the input panel and a
//! grid of cards that reflows to the terminal width.

pub mod card;
pub mod chart;

use crate::schema::StockCard;
use crate::state::ViewModel;
use colored::Colorize;

/// Narrowest a card may get before the grid drops a column.
pub const MIN_CARD_WIDTH: usize = 36;
pub const GAP: usize = 2;
pub const DEFAULT_WIDTH: usize = 120;
pub const DEFAULT_CHART_HEIGHT: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Total columns available.
    pub width: usize,
    /// Plot rows per chart, axes excluded.
    pub chart_height: usize,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: DEFAULT_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Bold,
    Gain,
    Loss,
    Dim,
    Stroke,
}

pub(crate) fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Bold => text.bold().to_string(),
        Tone::Gain | Tone::Stroke => text.truecolor(74, 222, 128).to_string(),
        Tone::Loss => text.truecolor(239, 68, 68).to_string(),
        Tone::Dim => text.truecolor(136, 136, 136).to_string(),
    }
}

/// Columns and card width for `cards` cards in `width` columns of terminal.
///
/// As many columns as fit at [`MIN_CARD_WIDTH`], never more than there are
/// cards, and the leftover width shared out between them.
pub fn layout(cards: usize, width: usize) -> (usize, usize) {
    let fit = ((width + GAP) / (MIN_CARD_WIDTH + GAP)).max(1);
    let columns = fit.min(cards.max(1));
    let card_width = (width.saturating_sub(GAP * (columns - 1)) / columns).max(MIN_CARD_WIDTH);
    (columns, card_width)
}

/// The card grid alone.
pub fn grid(cards: &[StockCard], options: &RenderOptions) -> String {
    let (columns, card_width) = layout(cards.len(), options.width);
    let blank = " ".repeat(card_width);
    let gap = " ".repeat(GAP);

    cards
        .chunks(columns)
        .map(|row| {
            let rendered: Vec<Vec<String>> = row
                .iter()
                .map(|stock| card::lines(stock, card_width, options))
                .collect();
            let height = rendered.iter().map(Vec::len).max().unwrap_or(0);
            (0..height)
                .map(|i| {
                    rendered
                        .iter()
                        .map(|lines| lines.get(i).map_or(blank.as_str(), String::as_str))
                        .collect::<Vec<_>>()
                        .join(gap.as_str())
                        .trim_end()
                        .to_string()
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Title, input panel and grid.
pub fn dashboard(vm: &ViewModel, options: &RenderOptions) -> String {
    let title = paint("📈 Stock Market Dashboard", Tone::Bold, options.color);
    let button = paint(&format!("[ {} ]", vm.button_label()), Tone::Gain, options.color);
    let mut page = format!("{title}\n\nTickers: {}  {button}\n", vm.input);
    if !vm.cards.is_empty() {
        page.push('\n');
        page.push_str(&grid(&vm.cards, options));
        page.push('\n');
    }
    page
}
