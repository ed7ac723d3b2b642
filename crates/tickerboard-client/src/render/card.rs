use super::{chart, paint, RenderOptions, Tone};
use crate::schema::StockCard;

/// Render one card as `card_width`-wide lines, borders included.
pub fn lines(card: &StockCard, card_width: usize, options: &RenderOptions) -> Vec<String> {
    let inner = card_width.saturating_sub(4).max(1);
    let color = options.color;
    let row = |text: &str, tone: Tone| format!("│ {} │", paint(&fit(text, inner), tone, color));

    let change_tone = if card.change.is_gain() { Tone::Gain } else { Tone::Loss };

    let mut lines = vec![
        format!("╭{}╮", "─".repeat(inner + 2)),
        row(&card.ticker, Tone::Bold),
        row(&format!("${}", card.price), Tone::Bold),
        row(&format!("{}%", card.change), change_tone),
        row(&format!("Volume: {}", card.volume), Tone::Dim),
    ];

    if !card.chart_data.is_empty() {
        lines.push(row("", Tone::Plain));
        for line in chart::plot(&card.chart_data, inner, options.chart_height) {
            lines.push(format!(
                "│ {}{} │",
                paint(&line.axis, Tone::Dim, color),
                paint(&line.plot, Tone::Stroke, color)
            ));
        }
    }

    lines.push(format!("╰{}╯", "─".repeat(inner + 2)));
    lines
}

/// Pad or cut `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{text}{:pad$}", "", pad = width - count);
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Change, ChartPoint, Price, Volume};

    fn plain() -> RenderOptions {
        RenderOptions {
            width: 80,
            chart_height: 4,
            color: false,
        }
    }

    fn quoted() -> StockCard {
        StockCard {
            ticker: "AAPL".to_string(),
            price: Price::Quoted(189.84),
            change: Change::Percent(1.2345),
            volume: Volume::Traded(52345100.0),
            chart_data: vec![
                ChartPoint { index: 0, close: 185.0 },
                ChartPoint { index: 1, close: 189.84 },
            ],
        }
    }

    #[test]
    fn card_shows_every_field() {
        let lines = lines(&quoted(), 40, &plain());
        let text = lines.join("\n");
        assert!(text.contains("AAPL"));
        assert!(text.contains("$189.84"));
        assert!(text.contains("1.23%"));
        assert!(text.contains("Volume: 52345100"));
        assert!(text.contains("189.84 ┤"));
    }

    #[test]
    fn every_line_has_the_card_width() {
        for line in lines(&quoted(), 40, &plain()) {
            assert_eq!(line.chars().count(), 40, "{line:?}");
        }
    }

    #[test]
    fn error_card_has_no_chart() {
        let lines = lines(&StockCard::error("ZZZZ"), 40, &plain());
        let text = lines.join("\n");
        assert_eq!(lines.len(), 6);
        assert!(text.contains("$Error"));
        assert!(text.contains("N/A%"));
        assert!(text.contains("Volume: N/A"));
        assert!(!text.contains('┤'));
    }

    #[test]
    fn long_tickers_are_cut_to_fit() {
        assert_eq!(fit("ABCDEFGH", 5), "ABCD…");
        assert_eq!(fit("AB", 5), "AB   ");
    }
}
