use crate::schema::{to_fixed2, ChartPoint};

const POINT: char = '•';
const RISE: char = '│';

/// One printed row of a chart: the y-axis gutter and the plot area, kept
/// apart so the card can style them differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLine {
    pub axis: String,
    pub plot: String,
}

/// Plot `points` as a line chart `width` columns wide (gutter included)
/// with `height` plot rows, followed by the x-axis and its index labels.
///
/// The x-axis is the point index: the first column is point `0`, the last
/// column is point `len - 1`, and columns in between take the nearest
/// point. Returns nothing for an empty series.
pub fn plot(points: &[ChartPoint], width: usize, height: usize) -> Vec<ChartLine> {
    if points.is_empty() {
        return vec![];
    }
    let height = height.max(2);

    let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.close), hi.max(p.close))
    });
    let top_label = to_fixed2(max);
    let bottom_label = to_fixed2(min);
    let gutter = top_label.chars().count().max(bottom_label.chars().count());
    let plot_width = width.saturating_sub(gutter + 2).max(1);

    // row 0 is the bottom of the plot
    let rows: Vec<usize> = (0..plot_width)
        .map(|column| {
            let close = points[nearest_index(column, plot_width, points.len())].close;
            scale(close, min, max, height)
        })
        .collect();

    let mut canvas = vec![vec![' '; plot_width]; height];
    for (column, &row) in rows.iter().enumerate() {
        if column > 0 {
            let previous = rows[column - 1];
            let (lo, hi) = if previous < row { (previous, row) } else { (row, previous) };
            for between in lo + 1..hi {
                canvas[between][column] = RISE;
            }
        }
        canvas[row][column] = POINT;
    }

    let mut lines: Vec<ChartLine> = canvas
        .into_iter()
        .enumerate()
        .rev()
        .map(|(row, cells)| {
            let axis = if row == height - 1 {
                format!("{top_label:>gutter$} ┤")
            } else if row == 0 {
                format!("{bottom_label:>gutter$} ┤")
            } else {
                format!("{:gutter$} │", "")
            };
            ChartLine {
                axis,
                plot: cells.into_iter().collect(),
            }
        })
        .collect();

    lines.push(ChartLine {
        axis: format!("{:gutter$} └", ""),
        plot: "─".repeat(plot_width),
    });
    lines.push(ChartLine {
        axis: format!("{:gutter$}  ", ""),
        plot: index_labels(points.len(), plot_width),
    });
    lines
}

fn nearest_index(column: usize, columns: usize, len: usize) -> usize {
    if columns <= 1 || len <= 1 {
        return 0;
    }
    let position = column as f64 * (len - 1) as f64 / (columns - 1) as f64;
    (position.round() as usize).min(len - 1)
}

fn scale(close: f64, min: f64, max: f64, height: usize) -> usize {
    if max <= min {
        return (height - 1) / 2;
    }
    let row = ((close - min) / (max - min) * (height - 1) as f64).round() as usize;
    row.min(height - 1)
}

// "0" under the first column, the last index under the last column
fn index_labels(len: usize, width: usize) -> String {
    let first = "0";
    if len <= 1 {
        return format!("{first:<width$}");
    }
    let last = (len - 1).to_string();
    let gap = width.saturating_sub(first.len() + last.len());
    if gap == 0 {
        return format!("{first:<width$}");
    }
    format!("{first}{:gap$}{last}", "")
}
