use crate::data::model::{Column, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Histogram,
    BoxPlot,
    Area,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Area,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::Area => "Area Chart",
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved chart data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HistogramBin {
    pub center: f64,
    pub width: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Chart-ready data derived purely from a table. Which variant comes out
/// depends on the requested [`ChartKind`].
#[derive(Debug, Clone)]
pub enum ChartData {
    Xy {
        kind: ChartKind,
        x_name: String,
        y_name: String,
        points: Vec<[f64; 2]>,
    },
    Histogram {
        name: String,
        bins: Vec<HistogramBin>,
    },
    Box {
        name: String,
        stats: BoxStats,
    },
}

/// Build chart data for the table, or `None` when the table has no numeric
/// columns (the warning state — visualization degrades, nothing fails).
///
/// Axis selection deliberately truncates to the first one or two numeric
/// columns in table order: `numeric[0]` is the primary axis and `numeric[1]`
/// the secondary when present, else `numeric[0]` serves both.
pub fn build_chart(table: &Table, kind: ChartKind) -> Option<ChartData> {
    let numeric: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| c.kind == ColumnKind::Numeric)
        .collect();
    let primary = *numeric.first()?;
    let secondary = numeric.get(1).copied().unwrap_or(primary);

    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area => Some(ChartData::Xy {
            kind,
            x_name: primary.name.clone(),
            y_name: secondary.name.clone(),
            points: paired_points(primary, secondary),
        }),
        ChartKind::Histogram => Some(ChartData::Histogram {
            name: primary.name.clone(),
            bins: histogram_bins(&numeric_values(primary)),
        }),
        ChartKind::BoxPlot => box_stats(&numeric_values(primary)).map(|stats| ChartData::Box {
            name: primary.name.clone(),
            stats,
        }),
    }
}

fn numeric_values(column: &Column) -> Vec<f64> {
    column.values.iter().filter_map(|v| v.as_f64()).collect()
}

/// Pair the two axes row-wise, skipping rows where either cell is missing.
fn paired_points(x: &Column, y: &Column) -> Vec<[f64; 2]> {
    x.values
        .iter()
        .zip(y.values.iter())
        .filter_map(|(xv, yv)| Some([xv.as_f64()?, yv.as_f64()?]))
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// Equal-width bins, square-root bin count clamped to [1, 50]. A degenerate
/// single-value domain collapses to one bin.
fn histogram_bins(values: &[f64]) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            center: min,
            width: 1.0,
            count: values.len(),
        }];
    }

    let bin_count = ((values.len() as f64).sqrt().ceil() as usize).clamp(1, 50);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];
    for &v in values {
        // The maximum lands exactly on the upper edge; fold it into the last bin.
        let idx = (((v - min) / width) as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            center: min + (i as f64 + 0.5) * width,
            width,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot statistics
// ---------------------------------------------------------------------------

fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(BoxStats {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear-interpolation quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
