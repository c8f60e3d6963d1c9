use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints};

use crate::chart::{build_chart, ChartData, ChartKind};
use crate::color::SeriesColors;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Chart area (central panel, below the preview)
// ---------------------------------------------------------------------------

/// Render the chart for the projected table. Stateless: everything is derived
/// from the current table each frame, nothing is cached across interactions.
pub fn chart_panel(ui: &mut Ui, table: &Table, kind: ChartKind) {
    let Some(data) = build_chart(table, kind) else {
        ui.colored_label(
            Color32::YELLOW,
            "⚠ No numeric columns found for visualization. Try selecting appropriate columns.",
        );
        return;
    };

    let colors = SeriesColors::new(&table.numeric_column_names());
    let (x_label, y_label) = axis_labels(&data);

    Plot::new("chart_panel")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| match &data {
            ChartData::Xy {
                kind,
                y_name,
                points,
                ..
            } => {
                let color = colors.color_for(y_name);
                match kind {
                    ChartKind::Bar => {
                        let width = bar_width(points);
                        let bars = points
                            .iter()
                            .map(|&[x, y]| Bar::new(x, y).width(width))
                            .collect();
                        plot_ui.bar_chart(BarChart::new(bars).name(y_name).color(color));
                    }
                    ChartKind::Line => {
                        plot_ui.line(line_series(points, y_name, color));
                    }
                    ChartKind::Area => {
                        plot_ui.line(line_series(points, y_name, color).fill(0.0));
                    }
                    // Histogram and box-plot requests resolve to their own
                    // ChartData variants, never to Xy.
                    _ => {}
                }
            }
            ChartData::Histogram { name, bins } => {
                let color = colors.color_for(name);
                let bars = bins
                    .iter()
                    .map(|b| Bar::new(b.center, b.count as f64).width(b.width * 0.95))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(name).color(color));
            }
            ChartData::Box { name, stats } => {
                let color = colors.color_for(name);
                let elem = BoxElem::new(
                    0.5,
                    BoxSpread::new(stats.min, stats.q1, stats.median, stats.q3, stats.max),
                );
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(name).color(color));
            }
        });
}

fn axis_labels(data: &ChartData) -> (String, String) {
    match data {
        ChartData::Xy { x_name, y_name, .. } => (x_name.clone(), y_name.clone()),
        ChartData::Histogram { name, .. } => (name.clone(), "count".to_string()),
        ChartData::Box { name, .. } => (String::new(), name.clone()),
    }
}

fn line_series<'a>(points: &'a [[f64; 2]], name: &'a str, color: Color32) -> Line<'a> {
    Line::new(PlotPoints::from(points.to_vec()))
        .name(name)
        .color(color)
        .width(1.5)
}

/// Bar width that keeps neighbouring bars from overlapping across the span
/// of the primary axis.
fn bar_width(points: &[[f64; 2]]) -> f64 {
    let min = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
    if points.len() < 2 || (max - min).abs() < f64::EPSILON {
        return 0.5;
    }
    (max - min) / points.len() as f64 * 0.8
}
