use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Table;

/// Viewport cap for the preview grid.
const PREVIEW_ROWS: usize = 200;

/// Render the first rows of the table in a scrollable grid. Column headers
/// carry the inferred kind so the user can see which columns will chart.
pub fn preview_grid(ui: &mut Ui, table: &Table) {
    if table.column_count() == 0 {
        ui.label("No columns to preview.");
        return;
    }

    let shown = table.row_count().min(PREVIEW_ROWS);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(260.0)
        .columns(
            TableColumn::auto().at_least(60.0).clip(true),
            table.column_count(),
        )
        .header(20.0, |mut header| {
            for column in table.columns() {
                header.col(|ui| {
                    ui.strong(&column.name);
                    ui.weak(column.kind.label());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let idx = row.index();
                for column in table.columns() {
                    let cell = &column.values[idx];
                    row.col(|ui| {
                        if cell.is_null() {
                            ui.weak("null");
                        } else {
                            ui.label(cell.to_string());
                        }
                    });
                }
            });
        });

    if table.is_empty() {
        ui.weak("Table has no rows.");
    } else if table.row_count() > shown {
        ui.weak(format!(
            "Showing first {shown} of {} rows",
            table.row_count()
        ));
    }
}
