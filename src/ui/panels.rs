use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::ChartKind;
use crate::data::export::{self, ExportFormat};
use crate::state::{AppState, FileContext, FileView};
use crate::ui::{chart, preview};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Close all").clicked() {
                state.close_all();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.entries.is_empty() {
            ui.label(format!(
                "{} of {} files loaded",
                state.loaded_count(),
                state.entries.len()
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::LIGHT_GREEN));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – batch list + per-file controls
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.entries.is_empty() {
        ui.label("No files loaded.");
        return;
    }

    let mut clicked = None;
    for (idx, entry) in state.entries.iter().enumerate() {
        let text = match &entry.view {
            FileView::Loaded(_) => RichText::new(&entry.file_name),
            FileView::Failed(_) => RichText::new(&entry.file_name).color(Color32::RED),
        };
        if ui.selectable_label(idx == state.active, text).clicked() {
            clicked = Some(idx);
        }
    }
    if let Some(idx) = clicked {
        state.active = idx;
    }

    ui.separator();

    let Some(entry) = state.active_entry_mut() else {
        return;
    };
    let file_name = entry.file_name.clone();
    match &mut entry.view {
        FileView::Failed(msg) => {
            ui.colored_label(Color32::RED, format!("❌ {msg}"));
            ui.label("This file was skipped; the rest of the batch is unaffected.");
        }
        FileView::Loaded(ctx) => file_controls(ui, &file_name, ctx),
    }
}

fn file_controls(ui: &mut Ui, file_name: &str, ctx: &mut FileContext) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Cleaning");
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Remove duplicates").clicked() {
                    ctx.remove_duplicates();
                }
                if ui.button("Fill missing").clicked() {
                    ctx.fill_missing();
                }
            });
            if let Some(notice) = &ctx.notice {
                ui.colored_label(Color32::LIGHT_GREEN, notice);
            }
            ui.separator();

            // ---- Column selection ----
            let column_names = ctx.table.column_names();
            let header = format!(
                "Columns  ({}/{})",
                ctx.selected_columns.len(),
                column_names.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("columns")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            ctx.select_all_columns();
                        }
                        if ui.small_button("None").clicked() {
                            ctx.select_no_columns();
                        }
                    });
                    for name in &column_names {
                        let mut checked = ctx.is_selected(name);
                        if ui.checkbox(&mut checked, name.as_str()).changed() {
                            ctx.toggle_column(name);
                        }
                    }
                });
            ui.separator();

            ui.strong("Chart");
            for kind in ChartKind::ALL {
                ui.radio_value(&mut ctx.chart_kind, kind, kind.label());
            }
            ui.separator();

            ui.strong("Convert");
            ui.horizontal(|ui: &mut Ui| {
                for format in ExportFormat::ALL {
                    ui.radio_value(&mut ctx.export_format, format, format.label());
                }
            });
            if ui.button("Convert & save…").clicked() {
                export_file(file_name, ctx);
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – preview + chart for the active file
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(entry) = state.active_entry() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open CSV or Excel files to get started  (File → Open…)");
        });
        return;
    };

    match &entry.view {
        FileView::Failed(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.colored_label(Color32::RED, format!("❌ {}: {msg}", entry.file_name));
            });
        }
        FileView::Loaded(ctx) => {
            ui.horizontal(|ui: &mut Ui| {
                ui.strong(&entry.file_name);
                ui.weak(entry.size_label());
                ui.weak(format!(
                    "{} rows × {} columns",
                    ctx.table.row_count(),
                    ctx.table.column_count()
                ));
            });
            ui.add_space(4.0);
            preview::preview_grid(ui, &ctx.table);
            ui.separator();

            let projected = ctx.projected();
            chart::chart_panel(ui, &projected, ctx.chart_kind);
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    if let Some(paths) = files {
        state.open_paths(&paths);
    }
}

/// Serialize the projected table and offer it as a save-as download. Both
/// serialization and write failures stay local to this file's notice line.
fn export_file(original_name: &str, ctx: &mut FileContext) {
    let projected = ctx.projected();
    let result = match export::export_table(&projected, original_name, ctx.export_format) {
        Ok(result) => result,
        Err(err) => {
            log::error!("Export of {original_name} failed: {err}");
            ctx.notice = Some(format!("Export failed: {err}"));
            return;
        }
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(&result.file_name)
        .add_filter(
            ctx.export_format.label(),
            &[ctx.export_format.extension()],
        )
        .save_file()
    else {
        return;
    };

    match std::fs::write(&path, &result.bytes)
        .with_context(|| format!("writing {}", path.display()))
    {
        Ok(()) => {
            log::info!(
                "Exported {} ({} bytes, {})",
                path.display(),
                result.bytes.len(),
                result.mime
            );
            ctx.notice = Some(format!("Saved {}", path.display()));
        }
        Err(err) => {
            log::error!("Export of {original_name} failed: {err:#}");
            ctx.notice = Some(format!("Export failed: {err:#}"));
        }
    }
}
