use std::path::PathBuf;

use crate::chart::ChartKind;
use crate::data::clean;
use crate::data::export::ExportFormat;
use crate::data::loader;
use crate::data::model::Table;
use crate::data::select;

// ---------------------------------------------------------------------------
// Per-file pipeline context
// ---------------------------------------------------------------------------

/// Everything the pipeline knows about one successfully loaded file. There is
/// no shared store: each context owns its table and its user-selected
/// parameters, and is dropped with its entry.
pub struct FileContext {
    pub table: Table,
    /// Selected column subset, kept in table order. Default: all columns.
    pub selected_columns: Vec<String>,
    pub chart_kind: ChartKind,
    pub export_format: ExportFormat,
    /// Confirmation or failure message from the most recent action.
    pub notice: Option<String>,
}

impl FileContext {
    pub fn new(table: Table) -> Self {
        let selected_columns = table.column_names();
        FileContext {
            table,
            selected_columns,
            chart_kind: ChartKind::default(),
            export_format: ExportFormat::Csv,
            notice: None,
        }
    }

    pub fn remove_duplicates(&mut self) {
        let removed = clean::remove_duplicates(&mut self.table);
        self.notice = Some(format!("Removed {removed} duplicate rows"));
    }

    pub fn fill_missing(&mut self) {
        let filled = clean::fill_missing_numeric(&mut self.table);
        self.notice = Some(format!("Filled {filled} missing values"));
    }

    /// Toggle one column in the selection, keeping table order.
    pub fn toggle_column(&mut self, name: &str) {
        if let Some(pos) = self.selected_columns.iter().position(|c| c == name) {
            self.selected_columns.remove(pos);
        } else {
            self.selected_columns.push(name.to_string());
            let order = self.table.column_names();
            self.selected_columns
                .sort_by_key(|c| order.iter().position(|o| o == c).unwrap_or(usize::MAX));
        }
    }

    pub fn select_all_columns(&mut self) {
        self.selected_columns = self.table.column_names();
    }

    pub fn select_no_columns(&mut self) {
        self.selected_columns.clear();
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_columns.iter().any(|c| c == name)
    }

    /// The table projected to the current column selection, as fed to the
    /// chart and the exporter. The selection only ever holds existing names,
    /// so a failure here is a bug; degrade to an empty table rather than
    /// taking the file down.
    pub fn projected(&self) -> Table {
        match select::select_columns(&self.table, &self.selected_columns) {
            Ok(table) => table,
            Err(err) => {
                log::error!("column selection failed: {err}");
                Table::empty()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Batch entries
// ---------------------------------------------------------------------------

pub enum FileView {
    Loaded(FileContext),
    /// Per-file load failure: the message is shown inline and the file is
    /// skipped; sibling entries are unaffected.
    Failed(String),
}

pub struct FileEntry {
    pub file_name: String,
    pub size_bytes: u64,
    pub view: FileView,
}

impl FileEntry {
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.size_bytes as f64 / 1024.0)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// One entry per file of the current batch, in upload order.
    pub entries: Vec<FileEntry>,
    /// Index of the entry shown in the central panel.
    pub active: usize,
    /// Batch-level status line shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a batch of files, one entry each, in order. A file that fails to
    /// load becomes a `Failed` entry and never aborts the rest of the batch.
    pub fn open_paths(&mut self, paths: &[PathBuf]) {
        if paths.is_empty() {
            return;
        }
        let first_new = self.entries.len();
        for path in paths {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            match loader::load_path(path) {
                Ok((size_bytes, table)) => {
                    log::info!(
                        "Loaded {file_name}: {} rows × {} columns",
                        table.row_count(),
                        table.column_count()
                    );
                    self.entries.push(FileEntry {
                        file_name,
                        size_bytes,
                        view: FileView::Loaded(FileContext::new(table)),
                    });
                }
                Err(err) => {
                    log::error!("Failed to load {file_name}: {err:#}");
                    self.entries.push(FileEntry {
                        file_name,
                        size_bytes: 0,
                        view: FileView::Failed(format!("{err:#}")),
                    });
                }
            }
        }
        self.active = first_new;
        self.status_message = Some(format!("All {} files processed", paths.len()));
    }

    pub fn close_all(&mut self) {
        self.entries.clear();
        self.active = 0;
        self.status_message = None;
    }

    pub fn active_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.active)
    }

    pub fn active_entry_mut(&mut self) -> Option<&mut FileEntry> {
        self.entries.get_mut(self.active)
    }

    pub fn loaded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.view, FileView::Loaded(_)))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_upload;

    fn context() -> FileContext {
        let table =
            load_upload("t.csv", b"id,name,score\n1,a,10\n2,b,20\n").unwrap();
        FileContext::new(table)
    }

    #[test]
    fn selection_defaults_to_all_columns_in_table_order() {
        let ctx = context();
        assert_eq!(ctx.selected_columns, vec!["id", "name", "score"]);
    }

    #[test]
    fn toggling_a_column_off_and_on_restores_table_order() {
        let mut ctx = context();
        ctx.toggle_column("id");
        assert_eq!(ctx.selected_columns, vec!["name", "score"]);

        ctx.toggle_column("id");
        assert_eq!(ctx.selected_columns, vec!["id", "name", "score"]);
    }

    #[test]
    fn projection_follows_the_selection() {
        let mut ctx = context();
        ctx.select_no_columns();
        assert_eq!(ctx.projected().column_count(), 0);

        ctx.toggle_column("score");
        assert_eq!(ctx.projected().column_names(), vec!["score"]);
    }

    #[test]
    fn cleaning_actions_record_a_notice() {
        let mut ctx = context();
        ctx.remove_duplicates();
        assert_eq!(ctx.notice.as_deref(), Some("Removed 0 duplicate rows"));

        ctx.fill_missing();
        assert_eq!(ctx.notice.as_deref(), Some("Filled 0 missing values"));
    }

    #[test]
    fn a_bad_file_is_skipped_and_the_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("orders.csv");
        std::fs::write(&good, "a,b\n1,2\n").unwrap();
        let bad = dir.path().join("notes.txt");
        std::fs::write(&bad, "hello").unwrap();
        let also_good = dir.path().join("more.csv");
        std::fs::write(&also_good, "x\n9\n").unwrap();

        let mut state = AppState::default();
        state.open_paths(&[good, bad, also_good]);

        assert_eq!(state.entries.len(), 3);
        assert_eq!(state.loaded_count(), 2);
        match &state.entries[1].view {
            FileView::Failed(msg) => assert!(msg.contains("unsupported file type: .txt")),
            FileView::Loaded(_) => panic!("txt file must not load"),
        }
        assert!(matches!(state.entries[2].view, FileView::Loaded(_)));
        assert_eq!(
            state.status_message.as_deref(),
            Some("All 3 files processed")
        );
    }
}
