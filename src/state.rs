use std::path::{Path, PathBuf};

use crate::commands::{self, FilterOutcome, MergeOutcome};
use crate::config::CurateConfig;
use crate::data::loader::{load_table, save_table};
use crate::data::model::{SchemaVariant, Table};
use crate::error::CurateError;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    /// A step was triggered before the step it depends on.
    NotReady,
    Error,
}

/// Last message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Pipeline context: the artifacts published by each completed step.
///
/// Each artifact is replaced only when its step succeeds, so a failed step
/// never clobbers earlier results.
#[derive(Default)]
pub struct AppState {
    pub config: CurateConfig,

    /// File chosen with "Upload" and its detected variant.
    pub source: Option<(PathBuf, SchemaVariant)>,

    /// Table reloaded with comment lines stripped.
    pub cleaned: Option<Table>,

    pub filtered: Option<FilterOutcome>,

    pub merged: Option<MergeOutcome>,

    pub notice: Option<Notice>,
}

impl AppState {
    pub fn new(config: CurateConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            NoticeLevel::Info => log::info!("{text}"),
            NoticeLevel::Warning => log::warn!("{text}"),
            NoticeLevel::NotReady => log::info!("Not ready: {text}"),
            NoticeLevel::Error => log::error!("{text}"),
        }
        self.notice = Some(Notice { level, text });
    }

    fn fail(&mut self, err: &CurateError) {
        self.notify(NoticeLevel::Error, format!("Error: {err}"));
    }

    /// Pick a source file and report its detected data type.
    ///
    /// A new source drops the cleaned and filtered results of the old one.
    pub fn select_source(&mut self, path: PathBuf) {
        match load_table(&path, &self.config) {
            Ok(table) => {
                let variant = table.variant();
                match variant {
                    SchemaVariant::Type1 => {
                        self.notify(NoticeLevel::Info, "Detected Type 1 dataset.")
                    }
                    SchemaVariant::Unrecognized => self.notify(
                        NoticeLevel::Warning,
                        "Unknown format: this CSV does not match known data types.",
                    ),
                }
                self.source = Some((path, variant));
                self.cleaned = None;
                self.filtered = None;
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Reload the selected source with comment lines stripped.
    pub fn clean(&mut self) {
        let Some((path, _)) = self.source.clone() else {
            self.notify(NoticeLevel::NotReady, "Please upload a CSV file first!");
            return;
        };
        match load_table(&path, &self.config) {
            Ok(table) => {
                self.notify(
                    NoticeLevel::Info,
                    format!("Comments removed, {} records ready to filter.", table.len()),
                );
                self.cleaned = Some(table);
                self.filtered = None;
            }
            Err(e) => self.fail(&e),
        }
    }

    pub fn filter(&mut self) {
        let Some(table) = &self.cleaned else {
            self.notify(NoticeLevel::NotReady, "No cleaned data available! Clean the CSV first.");
            return;
        };
        match commands::filter_table(table, &self.config) {
            Ok(outcome) => {
                let text = if outcome.labeled.is_empty() && outcome.variant == SchemaVariant::Unrecognized {
                    format!(
                        "No classification found, labeled all {} records as pseudo-labels.",
                        outcome.unlabeled.len()
                    )
                } else {
                    format!(
                        "Data filtered: {} labeled, {} pseudo-labeled.",
                        outcome.labeled.len(),
                        outcome.unlabeled.len()
                    )
                };
                self.notify(NoticeLevel::Info, text);
                self.filtered = Some(outcome);
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Write whichever halves have a target. A missing target is skipped
    /// with a warning rather than cancelling the other write.
    pub fn save_filtered(&mut self, labeled: Option<&Path>, unlabeled: Option<&Path>) {
        let Some(outcome) = &self.filtered else {
            self.notify(NoticeLevel::NotReady, "No filtered data available! Filter the CSV first.");
            return;
        };
        if labeled.is_none() && unlabeled.is_none() {
            self.notify(NoticeLevel::Warning, "Save cancelled, nothing was written.");
            return;
        }
        match commands::save_filter_outcome(outcome, labeled, unlabeled, &self.config) {
            Ok(_) if labeled.is_none() => self.notify(
                NoticeLevel::Warning,
                "Unlabeled file saved, labeled file skipped.",
            ),
            Ok(_) if unlabeled.is_none() => self.notify(
                NoticeLevel::Warning,
                "Labeled file saved, unlabeled file skipped.",
            ),
            Ok(_) => self.notify(NoticeLevel::Info, "Files saved successfully!"),
            Err(e) => self.fail(&e),
        }
    }

    pub fn merge(&mut self, paths: &[PathBuf]) {
        if paths.is_empty() {
            self.notify(NoticeLevel::Error, "No files selected!");
            return;
        }
        match commands::merge_files(paths, &self.config) {
            Ok(outcome) => {
                self.notify(
                    NoticeLevel::Info,
                    format!("{} files merged successfully!", outcome.sources),
                );
                self.merged = Some(outcome);
            }
            Err(e) => self.fail(&e),
        }
    }

    pub fn save_merged(&mut self, path: &Path) {
        let Some(outcome) = &self.merged else {
            self.notify(NoticeLevel::NotReady, "No merged data available! Merge CSVs first.");
            return;
        };
        match save_table(&outcome.table, path, &self.config) {
            Ok(()) => self.notify(
                NoticeLevel::Info,
                format!("Merged file saved to: {}", path.display()),
            ),
            Err(e) => self.fail(&e),
        }
    }
}
