use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, NoticeLevel};

const BUTTON_SIZE: [f32; 2] = [180.0, 32.0];

// ---------------------------------------------------------------------------
// Left side panel – filter workflow
// ---------------------------------------------------------------------------

/// Upload → Clean → Filter → Save, one button per step.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CSV Cleaner & Auto-Filter");
    ui.separator();

    if step_button(ui, "📂 Upload CSV") {
        if let Some(path) = pick_csv("Open observation export") {
            state.select_source(path);
        } else {
            log::debug!("Upload cancelled");
        }
    }
    if let Some((path, variant)) = &state.source {
        ui.label(format!("{} ({variant})", file_name(path)));
    }

    if step_button(ui, "🗑 Clean CSV") {
        state.clean();
    }
    if let Some(table) = &state.cleaned {
        ui.label(format!("{} records, {} columns", table.len(), table.columns().len()));
    }

    if step_button(ui, "🔍 Filter CSV") {
        state.filter();
    }
    if let Some(outcome) = &state.filtered {
        ui.label(format!(
            "{} labeled / {} unlabeled",
            outcome.labeled.len(),
            outcome.unlabeled.len()
        ));
    }

    if step_button(ui, "💾 Save CSV") {
        let labeled = save_csv("Save Labeled Data", "labeled.csv");
        let unlabeled = save_csv("Save Unlabeled Data", "unlabeled.csv");
        state.save_filtered(labeled.as_deref(), unlabeled.as_deref());
    }
}

// ---------------------------------------------------------------------------
// Right side panel – merge workflow
// ---------------------------------------------------------------------------

pub fn merge_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CSV Merger & Classifier");
    ui.separator();

    if step_button(ui, "📂 Merge CSVs") {
        let paths: Vec<PathBuf> = rfd::FileDialog::new()
            .set_title("Select exports to merge")
            .add_filter("CSV Files", &["csv"])
            .pick_files()
            .unwrap_or_default();
        state.merge(&paths);
    }
    if let Some(outcome) = &state.merged {
        ui.label(format!(
            "{} sources, {} records",
            outcome.sources,
            outcome.table.len()
        ));
        if let Some(index) = &outcome.class_index {
            ui.label(format!("{} classes indexed", index.len()));
        }
    }

    if step_button(ui, "💾 Save Merged CSV") {
        match save_csv("Save Merged Data", "merged.csv") {
            Some(path) => state.save_merged(&path),
            None => log::debug!("Save cancelled"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bottom bar – last notice
// ---------------------------------------------------------------------------

pub fn status_bar(ui: &mut Ui, state: &AppState) {
    let Some(notice) = &state.notice else {
        ui.label("Ready.");
        return;
    };
    let color = match notice.level {
        NoticeLevel::Info => Color32::LIGHT_GREEN,
        NoticeLevel::Warning => Color32::YELLOW,
        NoticeLevel::NotReady => Color32::LIGHT_BLUE,
        NoticeLevel::Error => Color32::RED,
    };
    ui.label(RichText::new(&notice.text).color(color));
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn step_button(ui: &mut Ui, text: &str) -> bool {
    let clicked = ui
        .add_sized(BUTTON_SIZE, egui::Button::new(RichText::new(text).strong()))
        .clicked();
    ui.add_space(4.0);
    clicked
}

fn pick_csv(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV Files", &["csv"])
        .pick_file()
}

fn save_csv(title: &str, default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .set_file_name(default_name)
        .add_filter("CSV Files", &["csv"])
        .save_file()
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
