use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Observation, Table, REQUIRED_FIELDS};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Central panel – preview of the latest artifact
// ---------------------------------------------------------------------------

/// Show whichever output the user produced last: merge, filter, or the
/// cleaned source.
pub fn preview(ui: &mut Ui, state: &AppState) {
    if let Some(outcome) = &state.merged {
        ui.strong("Merged table");
        table_grid(ui, "merged", &outcome.table);
    } else if let Some(outcome) = &state.filtered {
        ui.strong(format!("Labeled ({})", outcome.labeled.len()));
        observation_grid(ui, "labeled", &outcome.labeled);
        ui.separator();
        ui.strong(format!("Unlabeled ({})", outcome.unlabeled.len()));
        observation_grid(ui, "unlabeled", &outcome.unlabeled);
    } else if let Some(table) = &state.cleaned {
        ui.strong("Cleaned table");
        table_grid(ui, "cleaned", table);
    } else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a CSV to filter it, or merge several exports.");
        });
    }
}

fn table_grid(ui: &mut Ui, id: &str, table: &Table) {
    let headers: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    grid(ui, id, &headers, table.len(), |row, col| {
        table.rows()[row][col].to_field().to_string()
    });
}

fn observation_grid(ui: &mut Ui, id: &str, observations: &[Observation]) {
    grid(ui, id, &REQUIRED_FIELDS, observations.len(), |row, col| {
        observations[row].fields()[col].to_string()
    });
}

fn grid(
    ui: &mut Ui,
    id: &str,
    headers: &[&str],
    rows: usize,
    cell: impl Fn(usize, usize) -> String,
) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(240.0)
            .columns(Column::auto().at_least(60.0).resizable(true), headers.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for name in headers {
                    header.col(|ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows, |mut row| {
                    let r = row.index();
                    for c in 0..headers.len() {
                        row.col(|ui| {
                            ui.label(cell(r, c));
                        });
                    }
                });
            });
    });
}
