use eframe::egui;

use crate::config::CurateConfig;
use crate::state::AppState;
use crate::ui::{panels, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CuratorApp {
    pub state: AppState,
}

impl CuratorApp {
    pub fn new(config: CurateConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for CuratorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Bottom panel: last notice ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Left side panel: filter steps ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::filter_panel(ui, &mut self.state);
            });

        // ---- Right side panel: merge steps ----
        egui::SidePanel::right("merge_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::merge_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                preview::preview(ui, &self.state);
            });
        });
    }
}
