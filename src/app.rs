use eframe::egui::{self, ScrollArea, Ui};

use crate::data::loader::DataSource;
use crate::session::Session;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub session: Session,
    /// Contents of the URL field in the top bar.
    pub url_input: String,
}

impl DashboardApp {
    pub fn new(session: Session) -> Self {
        let url_input = match session.config.source.as_deref().map(DataSource::parse) {
            Some(DataSource::Url(url)) => url,
            _ => String::new(),
        };
        Self { session, url_input }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session, &mut self.url_input);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session);
            });

        // ---- Central panel: orders, summary, download ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &mut self.session);
        });
    }
}

fn dashboard(ui: &mut Ui, session: &mut Session) {
    ui.heading(&session.config.title);

    if session.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file or URL to view orders  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.add_space(6.0);
            ui.strong("Order Overview");
            table::order_table(ui, &session.view.filtered);

            ui.add_space(12.0);
            ui.strong("Order Status Summary");
            for (col, total) in &session.view.quantity_totals {
                ui.label(format!("{col}: {total}"));
            }
            for col in &session.config.status_columns {
                let Some(tally) = session.view.tallies.get(col) else {
                    continue;
                };
                ui.separator();
                ui.horizontal(|ui: &mut Ui| {
                    table::tally_grid(ui, col, tally);
                    plot::tally_chart(ui, col, tally);
                });
            }

            ui.add_space(12.0);
            // An empty result still downloads as a header-only file.
            if ui.button("Download Filtered Orders").clicked()
            {
                panels::save_export_dialog(session);
            }
        });
}
