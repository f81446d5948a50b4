use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::EXPORT_MIME;
use crate::data::loader::DataSource;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one multiselect per configured column.
/// An empty selection means the column is not filtered.
pub fn side_panel(ui: &mut Ui, session: &mut Session) {
    ui.heading("Filter Orders");
    ui.separator();

    if session.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    if ui.button("Clear all filters").clicked() {
        session.clear_all();
    }
    ui.separator();

    // Clone what we need so we can mutate the session inside the loop.
    let columns = session.config.filter_columns.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let all_values = session.filter_options(col);
                if all_values.is_empty() {
                    ui.weak(format!("{col}: no values in this sheet"));
                    continue;
                }
                let selected = session.criteria.get(col).cloned().unwrap_or_default();

                let header_text = if selected.is_empty() {
                    format!("{col}  (all {})", all_values.len())
                } else {
                    format!("{col}  ({}/{})", selected.len(), all_values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("Clear").clicked() {
                            session.clear_column(col);
                        }
                        for val in &all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.label()).changed() {
                                session.toggle_value(col, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. `url_input` backs the remote source field.
pub fn top_bar(ui: &mut Ui, session: &mut Session, url_input: &mut String) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(session);
                ui.close_menu();
            }
            let loaded = session.table.is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Download filtered orders…"))
                .clicked()
            {
                save_export_dialog(session);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("URL:");
        ui.add(egui::TextEdit::singleline(url_input).desired_width(260.0));
        if ui
            .add_enabled(!url_input.trim().is_empty(), egui::Button::new("Load"))
            .clicked()
        {
            // Failures end up in status_message.
            let _ = session.open(DataSource::parse(url_input));
        }
        if ui
            .add_enabled(session.source.is_some(), egui::Button::new("Reload"))
            .clicked()
        {
            let _ = session.reload();
        }

        ui.separator();

        if let Some(table) = &session.table {
            ui.label(format!(
                "{} orders loaded, {} visible",
                table.len(),
                session.view.filtered.len()
            ));
        }

        if let Some(msg) = &session.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(session: &mut Session) {
    let file = rfd::FileDialog::new()
        .set_title("Open order tracking data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let _ = session.open(DataSource::File(path));
    }
}

pub fn save_export_dialog(session: &mut Session) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered orders")
        .set_file_name(&session.config.export_file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    let written = session
        .export()
        .map_err(|e| e.to_string())
        .and_then(|bytes| std::fs::write(&path, bytes).map_err(|e| e.to_string()));
    match written {
        Ok(()) => {
            log::info!(
                "Exported {} orders to {} ({EXPORT_MIME})",
                session.view.filtered.len(),
                path.display()
            );
            session.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to export to {}: {e}", path.display());
            session.status_message = Some(format!("Error: {e}"));
        }
    }
}
