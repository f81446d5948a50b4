use eframe::egui::{self, Grid, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::model::OrderTable;
use crate::data::summary::StatusTally;

// ---------------------------------------------------------------------------
// Order overview
// ---------------------------------------------------------------------------

/// Render the filtered orders, one line per order, columns in sheet order.
pub fn order_table(ui: &mut Ui, table: &OrderTable) {
    if table.is_empty() {
        ui.label("No orders match the current filters.");
        return;
    }

    ScrollArea::horizontal()
        .id_salt("order_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(320.0)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0).clip(true), table.columns.len())
                .header(22.0, |mut header| {
                    for col in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col);
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, table.len(), |mut row| {
                        let record = &table.rows[row.index()];
                        for value in &record.values {
                            row.col(|ui: &mut Ui| {
                                ui.label(value.to_string());
                            });
                        }
                    });
                });
        });
}

// ---------------------------------------------------------------------------
// Tally table
// ---------------------------------------------------------------------------

/// Value / count grid for one status column.
pub fn tally_grid(ui: &mut Ui, column: &str, tally: &StatusTally) {
    if tally.is_empty() {
        ui.weak("Column not present or no values.");
        return;
    }

    let colors = ColorMap::new(tally.counts.keys());
    Grid::new(("tally_grid", column))
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.strong(column);
            ui.strong("Count");
            ui.end_row();
            for (value, count) in tally.by_count() {
                ui.label(RichText::new(value.label()).color(colors.color_for(value)));
                ui.label(count.to_string());
                ui.end_row();
            }
            ui.strong("total");
            ui.strong(tally.total().to_string());
            ui.end_row();
            if tally.missing > 0 {
                ui.weak("missing");
                ui.weak(tally.missing.to_string());
                ui.end_row();
            }
        });
}
