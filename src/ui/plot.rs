use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::ColorMap;
use crate::data::summary::StatusTally;

// ---------------------------------------------------------------------------
// Tally bar chart (status summary)
// ---------------------------------------------------------------------------

/// One bar per distinct value, most frequent first.
pub fn tally_chart(ui: &mut Ui, column: &str, tally: &StatusTally) {
    if tally.is_empty() {
        ui.weak("No values to chart.");
        return;
    }

    let colors = ColorMap::new(tally.counts.keys());
    let entries = tally.by_count();
    let labels: Vec<String> = entries.iter().map(|(v, _)| v.label()).collect();

    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (value, count))| {
            Bar::new(i as f64, *count as f64)
                .name(value.label())
                .fill(colors.color_for(value))
        })
        .collect();

    Plot::new(("tally_chart", column))
        .height(140.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_label("Count")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            // Only label the integer positions the bars sit on.
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}
