use std::collections::BTreeSet;

use crate::config::DashboardConfig;
use crate::data::export::{export_csv, EncodingError};
use crate::data::filter::{criteria_for_table, filter, FilterCriteria, SchemaError};
use crate::data::loader::{self, DataSource, LoadError};
use crate::data::model::{CellValue, OrderTable};
use crate::data::summary::{quantity_total, summarize, Summary};

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// Everything the UI shows for one table + criteria pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub filtered: OrderTable,
    pub tallies: Summary,
    /// (column, total) for the quantity columns the table has.
    pub quantity_totals: Vec<(String, f64)>,
}

/// Filter `table` by `criteria`, then tally and total the result.
pub fn render<S: AsRef<str>>(
    table: &OrderTable,
    criteria: &FilterCriteria,
    status_columns: &[S],
    quantity_columns: &[S],
) -> Result<DashboardView, SchemaError> {
    let filtered = filter(table, criteria)?;
    let tallies = summarize(&filtered, status_columns);
    let quantity_totals = quantity_columns
        .iter()
        .filter_map(|col| {
            let col = col.as_ref();
            quantity_total(&filtered, col).map(|total| (col.to_string(), total))
        })
        .collect();
    Ok(DashboardView {
        filtered,
        tallies,
        quantity_totals,
    })
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One user's dashboard state, independent of rendering.
pub struct Session {
    pub config: DashboardConfig,

    /// Where `table` was loaded from.
    pub source: Option<DataSource>,

    /// Raw table (None until a source loads). Replaced wholesale on reload.
    pub table: Option<OrderTable>,

    /// Per-column accepted values.
    pub criteria: FilterCriteria,

    /// Filtered rows and tallies for the current criteria (cached).
    pub view: DashboardView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            source: None,
            table: None,
            criteria: FilterCriteria::new(),
            view: DashboardView::default(),
            status_message: None,
        }
    }

    /// Load `source` as a fresh table and reset the criteria.
    ///
    /// On failure the previous table, criteria and view are kept.
    pub fn open(&mut self, source: DataSource) -> Result<(), LoadError> {
        match loader::load(&source) {
            Ok(table) => {
                log::info!(
                    "Loaded {} orders with columns {:?} from {source}",
                    table.len(),
                    table.columns
                );
                self.criteria = FilterCriteria::new();
                self.install(source, table);
                Ok(())
            }
            Err(e) => Err(self.report_load_error(e)),
        }
    }

    /// Fetch the current source again, keeping the accepted values that
    /// still occur. On failure the previous table stays visible.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        match loader::reload(&source) {
            Ok(table) => {
                log::info!("Reloaded {} orders from {source}", table.len());
                let kept = criteria_for_table(&self.criteria, &table);
                if kept != self.criteria {
                    log::warn!("Dropped filter values missing after reload");
                }
                self.criteria = kept;
                self.install(source, table);
                Ok(())
            }
            Err(e) => Err(self.report_load_error(e)),
        }
    }

    fn install(&mut self, source: DataSource, table: OrderTable) {
        self.source = Some(source);
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    fn report_load_error(&mut self, e: LoadError) -> LoadError {
        log::error!("{e}");
        self.status_message = Some(format!("Error: {e}"));
        e
    }

    /// Recompute the view after a criteria change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        match render(
            table,
            &self.criteria,
            &self.config.status_columns,
            &self.config.quantity_columns,
        ) {
            Ok(view) => {
                log::debug!("{} of {} orders visible", view.filtered.len(), table.len());
                self.view = view;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Filter rejected: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Filterable values of `column` in the raw table.
    pub fn filter_options(&self, column: &str) -> BTreeSet<CellValue> {
        self.table
            .as_ref()
            .map(|t| t.distinct_values(column))
            .unwrap_or_default()
    }

    /// Accept or stop accepting a single value in a column's criterion.
    pub fn toggle_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.criteria.entry(column.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Remove the restriction on one column.
    pub fn clear_column(&mut self, column: &str) {
        self.criteria.remove(column);
        self.refilter();
    }

    /// Remove all restrictions.
    pub fn clear_all(&mut self) {
        self.criteria.clear();
        self.refilter();
    }

    /// CSV bytes of the currently visible orders.
    pub fn export(&self) -> Result<Vec<u8>, EncodingError> {
        export_csv(&self.view.filtered)
    }
}
