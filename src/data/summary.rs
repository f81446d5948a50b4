use std::collections::BTreeMap;

use super::model::{CellValue, OrderTable};

// ---------------------------------------------------------------------------
// Status tallies
// ---------------------------------------------------------------------------

/// Occurrence counts of the distinct values of one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTally {
    /// Distinct non-missing value → number of rows holding it.
    pub counts: BTreeMap<CellValue, usize>,
    /// Rows whose value was missing; not part of `counts`.
    pub missing: usize,
}

impl StatusTally {
    /// Sum of all counts (rows with a value).
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries by descending count; ties keep value order.
    pub fn by_count(&self) -> Vec<(&CellValue, usize)> {
        let mut entries: Vec<(&CellValue, usize)> =
            self.counts.iter().map(|(v, &n)| (v, n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// Column name → tally for that column.
pub type Summary = BTreeMap<String, StatusTally>;

/// Tally each of `columns` over `table`.
///
/// A column missing from the table yields an empty tally, so the same column
/// list works for both sheet variants.
pub fn summarize<S: AsRef<str>>(table: &OrderTable, columns: &[S]) -> Summary {
    columns
        .iter()
        .map(|col| {
            let col = col.as_ref();
            (col.to_string(), tally(table, col))
        })
        .collect()
}

fn tally(table: &OrderTable, column: &str) -> StatusTally {
    let mut result = StatusTally::default();
    for value in table.column_values(column) {
        if value.is_null() {
            result.missing += 1;
        } else {
            *result.counts.entry(value.clone()).or_insert(0) += 1;
        }
    }
    result
}

/// Sum of the numeric cells of `column`, or `None` if the table lacks it.
pub fn quantity_total(table: &OrderTable, column: &str) -> Option<f64> {
    if !table.has_column(column) {
        return None;
    }
    Some(table.column_values(column).filter_map(CellValue::as_f64).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{
        OrderRecord, CLIENT_ID, MRN_CREATED, PICK_UP_STATUS, QUANTITY_CONFIRMED, QUANTITY_SENT,
        TRANSFER_ACTIVATED,
    };

    fn orders() -> OrderTable {
        let rows = [
            ["A", "Done", "Yes", "10"],
            ["B", "Not Done", "", "4"],
            ["A", "Done", "No", "pending"],
            ["C", "", "Yes", "2.5"],
        ];
        OrderTable::new(
            vec![
                CLIENT_ID.to_string(),
                PICK_UP_STATUS.to_string(),
                TRANSFER_ACTIVATED.to_string(),
                QUANTITY_SENT.to_string(),
            ],
            rows.iter()
                .map(|r| OrderRecord::new(r.iter().map(|s| CellValue::from_text(s)).collect()))
                .collect(),
        )
    }

    #[test]
    fn missing_values_are_left_out_of_every_bucket() {
        let table = orders();
        let summary = summarize(&table, &[TRANSFER_ACTIVATED]);
        let tally = &summary[TRANSFER_ACTIVATED];
        assert_eq!(tally.counts[&CellValue::from("Yes")], 2);
        assert_eq!(tally.counts[&CellValue::from("No")], 1);
        assert_eq!(tally.total(), table.len() - 1);
        assert_eq!(tally.missing, 1);
    }

    #[test]
    fn spreadsheet_na_markers_count_as_missing() {
        let sheet = "CLIENT ID,Transfer Activated (Yes / No),Quantity Sent\n\
                     A,Yes,3\nB,NaN,NaN\nC,#N/A,2\nD,N/A,\nE,,1\n";
        let table = crate::data::loader::read_csv(sheet.as_bytes()).unwrap();
        let summary = summarize(&table, &[TRANSFER_ACTIVATED]);
        let tally = &summary[TRANSFER_ACTIVATED];
        assert_eq!(tally.counts.len(), 1);
        assert_eq!(tally.counts[&CellValue::from("Yes")], 1);
        assert_eq!(tally.missing, 4);
        assert_eq!(quantity_total(&table, QUANTITY_SENT), Some(6.0));
    }

    #[test]
    fn counts_sum_to_non_missing_values() {
        let table = orders();
        let columns = [CLIENT_ID, PICK_UP_STATUS, TRANSFER_ACTIVATED];
        let summary = summarize(&table, &columns);
        for col in columns {
            let present = table.column_values(col).filter(|v| !v.is_null()).count();
            assert_eq!(summary[col].total(), present, "{col}");
            assert!(summary[col].total() <= table.len());
        }
    }

    #[test]
    fn absent_column_gives_empty_tally() {
        let table = orders();
        let summary = summarize(&table, &[MRN_CREATED.to_string()]);
        assert!(summary[MRN_CREATED].is_empty());
        assert_eq!(summary[MRN_CREATED].missing, 0);
    }

    #[test]
    fn empty_table_gives_empty_tallies() {
        let table = OrderTable::new(vec![PICK_UP_STATUS.to_string()], Vec::new());
        let summary = summarize(&table, &[PICK_UP_STATUS]);
        assert_eq!(summary[PICK_UP_STATUS], StatusTally::default());
    }

    #[test]
    fn by_count_orders_most_frequent_first() {
        let table = orders();
        let summary = summarize(&table, &[CLIENT_ID]);
        let entries = summary[CLIENT_ID].by_count();
        assert_eq!(entries[0], (&CellValue::from("A"), 2));
        assert_eq!(entries[1], (&CellValue::from("B"), 1));
        assert_eq!(entries[2], (&CellValue::from("C"), 1));
    }

    #[test]
    fn quantity_total_skips_non_numeric_cells() {
        let table = orders();
        assert_eq!(quantity_total(&table, QUANTITY_SENT), Some(16.5));
        assert_eq!(quantity_total(&table, QUANTITY_CONFIRMED), None);
    }
}
