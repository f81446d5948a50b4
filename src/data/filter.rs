use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, OrderTable};

// ---------------------------------------------------------------------------
// Filter criteria: which values are accepted per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of accepted values.
/// If a column is absent or its set is empty, it means "no filter" (show all).
pub type FilterCriteria = BTreeMap<String, BTreeSet<CellValue>>;

/// Criteria referencing a column the table does not have.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown column '{column}' (available: {})", available.join(", "))]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },
}

/// Return indices of orders that pass all active criteria, in source order.
///
/// An order passes a column criterion when:
/// * The column is not present in `criteria` → passes (no constraint)
/// * The accepted set for that column is empty → passes (no constraint)
/// * The order's value for that column is in the accepted set → passes
///
/// A missing value never satisfies an active criterion.
pub fn filtered_indices(
    table: &OrderTable,
    criteria: &FilterCriteria,
) -> Result<Vec<usize>, SchemaError> {
    // Resolve active criteria to column positions up front.
    let mut active = Vec::new();
    for (col, accepted) in criteria {
        if accepted.is_empty() {
            continue;
        }
        let idx = table
            .column_index(col)
            .ok_or_else(|| SchemaError::UnknownColumn {
                column: col.clone(),
                available: table.columns.clone(),
            })?;
        active.push((idx, accepted));
    }

    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active.iter().all(|(idx, accepted)| {
                let value = row.get(*idx);
                !value.is_null() && accepted.contains(value)
            })
        })
        .map(|(i, _)| i)
        .collect())
}

/// Copy of the orders in `table` that satisfy `criteria`.
pub fn filter(table: &OrderTable, criteria: &FilterCriteria) -> Result<OrderTable, SchemaError> {
    let indices = filtered_indices(table, criteria)?;
    Ok(table.select(&indices))
}

/// Restrict `criteria` to what `table` still has: accepted values that no
/// longer occur are dropped, and so is a column left with none (or missing
/// from the table).
pub fn criteria_for_table(criteria: &FilterCriteria, table: &OrderTable) -> FilterCriteria {
    criteria
        .iter()
        .filter(|(col, _)| table.has_column(col))
        .filter_map(|(col, accepted)| {
            let present = table.distinct_values(col);
            let kept: BTreeSet<CellValue> = accepted.intersection(&present).cloned().collect();
            (!kept.is_empty()).then(|| (col.clone(), kept))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{
        OrderRecord, CLIENT_ID, PICK_UP_STATUS, TRANSFER_ACTIVATED,
    };

    fn cell(s: &str) -> CellValue {
        CellValue::from_text(s)
    }

    fn orders() -> OrderTable {
        let rows = [
            ["A", "Done", "Yes"],
            ["B", "Not Done", "No"],
            ["A", "Not Done", ""],
            ["", "Done", "Yes"],
            ["B", "Done", "Yes"],
        ];
        OrderTable::new(
            vec![
                CLIENT_ID.to_string(),
                PICK_UP_STATUS.to_string(),
                TRANSFER_ACTIVATED.to_string(),
            ],
            rows.iter()
                .map(|r| OrderRecord::new(r.iter().map(|s| cell(s)).collect()))
                .collect(),
        )
    }

    fn accept(column: &str, values: &[&str]) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        criteria.insert(column.to_string(), values.iter().map(|v| cell(v)).collect());
        criteria
    }

    #[test]
    fn empty_criteria_keep_everything_in_order() {
        let table = orders();
        assert_eq!(filter(&table, &FilterCriteria::new()).unwrap(), table);
    }

    #[test]
    fn empty_selection_is_no_restriction() {
        let table = orders();
        let criteria = accept(PICK_UP_STATUS, &[]);
        assert_eq!(filtered_indices(&table, &criteria).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn restricting_client_id_keeps_only_matching_rows() {
        let table = orders();
        let filtered = filter(&table, &accept(CLIENT_ID, &["A"])).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.column_values(CLIENT_ID).all(|v| *v == cell("A")));
    }

    #[test]
    fn selecting_all_observed_values_matches_unrestricted() {
        let table = orders();
        let mut criteria = accept(PICK_UP_STATUS, &["Done", "Not Done"]);
        assert_eq!(filter(&table, &criteria).unwrap(), table);

        criteria.insert(CLIENT_ID.to_string(), [cell("B")].into_iter().collect());
        let without = filter(&table, &accept(CLIENT_ID, &["B"])).unwrap();
        assert_eq!(filter(&table, &criteria).unwrap(), without);
    }

    #[test]
    fn missing_values_fail_active_criteria() {
        let table = orders();
        let mut criteria = accept(TRANSFER_ACTIVATED, &["Yes", "No"]);
        assert_eq!(filtered_indices(&table, &criteria).unwrap(), vec![0, 1, 3, 4]);

        // Even an explicit Null does not match a missing cell.
        criteria
            .get_mut(TRANSFER_ACTIVATED)
            .unwrap()
            .insert(CellValue::Null);
        assert_eq!(filtered_indices(&table, &criteria).unwrap(), vec![0, 1, 3, 4]);
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let table = orders();
        let mut criteria = accept(CLIENT_ID, &["A", "B"]);
        criteria.extend(accept(PICK_UP_STATUS, &["Done"]));
        criteria.extend(accept(TRANSFER_ACTIVATED, &["Yes"]));
        assert_eq!(filtered_indices(&table, &criteria).unwrap(), vec![0, 4]);
    }

    #[test]
    fn filtering_is_sound_and_complete() {
        let table = orders();
        let mut criteria = accept(CLIENT_ID, &["B", "A"]);
        criteria.extend(accept(TRANSFER_ACTIVATED, &["Yes"]));
        let kept = filtered_indices(&table, &criteria).unwrap();

        for (i, row) in table.rows.iter().enumerate() {
            let satisfies = criteria.iter().all(|(col, accepted)| {
                let v = row.get(table.column_index(col).unwrap());
                !v.is_null() && accepted.contains(v)
            });
            assert_eq!(kept.contains(&i), satisfies, "row {i}");
        }
    }

    #[test]
    fn unknown_column_is_schema_error() {
        let table = orders();
        let err = filter(&table, &accept("CLIENT  ID", &["A"])).unwrap_err();
        match err {
            SchemaError::UnknownColumn { column, available } => {
                assert_eq!(column, "CLIENT  ID");
                assert_eq!(available, table.columns);
            }
        }
    }

    #[test]
    fn unknown_column_without_selection_is_ignored() {
        let table = orders();
        assert!(filter(&table, &accept("Legacy Column", &[])).is_ok());
    }

    #[test]
    fn filtering_leaves_source_untouched() {
        let table = orders();
        let before = table.clone();
        let _ = filter(&table, &accept(CLIENT_ID, &["B"])).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn criteria_for_table_drops_vanished_values() {
        let table = orders();
        let mut criteria = accept(CLIENT_ID, &["A", "Z"]);
        criteria.extend(accept(PICK_UP_STATUS, &["Cancelled"]));
        let kept = criteria_for_table(&criteria, &table);
        assert_eq!(kept, accept(CLIENT_ID, &["A"]));
    }

    #[test]
    fn criteria_for_table_drops_vanished_columns() {
        let table = orders();
        let mut criteria = accept(CLIENT_ID, &["A"]);
        criteria.extend(accept("Quantity Sent", &["3"]));
        let kept = criteria_for_table(&criteria, &table);
        assert_eq!(kept.len(), 1);
        assert!(kept.contains_key(CLIENT_ID));
    }
}
