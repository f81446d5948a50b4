use super::model::OrderTable;

/// Suggested file name for the download.
pub const EXPORT_FILE_NAME: &str = "luxvers_filtered_orders.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// Serializing the table to CSV failed.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("writing CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("flushing CSV output: {0}")]
    Flush(String),
}

/// Serialize `table` as UTF-8 CSV: header row, then one line per order.
/// Missing cells become empty fields.
pub fn export_csv(table: &OrderTable) -> Result<Vec<u8>, EncodingError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.values.iter().map(|v| v.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| EncodingError::Flush(e.error().to_string()))
}
