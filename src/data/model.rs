use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Known columns of the order-tracking sheet
// ---------------------------------------------------------------------------

pub const CLIENT_ID: &str = "CLIENT ID";
pub const PICK_UP_STATUS: &str = "Pick Up Status (Done / Not Done)";
pub const TRANSFER_ACTIVATED: &str = "Transfer Activated (Yes / No)";
pub const DOCUMENTS_CREATED: &str = "Documents Created (Invoice and Packing List)";
pub const PAYMENT_RECEIVED: &str = "Payment Received (Yes / No)";
pub const MRN_CREATED: &str = "MRN Created (Yes / No)";

/// Only present in the extended variant of the sheet.
pub const QUANTITY_SENT: &str = "Quantity Sent";
pub const QUANTITY_CONFIRMED: &str = "Quantity Confirmed";

/// Spreadsheet exports spell missing cells in many ways; these are the
/// pandas `read_csv` defaults.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Only text with a decimal point, an exponent, or an infinity token is
/// parsed as a float.
fn looks_fractional(s: &str) -> bool {
    let unsigned = s.trim_start_matches(|c: char| c == '+' || c == '-').to_ascii_lowercase();
    unsigned == "inf" || unsigned == "infinity" || s.contains(|c: char| matches!(c, '.' | 'e' | 'E'))
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the order table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a spreadsheet export
/// ends up with. Used as a key in `BTreeMap` / `BTreeSet` downstream, so it
/// must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Missing cell (empty CSV field, JSON `null`, Arrow null).
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Debug keeps the fractional part (`3.0`), so the text re-parses
            // as a float and not as an integer.
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Type a raw text field the way the CSV reader does.
    ///
    /// Integers are only recognised in canonical form so identifiers such as
    /// `"007"` keep their leading zeros. Digit strings too long for `i64`
    /// stay text instead of losing precision as floats.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() || NA_TOKENS.contains(&s) {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            if i.to_string() == s {
                return CellValue::Integer(i);
            }
            return CellValue::String(s.to_string());
        }
        if looks_fractional(s) {
            if let Ok(f) = s.parse::<f64>() {
                return CellValue::Float(f);
            }
        }
        match s {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Try to interpret the value as an `f64` for quantity totals.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Label used by the UI; missing cells show up explicitly.
    pub fn label(&self) -> String {
        match self {
            CellValue::Null => "<missing>".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

static MISSING: CellValue = CellValue::Null;

// ---------------------------------------------------------------------------
// OrderRecord – one row of the sheet
// ---------------------------------------------------------------------------

/// One order (a row of the source table). `values[i]` belongs to
/// `OrderTable::columns[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub values: Vec<CellValue>,
}

impl OrderRecord {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, column_idx: usize) -> &CellValue {
        self.values.get(column_idx).unwrap_or(&MISSING)
    }
}

// ---------------------------------------------------------------------------
// OrderTable – the complete loaded sheet
// ---------------------------------------------------------------------------

/// Rows sharing one column schema. Row order is display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTable {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// All orders (rows).
    pub rows: Vec<OrderRecord>,
}

impl OrderTable {
    pub fn new(columns: Vec<String>, rows: Vec<OrderRecord>) -> Self {
        debug_assert!(rows.iter().all(|r| r.values.len() == columns.len()));
        Self { columns, rows }
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Iterate over one column's values; empty if the column is absent.
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a CellValue> + 'a {
        let idx = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| idx.map(|i| row.get(i)))
    }

    /// Sorted set of non-missing values in a column.
    pub fn distinct_values(&self, column: &str) -> BTreeSet<CellValue> {
        self.column_values(column)
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// Copy of the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> OrderTable {
        OrderTable {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}
