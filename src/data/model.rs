use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the source file's content.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, ""),
        }
    }
}

impl Value {
    /// Try to interpret the cell as an `f64` for statistics and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed column
// ---------------------------------------------------------------------------

/// Semantic column type inferred from cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-null cell is an integer or float.
    Numeric,
    /// Every non-null cell is text.
    Text,
    /// Mixed, boolean, or entirely null.
    Other,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Other => write!(f, "other"),
        }
    }
}

/// A named column with its inferred kind and cell values.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    /// Build a column, inferring its kind from the cells.
    pub fn new(name: String, values: Vec<Value>) -> Self {
        let kind = infer_kind(&values);
        Column { name, kind, values }
    }

    /// Cell values as `f64`, with `NaN` standing in for nulls and non-numbers.
    pub fn as_f64_lossy(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect()
    }

    /// Sorted set of unique values (used for categorical coloring).
    pub fn unique_values(&self) -> BTreeSet<Value> {
        self.values.iter().cloned().collect()
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// Infer a column's kind: all non-null cells numeric → Numeric, all text →
/// Text, anything else (mixed, boolean, empty) → Other.
fn infer_kind(values: &[Value]) -> ColumnKind {
    let mut seen_any = false;
    let mut all_numeric = true;
    let mut all_text = true;
    for v in values {
        match v {
            Value::Null => continue,
            Value::Integer(_) | Value::Float(_) => all_text = false,
            Value::Text(_) => all_numeric = false,
            Value::Bool(_) => {
                all_numeric = false;
                all_text = false;
            }
        }
        seen_any = true;
    }
    match (seen_any, all_numeric, all_text) {
        (false, _, _) => ColumnKind::Other,
        (true, true, _) => ColumnKind::Numeric,
        (true, _, true) => ColumnKind::Text,
        _ => ColumnKind::Other,
    }
}

// ---------------------------------------------------------------------------
// Table – ordered columns of equal length
// ---------------------------------------------------------------------------

/// One parsed table: ordered columns, unique names, fixed row count.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns. All columns must share the same length
    /// and carry unique names; the loader guarantees both.
    pub fn new(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        debug_assert!(columns.iter().all(|c| c.values.len() == n_rows));
        Table { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric columns in declared order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TableCollection – the complete loaded file
// ---------------------------------------------------------------------------

/// Sheet name used for sources that carry a single implicit table (CSV).
pub const DEFAULT_SHEET: &str = "default";

/// All tables parsed from one upload, keyed by sheet name in workbook
/// order. Always at least one entry; a CSV collapses to a single entry so
/// downstream code has one code path.
#[derive(Debug, Clone)]
pub struct TableCollection {
    sheets: Vec<(String, Table)>,
}

impl TableCollection {
    /// Collection for a single-table source under [`DEFAULT_SHEET`].
    pub fn single(table: Table) -> Self {
        TableCollection {
            sheets: vec![(DEFAULT_SHEET.to_string(), table)],
        }
    }

    /// Collection from named sheets, preserving the given order.
    /// Sheet names must be non-empty and unique; the loader guarantees both.
    pub fn from_sheets(sheets: Vec<(String, Table)>) -> Self {
        debug_assert!(!sheets.is_empty());
        debug_assert!(sheets.iter().all(|(n, _)| !n.is_empty()));
        TableCollection { sheets }
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// The first (often only) table.
    pub fn first(&self) -> &Table {
        &self.sheets[0].1
    }
}

// ---------------------------------------------------------------------------
// Insight – one derived statistical finding
// ---------------------------------------------------------------------------

/// Raw numeric evidence behind an [`Insight`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    Correlation {
        left: String,
        right: String,
        coefficient: f64,
    },
    Variability {
        column: String,
        std_dev: f64,
    },
    Range {
        column: String,
        min: f64,
        max: f64,
    },
}

/// A human-readable statistical finding plus its supporting numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub summary: String,
    pub evidence: Evidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, values: Vec<Value>) -> Column {
        Column::new(name.to_string(), values)
    }

    #[test]
    fn kind_inference() {
        let numeric = col("a", vec![Value::Integer(1), Value::Float(2.5), Value::Null]);
        assert_eq!(numeric.kind, ColumnKind::Numeric);

        let text = col("b", vec![Value::Text("x".into()), Value::Null]);
        assert_eq!(text.kind, ColumnKind::Text);

        let mixed = col("c", vec![Value::Text("x".into()), Value::Integer(1)]);
        assert_eq!(mixed.kind, ColumnKind::Other);

        let empty = col("d", vec![Value::Null, Value::Null]);
        assert_eq!(empty.kind, ColumnKind::Other);

        let boolean = col("e", vec![Value::Bool(true)]);
        assert_eq!(boolean.kind, ColumnKind::Other);
    }

    #[test]
    fn lossy_f64_conversion() {
        let c = col("a", vec![Value::Integer(2), Value::Null, Value::Float(0.5)]);
        let xs = c.as_f64_lossy();
        assert_eq!(xs[0], 2.0);
        assert!(xs[1].is_nan());
        assert_eq!(xs[2], 0.5);
    }

    #[test]
    fn collection_single_collapses_to_default_sheet() {
        let t = Table::new(vec![col("a", vec![Value::Integer(1)])]);
        let coll = TableCollection::single(t);
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.sheet_names(), vec![DEFAULT_SHEET]);
        assert_eq!(coll.first().n_rows(), 1);
    }

    #[test]
    fn numeric_columns_preserve_declared_order() {
        let t = Table::new(vec![
            col("name", vec![Value::Text("x".into())]),
            col("b", vec![Value::Integer(1)]),
            col("a", vec![Value::Float(2.0)]),
        ]);
        let names: Vec<&str> = t.numeric_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
