use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a simulation table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, typed once at load time.
/// Pivot keys end up in a `BTreeSet`, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
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
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Try to interpret the value as an `f64` for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether this cell holds the given subject id.
    ///
    /// Float cells match when they are numerically equal, so `2.0` is subject 2.
    pub fn matches_id(&self, id: SubjectId) -> bool {
        match self {
            CellValue::Integer(i) => *i == id,
            CellValue::Float(v) => *v == id as f64,
            _ => false,
        }
    }
}

/// Integer key identifying one tracked entity (UE, flow).
pub type SubjectId = i64;

/// A `(time, value)` pair projected from a subject-filtered table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: f64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

// ---------------------------------------------------------------------------
// TabularDataset – one loaded simulation table
// ---------------------------------------------------------------------------

/// An ordered, header-indexed table. Immutable once loaded; filters return
/// new datasets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDataset {
    /// Column names in header order.
    pub columns: Vec<String>,
    /// Rows, each with exactly `columns.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularDataset {
    /// Build a dataset, padding short rows with `Null` so every row is
    /// as wide as the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        TabularDataset { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in the named column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of a column in row order; `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Sorted set of distinct values in a column.
    pub fn unique_values(&self, name: &str) -> BTreeSet<CellValue> {
        self.column(name)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    /// Rename a column in place. Used by schema normalization only.
    pub(crate) fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – a loaded table or the missing sentinel
// ---------------------------------------------------------------------------

/// Outcome of loading an input file. `Missing` disables every panel that
/// depends on it for the run.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Loaded(TabularDataset),
    Missing { path: PathBuf },
}

impl Dataset {
    pub fn missing(path: &Path) -> Self {
        Dataset::Missing {
            path: path.to_path_buf(),
        }
    }

    /// The table, if it was loaded.
    pub fn table(&self) -> Option<&TabularDataset> {
        match self {
            Dataset::Loaded(ds) => Some(ds),
            Dataset::Missing { .. } => None,
        }
    }

    /// The table if it was loaded and has at least one row.
    pub fn non_empty(&self) -> Option<&TabularDataset> {
        self.table().filter(|ds| !ds.is_empty())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Dataset::Missing { .. })
    }
}
