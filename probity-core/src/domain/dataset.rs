// probity-core/src/domain/dataset.rs

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::domain::error::DomainError;

/// Name of the single column carried by text-derived datasets.
pub const TEXT_COLUMN: &str = "text";

// ── Cell values ──────────────────────────────────────────────────────

/// A scalar cell. `Float(NaN)` is treated as missing, like `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Character count of the rendered value, `None` when missing.
    pub fn char_len(&self) -> Option<usize> {
        match self {
            _ if self.is_missing() => None,
            Self::Text(s) => Some(s.chars().count()),
            other => Some(other.to_string().chars().count()),
        }
    }

    fn key(&self) -> CellKey {
        match self {
            _ if self.is_missing() => CellKey::Missing,
            Self::Bool(b) => CellKey::Bool(*b),
            Self::Text(s) => CellKey::Text(s.clone()),
            // Int(1) and Float(1.0) compare equal, -0.0 folds into 0.0
            other => {
                let n = other.as_f64().unwrap_or_default();
                CellKey::Number(if n == 0.0 { 0 } else { n.to_bits() })
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Hashable projection of a cell, used for duplicate-row detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Missing,
    Bool(bool),
    Number(u64),
    Text(String),
}

// ── Column typing ────────────────────────────────────────────────────

/// Inferred storage type of a column, named like the dtypes data tools print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int64,
    Float64,
    Bool,
    Object,
}

impl ColumnType {
    /// Integers with a missing value widen to `float64`. A column holding only
    /// `Null` is `object`, one holding only NaN floats is `float64`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let (mut ints, mut floats, mut bools, mut texts) = (0usize, 0usize, 0usize, 0usize);
        let (mut nulls, mut nans) = (0usize, 0usize);

        for value in values {
            match value {
                Value::Null => nulls += 1,
                Value::Float(f) if f.is_nan() => nans += 1,
                Value::Float(_) => floats += 1,
                Value::Int(_) => ints += 1,
                Value::Bool(_) => bools += 1,
                Value::Text(_) => texts += 1,
            }
        }

        let missing = nulls + nans;
        if texts > 0 {
            return Self::Object;
        }
        if bools > 0 {
            return if ints + floats + missing == 0 {
                Self::Bool
            } else {
                Self::Object
            };
        }
        if floats > 0 || (ints > 0 && missing > 0) {
            return Self::Float64;
        }
        if ints > 0 {
            return Self::Int64;
        }
        if nans > 0 { Self::Float64 } else { Self::Object }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Data kind ────────────────────────────────────────────────────────

/// Structured (tabular) vs unstructured (one `text` column of lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Structured,
    Unstructured,
}

impl DataKind {
    /// Shape-only classification: exactly one column, named exactly `text`.
    pub fn classify(dataset: &Dataset) -> Self {
        match dataset.columns() {
            [only] if only == TEXT_COLUMN => Self::Unstructured,
            _ => Self::Structured,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Unstructured => "unstructured",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "structured" => Ok(Self::Structured),
            "unstructured" => Ok(Self::Unstructured),
            _ => Err(format!("Unknown data type: {}", s)),
        }
    }
}

// ── Ordered per-column mapping ───────────────────────────────────────

/// Column name -> value, in dataset column order. Serializes as a map.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<T>(Vec<(String, T)>);

impl<T> ColumnMap<T> {
    pub fn get(&self, column: &str) -> Option<&T> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for ColumnMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> FromIterator<(String, T)> for ColumnMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for ColumnMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ── Dataset ──────────────────────────────────────────────────────────

/// Ordered columns and ordered rows of scalar cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Builds a dataset column by column. All columns must have the same
    /// length and distinct names.
    pub fn from_columns<K: Into<String>>(
        columns: Vec<(K, Vec<Value>)>,
    ) -> Result<Self, DomainError> {
        let columns: Vec<(String, Vec<Value>)> =
            columns.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let mut seen = HashSet::new();
        for (name, _) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(DomainError::MalformedDataset(format!(
                    "duplicate column '{}'",
                    name
                )));
            }
        }

        let height = columns.first().map_or(0, |(_, values)| values.len());
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != height) {
            return Err(DomainError::MalformedDataset(format!(
                "column '{}' has {} values, expected {}",
                name,
                values.len(),
                height
            )));
        }

        let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
        let mut rows = vec![Vec::with_capacity(names.len()); height];
        for (_, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
        }

        Ok(Self {
            columns: names,
            rows,
        })
    }

    /// Builds a dataset from key/value records. Columns follow the order in
    /// which keys first appear; absent keys become `Null`.
    pub fn from_records<I, R, K>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut sparse: Vec<Vec<(usize, Value)>> = Vec::new();

        for record in records {
            let mut cells = Vec::new();
            for (key, value) in record {
                let key = key.into();
                let pos = match index.get(&key) {
                    Some(pos) => *pos,
                    None => {
                        columns.push(key.clone());
                        index.insert(key, columns.len() - 1);
                        columns.len() - 1
                    }
                };
                cells.push((pos, value));
            }
            sparse.push(cells);
        }

        let rows = sparse
            .into_iter()
            .map(|cells| {
                let mut row = vec![Value::Null; columns.len()];
                for (pos, value) in cells {
                    row[pos] = value;
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Builds an unstructured dataset: one `text` column, one row per line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let rows = lines
            .into_iter()
            .map(|line| vec![line.map_or(Value::Null, |s| Value::Text(s.into()))])
            .collect();

        Self {
            columns: vec![TEXT_COLUMN.to_string()],
            rows,
        }
    }

    /// Splits decoded text on line boundaries into an unstructured dataset.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines().map(Some))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn kind(&self) -> DataKind {
        DataKind::classify(self)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    pub fn column_type(&self, idx: usize) -> ColumnType {
        ColumnType::infer(self.column(idx))
    }

    /// Names of the `int64`/`float64` columns, in column order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        (0..self.columns.len())
            .filter(|&idx| self.column_type(idx).is_numeric())
            .map(|idx| self.columns[idx].as_str())
            .collect()
    }

    /// Non-missing values of a column as floats; non-numeric cells are skipped.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.column(idx).filter_map(Value::as_f64).collect()
    }

    pub fn missing_count(&self, idx: usize) -> usize {
        self.column(idx).filter(|v| v.is_missing()).count()
    }

    /// Rows identical to an earlier row (the first occurrence is not counted).
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .filter(|row| !seen.insert(row.iter().map(Value::key).collect::<Vec<_>>()))
            .count()
    }
}
