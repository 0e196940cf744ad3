// probity-core/src/domain/quality.rs

use serde::Serialize;
use tracing::debug;

use crate::domain::dataset::{ColumnMap, ColumnType, DataKind, Dataset, TEXT_COLUMN};
use crate::domain::statistics;

// ── Report Structures ────────────────────────────────────────────────

/// Quality metrics of a tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredQuality {
    pub row_count: usize,
    pub column_count: usize,
    pub missing_values: ColumnMap<usize>,
    pub duplicate_rows: usize,
    pub data_types: ColumnMap<ColumnType>,
    /// Columns with no non-missing value (every column when there are no rows)
    pub empty_columns: Vec<String>,
}

/// Quality metrics of a line-oriented text dataset. Lengths are character
/// counts of the non-missing lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextQuality {
    pub total_lines: usize,
    pub empty_lines: usize,
    pub avg_text_length: f64,
    pub min_text_length: usize,
    pub max_text_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QualityReport {
    Structured(StructuredQuality),
    Unstructured(TextQuality),
}

impl QualityReport {
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Structured(_) => DataKind::Structured,
            Self::Unstructured(_) => DataKind::Unstructured,
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredQuality> {
        match self {
            Self::Structured(q) => Some(q),
            Self::Unstructured(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextQuality> {
        match self {
            Self::Unstructured(q) => Some(q),
            Self::Structured(_) => None,
        }
    }
}

/// Classification plus the matching report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityAssessment {
    pub data_type: DataKind,
    pub quality_report: QualityReport,
}

impl QualityAssessment {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ── Profilers ────────────────────────────────────────────────────────

/// Classifies the dataset and profiles it with the matching checker.
pub fn run_data_quality_checks(dataset: &Dataset) -> QualityAssessment {
    let data_type = DataKind::classify(dataset);
    debug!(%data_type, rows = dataset.row_count(), "Profiling dataset");
    QualityAssessment {
        data_type,
        quality_report: profile(dataset, data_type),
    }
}

/// Profiles a dataset whose kind was decided upstream.
pub fn profile(dataset: &Dataset, kind: DataKind) -> QualityReport {
    match kind {
        DataKind::Structured => QualityReport::Structured(check_structured(dataset)),
        DataKind::Unstructured => QualityReport::Unstructured(check_text(dataset)),
    }
}

pub fn check_structured(dataset: &Dataset) -> StructuredQuality {
    let columns = dataset.columns();
    let rows = dataset.row_count();

    let missing_values: ColumnMap<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), dataset.missing_count(idx)))
        .collect();

    let data_types = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), dataset.column_type(idx)))
        .collect();

    let empty_columns = missing_values
        .iter()
        .filter(|(_, missing)| **missing == rows)
        .map(|(name, _)| name.to_string())
        .collect();

    StructuredQuality {
        row_count: rows,
        column_count: columns.len(),
        missing_values,
        duplicate_rows: dataset.duplicate_row_count(),
        data_types,
        empty_columns,
    }
}

/// Profiles the first column as lines of text.
pub fn check_text(dataset: &Dataset) -> TextQuality {
    let idx = dataset.column_index(TEXT_COLUMN).unwrap_or(0);
    let lengths = text_lengths(dataset, idx);
    let as_f64: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();

    TextQuality {
        total_lines: dataset.row_count(),
        empty_lines: dataset.missing_count(idx),
        avg_text_length: statistics::mean(&as_f64).unwrap_or(0.0),
        min_text_length: lengths.iter().copied().min().unwrap_or(0),
        max_text_length: lengths.iter().copied().max().unwrap_or(0),
    }
}

/// Character counts of the non-missing cells of a column.
pub(crate) fn text_lengths(dataset: &Dataset, idx: usize) -> Vec<usize> {
    dataset.column(idx).filter_map(|v| v.char_len()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::Value;
    use anyhow::Result;

    fn transactions() -> Result<Dataset> {
        Ok(Dataset::from_columns(vec![
            (
                "amount",
                vec![
                    100.into(),
                    120.into(),
                    130.into(),
                    Value::Null,
                    5000.into(),
                ],
            ),
            (
                "quantity",
                vec![1.into(), 1.into(), 2.into(), 1.into(), 50.into()],
            ),
        ])?)
    }

    #[test]
    fn test_structured_report() -> Result<()> {
        let result = run_data_quality_checks(&transactions()?);
        assert_eq!(result.data_type, DataKind::Structured);

        let report = result.quality_report.as_structured().unwrap();
        assert_eq!(report.row_count, 5);
        assert_eq!(report.column_count, 2);
        assert_eq!(report.missing_values.get("amount"), Some(&1));
        assert_eq!(report.missing_values.get("quantity"), Some(&0));
        assert_eq!(report.duplicate_rows, 0);
        assert_eq!(report.data_types.get("amount"), Some(&ColumnType::Float64));
        assert_eq!(report.data_types.get("quantity"), Some(&ColumnType::Int64));
        assert!(report.empty_columns.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_columns_and_duplicates() -> Result<()> {
        let ds = Dataset::from_columns(vec![
            ("id", vec![1.into(), 1.into(), 2.into()]),
            ("notes", vec![Value::Null, Value::Null, Value::Null]),
        ])?;
        let report = check_structured(&ds);
        assert_eq!(report.empty_columns, vec!["notes".to_string()]);
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(report.data_types.get("notes"), Some(&ColumnType::Object));
        Ok(())
    }

    #[test]
    fn test_text_report() {
        let ds = Dataset::from_lines(vec![
            Some("System started"),
            Some("User logged in"),
            None,
            Some("ERROR: connection timeout occurred"),
            Some("Shutdown initiated"),
        ]);
        let result = run_data_quality_checks(&ds);
        assert_eq!(result.data_type, DataKind::Unstructured);

        let report = result.quality_report.as_text().unwrap();
        assert_eq!(report.total_lines, 5);
        assert_eq!(report.empty_lines, 1);
        assert_eq!(report.avg_text_length, 20.0);
        assert_eq!(report.min_text_length, 14);
        assert_eq!(report.max_text_length, 34);
    }

    #[test]
    fn test_empty_inputs_never_fail() {
        let text = check_text(&Dataset::from_lines(Vec::<Option<String>>::new()));
        assert_eq!(text.total_lines, 0);
        assert_eq!(text.avg_text_length, 0.0);
        assert_eq!(text.max_text_length, 0);

        let all_missing = check_text(&Dataset::from_lines(vec![None::<&str>, None]));
        assert_eq!(all_missing.empty_lines, 2);
        assert_eq!(all_missing.min_text_length, 0);

        let table = check_structured(&Dataset::default());
        assert_eq!(table.row_count, 0);
        assert_eq!(table.column_count, 0);
        assert!(table.empty_columns.is_empty());
    }

    #[test]
    fn test_report_json_shape() -> Result<()> {
        let json = run_data_quality_checks(&transactions()?).to_json()?;
        let parsed: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(parsed["data_type"], "structured");
        assert_eq!(parsed["quality_report"]["missing_values"]["amount"], 1);
        assert_eq!(parsed["quality_report"]["data_types"]["quantity"], "int64");
        Ok(())
    }
}
