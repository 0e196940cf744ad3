// probity-core/src/domain/features.rs

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::domain::dataset::{DataKind, Dataset, TEXT_COLUMN};
use crate::domain::quality::text_lengths;
use crate::domain::statistics;

/// Ordered feature name -> value mapping consumed by a scorer.
///
/// Key order is part of the schema: scorers see the features as the columns
/// of a one-row table, in this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a feature, replacing the value in place if the name exists.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Same feature names in the same order.
    pub fn same_schema(&self, other: &FeatureVector) -> bool {
        self.names().eq(other.names())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut fv = Self::new();
        for (name, value) in iter {
            fv.insert(name, value);
        }
        fv
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FeatureVisitor;

        impl<'de> Visitor<'de> for FeatureVisitor {
            type Value = FeatureVector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of feature names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fv = FeatureVector::new();
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    fv.insert(name, value);
                }
                Ok(fv)
            }
        }

        deserializer.deserialize_map(FeatureVisitor)
    }
}

// ── Generators ───────────────────────────────────────────────────────

/// Feature vector for a dataset whose kind was decided upstream (normally by
/// the quality profiler's classification).
///
/// Structured keys depend on the numeric column names, so a scorer fitted on
/// one column set only accepts datasets with that same column set.
pub fn generate_features(dataset: &Dataset, kind: DataKind) -> FeatureVector {
    match kind {
        DataKind::Structured => structured_features(dataset),
        DataKind::Unstructured => text_features(dataset),
    }
}

/// `{col}_mean`, `{col}_std`, `{col}_min`, `{col}_max`, `{col}_missing_ratio`
/// per numeric column, then `row_count` and `column_count`.
pub fn structured_features(dataset: &Dataset) -> FeatureVector {
    let rows = dataset.row_count();
    let mut fv = FeatureVector::new();

    for (idx, name) in dataset.columns().iter().enumerate() {
        if !dataset.column_type(idx).is_numeric() {
            continue;
        }
        let values = dataset.numeric_values(idx);

        fv.insert(format!("{name}_mean"), statistics::mean(&values).unwrap_or(0.0));
        fv.insert(format!("{name}_std"), statistics::sample_std(&values).unwrap_or(0.0));
        fv.insert(format!("{name}_min"), statistics::min(&values).unwrap_or(0.0));
        fv.insert(format!("{name}_max"), statistics::max(&values).unwrap_or(0.0));
        fv.insert(
            format!("{name}_missing_ratio"),
            ratio(dataset.missing_count(idx), rows),
        );
    }

    fv.insert("row_count", rows as f64);
    fv.insert("column_count", dataset.column_count() as f64);
    fv
}

pub fn text_features(dataset: &Dataset) -> FeatureVector {
    let idx = dataset.column_index(TEXT_COLUMN).unwrap_or(0);
    let lengths: Vec<f64> = text_lengths(dataset, idx)
        .into_iter()
        .map(|l| l as f64)
        .collect();

    FeatureVector::from_iter([
        ("line_count", dataset.row_count() as f64),
        ("avg_text_length", statistics::mean(&lengths).unwrap_or(0.0)),
        ("std_text_length", statistics::sample_std(&lengths).unwrap_or(0.0)),
        ("min_text_length", statistics::min(&lengths).unwrap_or(0.0)),
        ("max_text_length", statistics::max(&lengths).unwrap_or(0.0)),
        (
            "empty_line_ratio",
            ratio(dataset.missing_count(idx), dataset.row_count()),
        ),
    ])
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
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
            ("region", vec!["eu".into(); 5]),
        ])?)
    }

    #[test]
    fn test_structured_features() -> Result<()> {
        let fv = generate_features(&transactions()?, DataKind::Structured);

        assert_eq!(fv.get("row_count"), Some(5.0));
        assert_eq!(fv.get("column_count"), Some(3.0));
        assert_eq!(fv.get("amount_mean"), Some(1337.5));
        assert_eq!(fv.get("amount_min"), Some(100.0));
        assert_eq!(fv.get("amount_max"), Some(5000.0));
        assert_eq!(fv.get("amount_missing_ratio"), Some(0.2));
        assert_eq!(fv.get("quantity_missing_ratio"), Some(0.0));
        assert!(fv.get("region_mean").is_none());
        Ok(())
    }

    #[test]
    fn test_structured_key_order() -> Result<()> {
        let fv = structured_features(&transactions()?);
        let names: Vec<&str> = fv.names().collect();
        assert_eq!(
            names,
            vec![
                "amount_mean",
                "amount_std",
                "amount_min",
                "amount_max",
                "amount_missing_ratio",
                "quantity_mean",
                "quantity_std",
                "quantity_min",
                "quantity_max",
                "quantity_missing_ratio",
                "row_count",
                "column_count",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_single_value_column_has_zero_std() -> Result<()> {
        let ds = Dataset::from_columns(vec![("x", vec![Value::Null, 4.into()])])?;
        let fv = structured_features(&ds);
        assert_eq!(fv.get("x_std"), Some(0.0));
        assert_eq!(fv.get("x_mean"), Some(4.0));
        Ok(())
    }

    #[test]
    fn test_nan_only_column_falls_back_to_zero() -> Result<()> {
        let ds = Dataset::from_columns(vec![(
            "x",
            vec![Value::Float(f64::NAN), Value::Float(f64::NAN)],
        )])?;
        let fv = structured_features(&ds);
        assert_eq!(fv.get("x_mean"), Some(0.0));
        assert_eq!(fv.get("x_max"), Some(0.0));
        assert_eq!(fv.get("x_missing_ratio"), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_text_features() {
        let ds = Dataset::from_lines(vec![
            Some("System started"),
            Some("User logged in"),
            None,
            Some("ERROR: connection timeout occurred"),
            Some("Shutdown initiated"),
        ]);
        let fv = generate_features(&ds, DataKind::Unstructured);
        assert_eq!(fv.get("line_count"), Some(5.0));
        assert_eq!(fv.get("empty_line_ratio"), Some(0.2));
        assert_eq!(fv.get("avg_text_length"), Some(20.0));
        assert_eq!(fv.get("min_text_length"), Some(14.0));
        assert_eq!(fv.get("max_text_length"), Some(34.0));
        assert!(fv.get("std_text_length").unwrap() > 0.0);
    }

    #[test]
    fn test_text_features_of_empty_dataset() {
        let fv = text_features(&Dataset::from_lines(Vec::<Option<String>>::new()));
        assert_eq!(fv.len(), 6);
        assert!(fv.values().all(|v| v == 0.0));
    }

    #[test]
    fn test_feature_vector_json_keeps_order() -> Result<()> {
        let fv = FeatureVector::from_iter([("b", 1.0), ("a", 2.0)]);
        assert_eq!(serde_json::to_string(&fv)?, r#"{"b":1.0,"a":2.0}"#);

        let back: FeatureVector = serde_json::from_str(r#"{"b":1.0,"a":2.0}"#)?;
        assert!(back.same_schema(&fv));
        Ok(())
    }
}
