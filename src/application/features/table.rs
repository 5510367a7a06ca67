use chrono::NaiveDate;

/// Derived signals for one date. `f64::NAN` marks a signal that cannot be
/// computed yet because the trailing window reaches before the series start.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub date: NaiveDate,
    values: Vec<f64>,
}

/// Chronological table of feature rows with a fixed column order.
///
/// The column order is the model contract: the trainer and the forecaster
/// always present values in exactly this order. Undefined rows are kept, not
/// removed; trimming is the trainer's job.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, date: NaiveDate, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(FeatureRow { date, values });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column names excluding the target, in table order.
    pub fn feature_names(&self, target: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.as_str() != target)
            .cloned()
            .collect()
    }

    /// Rows where every named feature and the target are defined, as a
    /// feature matrix and label vector.
    pub fn cleaned(&self, features: &[String], target: &str) -> (Vec<Vec<f64>>, Vec<f64>) {
        let indices: Vec<usize> = features
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        let target_idx = self.column_index(target);

        let mut x = Vec::new();
        let mut y = Vec::new();
        for row in &self.rows {
            let Some(t) = target_idx.map(|i| row.values[i]) else {
                continue;
            };
            let values: Vec<f64> = indices.iter().map(|&i| row.values[i]).collect();
            if t.is_nan() || values.iter().any(|v| v.is_nan()) {
                continue;
            }
            x.push(values);
            y.push(t);
        }
        (x, y)
    }

    /// The most recent row's values for the named columns. May contain NaN;
    /// resolving that is the caller's concern.
    pub fn latest_vector(&self, features: &[String]) -> Option<Vec<f64>> {
        let row = self.rows.last()?;
        let mut values = Vec::with_capacity(features.len());
        for name in features {
            values.push(row.values[self.column_index(name)?]);
        }
        Some(values)
    }

    /// Number of rows with every named column defined.
    pub fn complete_rows(&self, features: &[String]) -> usize {
        let indices: Vec<usize> = features
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        self.rows
            .iter()
            .filter(|row| indices.iter().all(|&i| !row.values[i].is_nan()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> FeatureTable {
        let mut table = FeatureTable::new(names(&["a", "b", "target"]));
        table.push(date(2), vec![f64::NAN, 1.0, 10.0]);
        table.push(date(3), vec![1.0, 2.0, f64::NAN]);
        table.push(date(4), vec![2.0, 3.0, 30.0]);
        table.push(date(5), vec![3.0, f64::NAN, 40.0]);
        table
    }

    #[test]
    fn test_cleaned_drops_rows_with_undefined_values() {
        let table = sample_table();
        let features = names(&["a", "b"]);

        let (x, y) = table.cleaned(&features, "target");
        assert_eq!(x, vec![vec![2.0, 3.0]]);
        assert_eq!(y, vec![30.0]);
    }

    #[test]
    fn test_feature_names_excludes_target() {
        let table = sample_table();
        assert_eq!(table.feature_names("target"), names(&["a", "b"]));
    }

    #[test]
    fn test_latest_vector_preserves_column_order() {
        let table = sample_table();
        let latest = table.latest_vector(&names(&["b", "a"])).unwrap();
        assert!(latest[0].is_nan());
        assert_eq!(latest[1], 3.0);
    }

    #[test]
    fn test_latest_vector_missing_column_is_none() {
        let table = sample_table();
        assert!(table.latest_vector(&names(&["a", "zzz"])).is_none());
    }

    #[test]
    fn test_complete_rows_counts_defined_feature_rows() {
        let table = sample_table();
        // Target NaN does not matter here, only the feature columns do.
        assert_eq!(table.complete_rows(&names(&["a", "b"])), 2);
    }
}
