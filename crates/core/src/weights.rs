//! Symptom weight reference data.
//!
//! The table is loaded once at startup and never mutated afterwards. Lookups are
//! case-insensitive: both the stored labels and the queried labels go through
//! [`normalize_label`]. A label that is not in the table weighs `0.0`; unknown
//! symptoms are not an error.
//!
//! ## Accepted formats
//!
//! The loader picks a parser from the file extension:
//!
//! - `.csv`: two columns `Symptom,weight`, header row optional
//! - `.yaml` / `.yml`: a mapping of `label: weight`
//! - `.json`: an object of `"label": weight`

use crate::error::{TriageError, TriageResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use triage_types::normalize_label;

/// Immutable mapping from normalised symptom label to non-negative weight.
#[derive(Debug, Clone, Default)]
pub struct SymptomWeightTable {
    weights: HashMap<String, f64>,
}

impl SymptomWeightTable {
    /// Builds a table from `(label, weight)` pairs.
    ///
    /// Later duplicates overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidInput`] if a label is blank or a weight is negative or
    /// not finite.
    pub fn from_pairs<I, S>(pairs: I) -> TriageResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        build_table(pairs).map_err(TriageError::InvalidInput)
    }

    /// Loads the reference file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Startup`] if the file cannot be read, has an unsupported
    /// extension, cannot be parsed, is empty, or contains an invalid entry.
    pub fn load(path: &Path) -> TriageResult<Self> {
        let startup = |reason: String| TriageError::Startup {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|e| startup(e.to_string()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let pairs = match extension.as_str() {
            "csv" => parse_csv(&contents),
            "yaml" | "yml" => serde_yaml::from_str::<BTreeMap<String, f64>>(&contents)
                .map(|map| map.into_iter().collect())
                .map_err(|e| e.to_string()),
            "json" => serde_json::from_str::<BTreeMap<String, f64>>(&contents)
                .map(|map| map.into_iter().collect())
                .map_err(|e| e.to_string()),
            other => Err(format!("unsupported weight file extension {other:?}")),
        }
        .map_err(startup)?;

        let table = build_table(pairs).map_err(startup)?;
        if table.is_empty() {
            return Err(startup("weight table contains no entries".into()));
        }
        tracing::info!(
            "loaded {} symptom weights from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Weight for `label`, or `0.0` when the label is unknown.
    pub fn weight(&self, label: &str) -> f64 {
        self.weights
            .get(&normalize_label(label))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

fn build_table<I, S>(pairs: I) -> Result<SymptomWeightTable, String>
where
    I: IntoIterator<Item = (S, f64)>,
    S: AsRef<str>,
{
    let mut weights = HashMap::new();
    for (label, weight) in pairs {
        let key = normalize_label(label.as_ref());
        if key.is_empty() {
            return Err("symptom label cannot be empty".into());
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(format!(
                "weight for {key:?} must be a non-negative number, got {weight}"
            ));
        }
        weights.insert(key, weight);
    }
    Ok(SymptomWeightTable { weights })
}

/// Parses `label,weight` lines. The first non-blank line is treated as a header when its
/// weight column is not numeric.
fn parse_csv(contents: &str) -> Result<Vec<(String, f64)>, String> {
    let mut pairs = Vec::new();
    let mut seen_first = false;

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (label, weight) = line
            .split_once(',')
            .ok_or_else(|| format!("line {}: expected `label,weight`", index + 1))?;

        let parsed = weight.trim().parse::<f64>();
        let is_first = !seen_first;
        seen_first = true;

        match parsed {
            Ok(weight) => pairs.push((label.trim().to_string(), weight)),
            Err(_) if is_first => continue,
            Err(_) => {
                return Err(format!(
                    "line {}: weight {:?} is not a number",
                    index + 1,
                    weight.trim()
                ))
            }
        }
    }

    Ok(pairs)
}
