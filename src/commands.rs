//! Command layer: one function per user action, each taking typed inputs
//! and returning a typed result. Nothing here touches UI state.

use std::path::{Path, PathBuf};

use crate::config::CurateConfig;
use crate::data::index::{index_classifications, ClassIndex};
use crate::data::loader::{load_table, stage_observations};
use crate::data::merge::combine;
use crate::data::model::{Observation, SchemaVariant, Table, Value, CLASSIFICATION};
use crate::data::normalize::normalize_table;
use crate::data::partition::partition;
use crate::data::pseudo_label::PseudoLabelAssigner;
use crate::data::schema;
use crate::error::{CurateError, Result};

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Labeled and pseudo-labeled observations from one export.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub variant: SchemaVariant,
    pub labeled: Vec<Observation>,
    pub unlabeled: Vec<Observation>,
}

/// Validate, normalize and split one table.
///
/// A table without `target_classification` is pseudo-labeled in full
/// unless `config.reject_unrecognized` is set.
pub fn filter_table(table: &Table, config: &CurateConfig) -> Result<FilterOutcome> {
    if table.columns().is_empty() {
        return Err(CurateError::UnknownFormat {
            columns: Vec::new(),
        });
    }

    let variant = table.variant();
    if variant == SchemaVariant::Unrecognized && config.reject_unrecognized {
        return Err(CurateError::UnknownFormat {
            columns: table.columns().to_vec(),
        });
    }

    schema::validate_variant(table)?;
    let normalized = normalize_table(table);
    let split = partition(&normalized)?.label_unlabeled(&config.assigner());

    log::info!(
        "Filtered {variant} table: {} labeled, {} pseudo-labeled",
        split.labeled.len(),
        split.unlabeled.len()
    );
    Ok(FilterOutcome {
        variant,
        labeled: split.labeled,
        unlabeled: split.unlabeled,
    })
}

/// Write the labeled and unlabeled halves to their own files.
///
/// A `None` path skips that half. Both files are fully written before
/// either target is replaced, so a failed write leaves no new output on
/// disk. Returns how many files were written.
pub fn save_filter_outcome(
    outcome: &FilterOutcome,
    labeled_path: Option<&Path>,
    unlabeled_path: Option<&Path>,
    config: &CurateConfig,
) -> Result<usize> {
    let mut staged = Vec::with_capacity(2);
    if let Some(path) = labeled_path {
        staged.push(stage_observations(&outcome.labeled, path, config)?);
    }
    if let Some(path) = unlabeled_path {
        staged.push(stage_observations(&outcome.unlabeled, path, config)?);
    }

    let written = staged.len();
    for file in staged {
        log::info!("Saving {}", file.path().display());
        file.commit()?;
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Combined table, with ids attached when any source carried labels.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    pub class_index: Option<ClassIndex>,
    pub sources: usize,
}

/// Give pseudo-labels to `Null` classifications only.
///
/// Unlike the filter path, text such as `nan` or `A; b` is kept verbatim.
pub fn fill_missing_labels(table: &Table, assigner: &PseudoLabelAssigner) -> Table {
    let Some(labels) = table.column_values(CLASSIFICATION) else {
        return table.clone();
    };
    let filled = assigner
        .assign(labels.into_iter().map(|v| v.clone().into_option()))
        .into_iter()
        .map(Value::Text)
        .collect();
    table.with_column(CLASSIFICATION, filled)
}

/// Concatenate tables, fill missing labels and attach `classification_id`.
pub fn merge_tables(tables: &[Table], config: &CurateConfig) -> Result<MergeOutcome> {
    let combined = combine(tables)?;

    if !combined.has_column(CLASSIFICATION) {
        log::warn!("No source carries {CLASSIFICATION}; merged table has no classification ids");
        return Ok(MergeOutcome {
            table: combined,
            class_index: None,
            sources: tables.len(),
        });
    }

    let filled = fill_missing_labels(&combined, &config.assigner());
    let (table, index) = index_classifications(&filled)?;
    Ok(MergeOutcome {
        table,
        class_index: Some(index),
        sources: tables.len(),
    })
}

/// Load every path, then merge. Any unreadable file aborts the merge.
pub fn merge_files(paths: &[PathBuf], config: &CurateConfig) -> Result<MergeOutcome> {
    let tables = paths
        .iter()
        .map(|p| load_table(p, config))
        .collect::<Result<Vec<_>>>()?;
    merge_tables(&tables, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CLASSIFICATION_ID, REQUIRED_FIELDS};

    fn labelled(labels: &[Option<&str>]) -> Table {
        Table::new(
            vec!["obs_id".into(), CLASSIFICATION.into()],
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| {
                    vec![
                        Value::Text(format!("obs-{i}")),
                        l.map(Value::from).unwrap_or(Value::Null),
                    ]
                })
                .collect(),
        )
    }

    fn column(table: &Table, name: &str) -> Vec<String> {
        table
            .column_values(name)
            .unwrap()
            .into_iter()
            .map(|v| v.to_field().to_string())
            .collect()
    }

    #[test]
    fn merge_scenario() {
        let a = labelled(&[None, Some("X")]);
        let b = labelled(&[Some("Y"), None]);
        let outcome = merge_tables(&[a, b], &CurateConfig::default()).unwrap();

        assert_eq!(outcome.sources, 2);
        assert_eq!(
            column(&outcome.table, CLASSIFICATION),
            vec!["un1", "X", "Y", "un2"]
        );
        assert_eq!(column(&outcome.table, CLASSIFICATION_ID), vec!["2", "0", "1", "3"]);
        assert_eq!(column(&outcome.table, "obs_id"), vec!["obs-0", "obs-1", "obs-0", "obs-1"]);
    }

    #[test]
    fn merge_without_classification_column_skips_indexing() {
        let t = Table::new(vec!["obs_id".into()], vec![vec![Value::from("1")]]);
        let outcome = merge_tables(&[t.clone()], &CurateConfig::default()).unwrap();
        assert!(outcome.class_index.is_none());
        assert_eq!(outcome.table, t);
    }

    #[test]
    fn merge_of_nothing_fails() {
        assert!(matches!(
            merge_tables(&[], &CurateConfig::default()),
            Err(CurateError::NoInput)
        ));
    }

    #[test]
    fn source_without_labels_gets_pseudo_labels_in_merge() {
        let a = labelled(&[Some("X")]);
        let b = Table::new(vec!["obs_id".into()], vec![vec![Value::from("b0")]]);
        let outcome = merge_tables(&[a, b], &CurateConfig::default()).unwrap();
        assert_eq!(column(&outcome.table, CLASSIFICATION), vec!["X", "un1"]);
    }

    #[test]
    fn missing_value_policy_differs_between_paths() {
        let raw = [Some("A; b"), Some("nan"), None, Some("C")];

        // Filter path: separators collapse and `nan` counts as missing.
        let mut columns: Vec<String> = REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect();
        columns.push("obs_id".into());
        let rows = raw
            .iter()
            .map(|l| {
                columns
                    .iter()
                    .map(|c| match c.as_str() {
                        CLASSIFICATION => l.map(Value::from).unwrap_or(Value::Null),
                        _ => Value::from("1"),
                    })
                    .collect()
            })
            .collect();
        let filtered = filter_table(&Table::new(columns, rows), &CurateConfig::default()).unwrap();
        let labeled: Vec<&str> = filtered
            .labeled
            .iter()
            .map(|o| o.target_classification.as_str())
            .collect();
        let unlabeled: Vec<&str> = filtered
            .unlabeled
            .iter()
            .map(|o| o.target_classification.as_str())
            .collect();
        assert_eq!(labeled, vec!["A-b", "C"]);
        assert_eq!(unlabeled, vec!["un1", "un2"]);

        // Merge path: only truly empty cells are filled, text is kept as-is.
        let merged = merge_tables(&[labelled(&raw)], &CurateConfig::default()).unwrap();
        assert_eq!(
            column(&merged.table, CLASSIFICATION),
            vec!["A; b", "nan", "un1", "C"]
        );
    }

    #[test]
    fn filter_rejects_unrecognized_when_configured() {
        let table = Table::new(vec!["target_name".into()], vec![]);
        let config = CurateConfig {
            reject_unrecognized: true,
            ..CurateConfig::default()
        };
        assert!(matches!(
            filter_table(&table, &config),
            Err(CurateError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn filter_rejects_headerless_table() {
        let table = Table::new(Vec::new(), Vec::new());
        assert!(matches!(
            filter_table(&table, &CurateConfig::default()),
            Err(CurateError::UnknownFormat { .. })
        ));
    }

    fn observation(label: &str) -> Observation {
        Observation {
            target_name: Some("t".into()),
            target_classification: label.into(),
            s_ra: None,
            s_dec: None,
            calib_level: None,
            t_min: None,
            t_exptime: None,
        }
    }

    #[test]
    fn failed_save_writes_neither_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = FilterOutcome {
            variant: SchemaVariant::Type1,
            labeled: vec![observation("A")],
            unlabeled: vec![observation("un1")],
        };
        let labeled = dir.path().join("labeled.csv");
        let unlabeled = dir.path().join("no_such_dir").join("unlabeled.csv");

        let result = save_filter_outcome(
            &outcome,
            Some(labeled.as_path()),
            Some(unlabeled.as_path()),
            &CurateConfig::default(),
        );
        assert!(matches!(result, Err(CurateError::Write { .. })));
        assert!(!labeled.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn save_skips_unchosen_half() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = FilterOutcome {
            variant: SchemaVariant::Type1,
            labeled: vec![observation("A")],
            unlabeled: vec![],
        };
        let labeled = dir.path().join("labeled.csv");

        let written = save_filter_outcome(
            &outcome,
            Some(labeled.as_path()),
            None,
            &CurateConfig::default(),
        )
        .unwrap();
        assert_eq!(written, 1);
        assert!(labeled.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_filter_leaves_input_usable() {
        let table = Table::new(vec![CLASSIFICATION.into()], vec![vec![Value::from("A")]]);
        let before = table.clone();
        assert!(filter_table(&table, &CurateConfig::default()).is_err());
        assert_eq!(table, before);
    }
}
