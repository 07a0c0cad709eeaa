use std::collections::BTreeMap;

use super::model::{Table, Value, CLASSIFICATION, CLASSIFICATION_ID};
use crate::error::{CurateError, Result};

/// Sorted-order bijection from distinct labels to `0..len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassIndex {
    ids: BTreeMap<String, usize>,
}

impl ClassIndex {
    /// Build the index over `labels`; duplicates collapse to one id.
    pub fn build<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ids: BTreeMap<String, usize> =
            labels.into_iter().map(|l| (l.to_string(), 0)).collect();
        // BTreeMap iterates in lexicographic key order.
        for (id, slot) in ids.values_mut().enumerate() {
            *slot = id;
        }
        ClassIndex { ids }
    }

    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Labels in id order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }
}

/// Attach a `classification_id` column derived from the sorted set of
/// distinct classifications.
///
/// Every classification must already be filled; original columns and row
/// order are kept as-is.
pub fn index_classifications(table: &Table) -> Result<(Table, ClassIndex)> {
    let labels = table
        .column_values(CLASSIFICATION)
        .ok_or_else(|| CurateError::MissingColumns {
            missing: [CLASSIFICATION.to_string()].into(),
        })?;

    let unfilled = labels.iter().filter(|v| v.is_null()).count();
    if unfilled > 0 {
        return Err(CurateError::UnlabeledRecords { count: unfilled });
    }

    let labels: Vec<&str> = labels.iter().map(|v| v.to_field()).collect();
    let index = ClassIndex::build(labels.iter().copied());

    let ids: Vec<Value> = labels
        .iter()
        .map(|label| {
            // Every label was inserted into the index above.
            let id = index.id_of(label).unwrap_or_default();
            Value::Text(id.to_string())
        })
        .collect();

    log::info!(
        "Indexed {} records into {} classes",
        table.len(),
        index.len()
    );
    Ok((table.with_column(CLASSIFICATION_ID, ids), index))
}
