use super::model::{Observation, ObservationColumns, Table, CLASSIFICATION};
use super::pseudo_label::PseudoLabelAssigner;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Labeled / unlabeled split
// ---------------------------------------------------------------------------

/// A table split by whether each record carries a classification.
///
/// Both halves are projected to the required field set and keep the
/// relative order the records had in the source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub labeled: Vec<Observation>,
    pub unlabeled: Vec<Observation>,
}

impl Partition {
    /// Replace the (empty) labels of the unlabeled half with pseudo-labels,
    /// numbered in the order the records appear.
    pub fn label_unlabeled(self, assigner: &PseudoLabelAssigner) -> Partition {
        let labels = assigner.assign(self.unlabeled.iter().map(|_| None));
        let unlabeled = self
            .unlabeled
            .into_iter()
            .zip(labels)
            .map(|(obs, label)| obs.with_classification(label))
            .collect();
        Partition {
            labeled: self.labeled,
            unlabeled,
        }
    }
}

/// Split a normalized table into labeled and unlabeled observations.
///
/// A record is labeled when its classification is non-empty after trimming
/// surrounding whitespace. A table with no classification column at all is
/// entirely unlabeled.
pub fn partition(table: &Table) -> Result<Partition> {
    let columns = ObservationColumns::resolve(table)?;

    if !table.has_column(CLASSIFICATION) {
        log::info!(
            "No {CLASSIFICATION} column, treating all {} records as unlabeled",
            table.len()
        );
        let unlabeled = table.rows().iter().map(|row| columns.project(row)).collect();
        return Ok(Partition {
            labeled: Vec::new(),
            unlabeled,
        });
    }

    let (labeled, unlabeled): (Vec<Observation>, Vec<Observation>) = table
        .rows()
        .iter()
        .map(|row| columns.project(row))
        .partition(|obs| !obs.target_classification.trim().is_empty());

    log::info!(
        "Partitioned {} records: {} labeled, {} unlabeled",
        table.len(),
        labeled.len(),
        unlabeled.len()
    );
    Ok(Partition { labeled, unlabeled })
}
