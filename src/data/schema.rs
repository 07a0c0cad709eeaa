use std::collections::BTreeSet;

use super::model::Table;
use crate::error::{CurateError, Result};

/// Check that `table` carries every name in `required`.
///
/// Fails with the complete set of absent names, not just the first.
pub fn validate(table: &Table, required: &[&str]) -> Result<()> {
    let present: BTreeSet<&str> = table.columns().iter().map(String::as_str).collect();
    let missing: BTreeSet<String> = required
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        log::warn!("Table is missing required columns: {missing:?}");
        Err(CurateError::MissingColumns { missing })
    }
}

/// Validate against the field set of the table's own detected variant.
pub fn validate_variant(table: &Table) -> Result<()> {
    validate(table, &table.variant().required_fields())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::type1_table;
    use crate::data::model::{Value, REQUIRED_FIELDS};

    #[test]
    fn complete_table_passes() {
        let table = type1_table(&[Some("A"), None]);
        assert!(validate(&table, &REQUIRED_FIELDS).is_ok());
    }

    #[test]
    fn reports_exactly_the_missing_field() {
        let columns: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| **f != "s_dec")
            .map(|f| f.to_string())
            .collect();
        let table = Table::new(columns, vec![vec![Value::from("x"); 6]]);

        match validate(&table, &REQUIRED_FIELDS) {
            Err(CurateError::MissingColumns { missing }) => {
                assert_eq!(missing, BTreeSet::from(["s_dec".to_string()]));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn reports_every_missing_field() {
        let table = Table::new(vec!["target_name".into()], vec![]);
        let err = validate(&table, &REQUIRED_FIELDS).unwrap_err();
        match err {
            CurateError::MissingColumns { missing } => assert_eq!(missing.len(), 6),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unrecognized_variant_does_not_require_classification() {
        let columns: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| **f != "target_classification")
            .map(|f| f.to_string())
            .collect();
        let table = Table::new(columns, vec![]);
        assert!(validate_variant(&table).is_ok());
    }
}
