use std::fmt;

use crate::error::{CurateError, Result};

/// Column holding the raw classification label.
pub const CLASSIFICATION: &str = "target_classification";

/// Column appended by the classification indexer.
pub const CLASSIFICATION_ID: &str = "classification_id";

/// Observational parameters every Type 1 export must carry, in output order.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "target_name",
    CLASSIFICATION,
    "s_ra",
    "s_dec",
    "calib_level",
    "t_min",
    "t_exptime",
];

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// One cell of a loaded table.
///
/// Cells keep their source text verbatim so a saved table reproduces the
/// input. An empty cell in the export is `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Null => None,
        }
    }

    /// Cell text as written to an output file (`Null` becomes empty).
    pub fn to_field(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s),
            Value::Null => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

// ---------------------------------------------------------------------------
// SchemaVariant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Carries a `target_classification` column.
    Type1,
    Unrecognized,
}

impl SchemaVariant {
    pub fn detect(columns: &[String]) -> Self {
        if columns.iter().any(|c| c == CLASSIFICATION) {
            SchemaVariant::Type1
        } else {
            SchemaVariant::Unrecognized
        }
    }

    /// Required field set for this variant. Unrecognized tables are held to
    /// the Type 1 set minus the classification column, which the filter
    /// path synthesizes.
    pub fn required_fields(self) -> Vec<&'static str> {
        match self {
            SchemaVariant::Type1 => REQUIRED_FIELDS.to_vec(),
            SchemaVariant::Unrecognized => REQUIRED_FIELDS
                .iter()
                .copied()
                .filter(|f| *f != CLASSIFICATION)
                .collect(),
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Type1 => write!(f, "Type 1"),
            SchemaVariant::Unrecognized => write!(f, "Unrecognized"),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered set of rows sharing one column list.
///
/// Rows are stored positionally: `rows[i][j]` is the value of `columns[j]`
/// for record `i`. A table is never mutated once built; stages return new
/// tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    variant: SchemaVariant,
}

impl Table {
    /// Build a table, padding short rows with `Null` and truncating long
    /// ones so every row matches the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        let variant = SchemaVariant::detect(&columns);
        Table {
            columns,
            rows,
            variant,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
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

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// New table with `name` replaced by `values` (or appended when the
    /// column does not exist yet).
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Table {
        debug_assert_eq!(values.len(), self.rows.len());
        let mut columns = self.columns.clone();
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                columns.push(name.to_string());
                columns.len() - 1
            }
        };
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                if idx < row.len() {
                    row[idx] = value;
                } else {
                    row.push(value);
                }
                row
            })
            .collect();
        Table::new(columns, rows)
    }
}

// ---------------------------------------------------------------------------
// Observation – one projected record
// ---------------------------------------------------------------------------

/// A record projected to exactly the required field set.
///
/// Field order matches [`REQUIRED_FIELDS`], which is also the column order
/// of saved filter outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub target_name: Option<String>,
    pub target_classification: String,
    pub s_ra: Option<String>,
    pub s_dec: Option<String>,
    pub calib_level: Option<String>,
    pub t_min: Option<String>,
    pub t_exptime: Option<String>,
}

impl Observation {
    pub fn with_classification(self, label: String) -> Self {
        Observation {
            target_classification: label,
            ..self
        }
    }

    /// Field values in [`REQUIRED_FIELDS`] order.
    pub fn fields(&self) -> [&str; 7] {
        fn opt(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("")
        }
        [
            opt(&self.target_name),
            &self.target_classification,
            opt(&self.s_ra),
            opt(&self.s_dec),
            opt(&self.calib_level),
            opt(&self.t_min),
            opt(&self.t_exptime),
        ]
    }
}

/// Column positions of the observation fields within one table.
///
/// `classification` is `None` for tables that lack the column entirely;
/// projection then yields an empty label.
#[derive(Debug, Clone, Copy)]
pub struct ObservationColumns {
    target_name: usize,
    classification: Option<usize>,
    s_ra: usize,
    s_dec: usize,
    calib_level: usize,
    t_min: usize,
    t_exptime: usize,
}

impl ObservationColumns {
    /// Locate every required column, failing with the full list of absent
    /// names.
    pub fn resolve(table: &Table) -> Result<Self> {
        let missing = table
            .variant()
            .required_fields()
            .into_iter()
            .filter(|f| !table.has_column(f))
            .map(str::to_string)
            .collect::<std::collections::BTreeSet<_>>();
        if !missing.is_empty() {
            return Err(CurateError::MissingColumns { missing });
        }

        let find = |name: &str| {
            table.column_index(name).ok_or_else(|| CurateError::MissingColumns {
                missing: [name.to_string()].into(),
            })
        };
        Ok(ObservationColumns {
            target_name: find("target_name")?,
            classification: table.column_index(CLASSIFICATION),
            s_ra: find("s_ra")?,
            s_dec: find("s_dec")?,
            calib_level: find("calib_level")?,
            t_min: find("t_min")?,
            t_exptime: find("t_exptime")?,
        })
    }

    pub fn project(&self, row: &[Value]) -> Observation {
        let cell = |idx: usize| row[idx].clone().into_option();
        Observation {
            target_name: cell(self.target_name),
            target_classification: self
                .classification
                .and_then(|idx| row[idx].as_str())
                .unwrap_or("")
                .to_string(),
            s_ra: cell(self.s_ra),
            s_dec: cell(self.s_dec),
            calib_level: cell(self.calib_level),
            t_min: cell(self.t_min),
            t_exptime: cell(self.t_exptime),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Type 1 table whose rows carry the given classification cells.
    pub fn type1_table(labels: &[Option<&str>]) -> Table {
        let mut columns: Vec<String> = REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect();
        columns.push("obs_id".to_string());
        let rows = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                columns
                    .iter()
                    .map(|c| match c.as_str() {
                        CLASSIFICATION => label.map(Value::from).unwrap_or(Value::Null),
                        "target_name" => Value::Text(format!("target-{i}")),
                        "obs_id" => Value::Text(format!("obs-{i}")),
                        _ => Value::Text(format!("{}", i as f64 * 0.5)),
                    })
                    .collect()
            })
            .collect();
        Table::new(columns, rows)
    }
}
