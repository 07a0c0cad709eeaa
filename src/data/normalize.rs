use std::sync::OnceLock;

use regex::Regex;

use super::model::{Table, Value, CLASSIFICATION};

fn separator_run() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[; ]+").expect("separator pattern is valid"))
}

/// Canonicalize one raw classification value.
///
/// Runs of `;` and spaces collapse to a single `-`. A missing cell, or a
/// value that reads `nan` in any case, becomes the empty string, which is
/// the missing sentinel downstream.
pub fn normalize_label(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let collapsed = separator_run().replace_all(raw, "-");
    if collapsed.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        collapsed.into_owned()
    }
}

/// Return a copy of `table` with its classification column normalized.
///
/// Tables without the column are returned unchanged; the whole-table
/// unlabeled case is handled by the partitioner.
pub fn normalize_table(table: &Table) -> Table {
    let Some(labels) = table.column_values(CLASSIFICATION) else {
        return table.clone();
    };

    let mut changed = 0usize;
    let normalized: Vec<Value> = labels
        .into_iter()
        .map(|value| {
            let out = normalize_label(value.as_str());
            if value.as_str() != Some(out.as_str()) {
                changed += 1;
            }
            Value::Text(out)
        })
        .collect();

    log::debug!("Normalized {changed} of {} classification values", table.len());
    table.with_column(CLASSIFICATION, normalized)
}
