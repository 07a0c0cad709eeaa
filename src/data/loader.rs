use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::model::{Observation, Table, Value, REQUIRED_FIELDS};
use crate::config::CurateConfig;
use crate::error::{CurateError, Result};

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Load a delimited export from disk.
///
/// Lines starting with the configured comment marker are skipped; the
/// first remaining line is the header. Empty cells load as `Null`.
pub fn load_table(path: &Path, config: &CurateConfig) -> Result<Table> {
    let read_err = |source: csv::Error| CurateError::Read {
        path: path.to_path_buf(),
        source,
    };
    let reader = reader_builder(config)?.from_path(path).map_err(read_err)?;
    let table = read_records(reader).map_err(read_err)?;
    log::info!(
        "Loaded {} records with {} columns from {} ({})",
        table.len(),
        table.columns().len(),
        path.display(),
        table.variant()
    );
    Ok(table)
}

/// Parse a delimited export from any reader. Errors report the path `<input>`.
pub fn read_table<R: io::Read>(input: R, config: &CurateConfig) -> Result<Table> {
    read_records(reader_builder(config)?.from_reader(input)).map_err(|source| CurateError::Read {
        path: PathBuf::from("<input>"),
        source,
    })
}

fn reader_builder(config: &CurateConfig) -> Result<csv::ReaderBuilder> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(config.delimiter_byte()?)
        .comment(config.comment_byte()?)
        .has_headers(true);
    Ok(builder)
}

fn read_records<R: io::Read>(mut reader: csv::Reader<R>) -> std::result::Result<Table, csv::Error> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let columns = disambiguate_headers(headers);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(parse_cell).collect());
    }
    Ok(Table::new(columns, rows))
}

/// Rename repeated header names to `name.1`, `name.2`, … so every column
/// stays addressable. A suffix already taken by a real header is skipped.
fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let originals: HashSet<String> = headers.iter().cloned().collect();
    let mut used: HashSet<String> = HashSet::with_capacity(headers.len());

    headers
        .into_iter()
        .map(|name| {
            if used.insert(name.clone()) {
                return name;
            }
            let mut k = 1usize;
            let mut candidate = format!("{name}.{k}");
            while used.contains(&candidate) || originals.contains(&candidate) {
                k += 1;
                candidate = format!("{name}.{k}");
            }
            log::warn!("Duplicate column {name:?} renamed to {candidate:?}");
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn parse_cell(s: &str) -> Value {
    if s.is_empty() {
        Value::Null
    } else {
        Value::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// An output fully written to a temporary file next to its target.
///
/// Nothing at the target path changes until [`commit`](Self::commit); a
/// staged file that is dropped instead is deleted.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the target with the staged content.
    pub fn commit(self) -> Result<()> {
        let StagedFile { tmp, path } = self;
        match tmp.persist(&path) {
            Ok(_) => Ok(()),
            Err(e) => Err(CurateError::Write {
                path,
                source: e.error.into(),
            }),
        }
    }
}

fn stage<F>(path: &Path, config: &CurateConfig, write: F) -> Result<StagedFile>
where
    F: FnOnce(&mut csv::Writer<&mut NamedTempFile>) -> csv::Result<()>,
{
    let write_err = |source: csv::Error| CurateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.into()))?;
    {
        let mut writer = writer_builder(config)?.from_writer(&mut tmp);
        write(&mut writer).map_err(write_err)?;
        writer.flush().map_err(|e| write_err(e.into()))?;
    }
    Ok(StagedFile {
        tmp,
        path: path.to_path_buf(),
    })
}

/// Stage a table (header row plus one line per record, no comments).
pub fn stage_table(table: &Table, path: &Path, config: &CurateConfig) -> Result<StagedFile> {
    stage(path, config, |writer| {
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(Value::to_field))?;
        }
        Ok(())
    })
}

/// Stage projected observations. The header is written even when
/// `observations` is empty.
pub fn stage_observations(
    observations: &[Observation],
    path: &Path,
    config: &CurateConfig,
) -> Result<StagedFile> {
    stage(path, config, |writer| {
        writer.write_record(REQUIRED_FIELDS)?;
        for obs in observations {
            writer.write_record(obs.fields())?;
        }
        Ok(())
    })
}

pub fn save_table(table: &Table, path: &Path, config: &CurateConfig) -> Result<()> {
    stage_table(table, path, config)?.commit()?;
    log::info!("Wrote {} records to {}", table.len(), path.display());
    Ok(())
}

fn writer_builder(config: &CurateConfig) -> Result<csv::WriterBuilder> {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(config.delimiter_byte()?).has_headers(false);
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SchemaVariant, CLASSIFICATION};

    const EXPORT: &str = "\
# Exported from the archive
# columns follow
target_name,target_classification,s_ra,s_dec,calib_level,t_min,t_exptime
M31,Galaxy; Spiral,10.68,41.26,2,58000.1,300
NGC 1,,1.0,2.0,3,58001.5,120
";

    #[test]
    fn skips_comments_and_maps_empty_cells_to_null() {
        let table = read_table(EXPORT.as_bytes(), &CurateConfig::default()).unwrap();

        assert_eq!(table.variant(), SchemaVariant::Type1);
        assert_eq!(table.len(), 2);
        let labels = table.column_values(CLASSIFICATION).unwrap();
        assert_eq!(labels, vec![&Value::from("Galaxy; Spiral"), &Value::Null]);
    }

    #[test]
    fn honours_custom_delimiter() {
        let config = CurateConfig {
            delimiter: ';',
            ..CurateConfig::default()
        };
        let table = read_table("a;b\n1;2\n".as_bytes(), &config).unwrap();
        assert_eq!(table.columns(), &["a", "b"]);
        assert_eq!(table.rows()[0][1], Value::from("2"));
    }

    #[test]
    fn ragged_rows_are_read_errors() {
        let result = read_table("a,b\n1,2,3\n".as_bytes(), &CurateConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_table(&dir.path().join("absent.csv"), &CurateConfig::default()).unwrap_err();
        assert!(matches!(err, CurateError::Read { .. }));
    }

    #[test]
    fn empty_observation_file_still_has_header() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("labeled.csv");
        stage_observations(&[], &path, &CurateConfig::default())
            .unwrap()
            .commit()
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), REQUIRED_FIELDS.join(","));
    }

    #[test]
    fn repeated_headers_get_numbered_suffixes() {
        let table = read_table(
            "obs_id,note,note,note.1,note\n1,a,b,c,d\n".as_bytes(),
            &CurateConfig::default(),
        )
        .unwrap();
        assert_eq!(
            table.columns(),
            &["obs_id", "note", "note.2", "note.1", "note.3"]
        );
        assert_eq!(table.rows()[0][2], Value::from("b"));
        assert_eq!(table.rows()[0][4], Value::from("d"));
    }

    #[test]
    fn non_ascii_delimiter_is_a_config_error() {
        let config = CurateConfig {
            delimiter: '\u{e9}',
            ..CurateConfig::default()
        };
        let err = read_table("a,b\n".as_bytes(), &config).unwrap_err();
        assert!(matches!(err, CurateError::InvalidConfig(_)));

        let dir = tempfile::TempDir::new().unwrap();
        let table = Table::new(vec!["a".into()], vec![]);
        let path = dir.path().join("out.csv");
        assert!(save_table(&table, &path, &config).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn staged_output_leaves_target_until_commit() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("labeled.csv");
        std::fs::write(&path, "previous\n").unwrap();

        let staged = stage_observations(&[], &path, &CurateConfig::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous\n");
        drop(staged);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn saved_table_reloads_identically() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let config = CurateConfig::default();
        let table = read_table(EXPORT.as_bytes(), &config).unwrap();

        save_table(&table, &path, &config).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains('#'));
        assert_eq!(load_table(&path, &config).unwrap(), table);
    }
}
