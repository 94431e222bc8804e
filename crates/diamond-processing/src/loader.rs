//! Loading batted-ball spreadsheets into a DataFrame.
//!
//! The spreadsheet is read as delimited text with a header row. After reading,
//! the required columns are checked and the measurement columns are coerced to
//! `Float64`; a cell that cannot be read as a number is fatal.

use crate::error::{CleaningError, Result};
use crate::schema::{GAME_DATE, NUMERIC_COLUMNS, REQUIRED_COLUMNS};
use crate::utils::{numeric_values, string_values};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Read, validate and type a batted-ball file.
pub fn load_events(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let mut df = load_csv(path)?;
    validate_columns(&df)?;
    coerce_numeric(&mut df)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Cell values read as missing, as pandas does by default.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_options(quote_char: Option<u8>) -> CsvParseOptions {
    CsvParseOptions::default()
        .with_quote_char(quote_char)
        .with_null_values(Some(NullValues::AllColumns(
            NULL_TOKENS.iter().map(|token| (*token).into()).collect(),
        )))
}

fn read_options(quote_char: Option<u8>, text_columns: Option<SchemaRef>) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(1000))
        .with_has_header(true)
        .with_schema_overwrite(text_columns)
        .with_parse_options(parse_options(quote_char))
}

/// Schema reading the measurement and date columns present in the header as
/// text, so type inference over a prefix of the file cannot reject later rows.
///
/// Only header columns are listed: polars matches a full-width override by
/// position rather than by name.
fn text_columns(path: &Path) -> Option<SchemaRef> {
    let header = CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_n_rows(Some(0))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
        .inspect_err(|e| debug!("Reading header failed: {}", e))
        .ok()?;

    let schema: Schema = header
        .get_column_names()
        .into_iter()
        .filter(|name| {
            NUMERIC_COLUMNS.contains(&name.as_str()) || name.as_str() == GAME_DATE
        })
        .map(|name| (name.clone(), DataType::String))
        .collect();
    Some(Arc::new(schema))
}

/// Load a CSV file with fallback strategies for sloppy quoting.
///
/// The usual missing-value tokens (`NA`, `N/A`, `NaN`, `null`, ...) read as
/// null in every column.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CleaningError::FileNotFound(path.to_path_buf()));
    }
    let text_columns = text_columns(path);

    // Strategy 1: Standard loading with quote handling
    match read_options(Some(b'"'), text_columns.clone())
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    match read_options(None, text_columns.clone())
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading without quotes failed: {}", e);
        }
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path)?;
    let cursor = Cursor::new(clean_csv_content(&content));

    Ok(read_options(Some(b'"'), text_columns)
        .into_reader_with_file_handle(cursor)
        .finish()?)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fail on the first required column that is absent.
pub fn validate_columns(df: &DataFrame) -> Result<()> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !present.iter().any(|name| name == required) {
            return Err(CleaningError::ColumnNotFound(required.to_string()));
        }
    }
    Ok(())
}

/// Cast the measurement columns to `Float64`, with NaN read as missing.
///
/// Polars turns unparseable cells into nulls on cast; any new null means the
/// input held a non-numeric value, which is reported with the first offender.
pub fn coerce_numeric(df: &mut DataFrame) -> Result<()> {
    for name in NUMERIC_COLUMNS {
        let series = df
            .column(name)
            .map_err(|_| CleaningError::ColumnNotFound(name.to_string()))?
            .as_materialized_series()
            .clone();

        let converted = numeric_values(&series)?;
        let already_float = series.dtype() == &DataType::Float64;
        if !already_float {
            let original = string_values(&series)?;
            if let Some(bad) = original
                .iter()
                .zip(&converted)
                .find_map(|(raw, parsed)| match (raw, parsed) {
                    (Some(raw), None) if !raw.trim().is_empty() => Some(raw.clone()),
                    _ => None,
                })
            {
                return Err(CleaningError::TypeConversionFailed {
                    column: name.to_string(),
                    target_type: "Float64".to_string(),
                    reason: format!("value '{}' is not a number", bad),
                });
            }
        }

        let nan_count = converted.iter().flatten().filter(|v| v.is_nan()).count();
        if already_float && nan_count == 0 {
            continue;
        }

        let converted: Vec<Option<f64>> = converted
            .into_iter()
            .map(|v| v.filter(|v| !v.is_nan()))
            .collect();
        debug!(
            "Coerced '{}' from {} to f64 ({} NaN read as missing)",
            name,
            series.dtype(),
            nan_count
        );
        df.replace(name, Series::new(name.into(), converted))?;
    }
    Ok(())
}
