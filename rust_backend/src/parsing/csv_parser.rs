use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::domain::{MaterialRecord, RawPourRecord};
use crate::core::schema::{self, MATERIAL_REQUIRED_COLUMNS, POUR_REQUIRED_COLUMNS};
use crate::error::KpiError;

/// Read options shared by every dataset: header row, every column as text.
///
/// Type inference is disabled so that a single malformed cell cannot turn a
/// whole column into the wrong dtype; cells are parsed one by one afterwards.
fn read_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Parse a CSV file into a Polars DataFrame of string columns
pub fn read_csv(csv_path: &Path) -> Result<DataFrame> {
    read_options()
        .try_into_reader_with_file_path(Some(csv_path.into()))
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV file: {}", csv_path.display()))
}

/// Parse CSV text into a Polars DataFrame of string columns
pub fn read_csv_str(csv_content: &str) -> Result<DataFrame> {
    read_options()
        .into_reader_with_file_handle(Cursor::new(csv_content.as_bytes().to_vec()))
        .finish()
        .context("Failed to parse CSV content")
}

/// Parse a pour CSV file into raw pour records
pub fn parse_pour_csv(csv_path: &Path) -> Result<Vec<RawPourRecord>> {
    let df = read_csv(csv_path)?;
    dataframe_to_pour_records(&df)
        .with_context(|| format!("Invalid pour dataset: {}", csv_path.display()))
}

/// Parse a material CSV file into material records
pub fn parse_material_csv(csv_path: &Path) -> Result<Vec<MaterialRecord>> {
    let df = read_csv(csv_path)?;
    dataframe_to_material_records(&df)
        .with_context(|| format!("Invalid material dataset: {}", csv_path.display()))
}

/// Convert a pour DataFrame to raw pour records.
///
/// Fails with [`KpiError::MissingColumns`] when any pour column is absent.
/// Timestamp cells are kept as text; quantities that do not parse are `None`.
pub fn dataframe_to_pour_records(df: &DataFrame) -> Result<Vec<RawPourRecord>> {
    ensure_columns(df, &POUR_REQUIRED_COLUMNS)?;

    let mut batch_start = string_column(df, schema::BATCH_START_TIME)?.into_iter();
    let mut batch_end = string_column(df, schema::BATCH_END_TIME)?.into_iter();
    let mut departure = string_column(df, schema::DEPARTURE_TIME)?.into_iter();
    let mut arrival = string_column(df, schema::ARRIVAL_TIME)?.into_iter();
    let mut pouring_start = string_column(df, schema::POURING_START_TIME)?.into_iter();
    let mut pouring_finish = string_column(df, schema::POURING_FINISH_TIME)?.into_iter();
    let mut quantity = float_column(df, schema::QUANTITY)?.into_iter();

    let mut records = Vec::with_capacity(df.height());
    for _ in 0..df.height() {
        records.push(RawPourRecord {
            batch_start_time: batch_start.next().flatten(),
            batch_end_time: batch_end.next().flatten(),
            departure_time: departure.next().flatten(),
            arrival_time: arrival.next().flatten(),
            pouring_start_time: pouring_start.next().flatten(),
            pouring_finish_time: pouring_finish.next().flatten(),
            quantity: quantity.next().flatten(),
        });
    }

    Ok(records)
}

/// Convert a material DataFrame to material records.
///
/// Fails with [`KpiError::MissingColumns`] when any material column is absent.
/// A missing material name becomes an empty string.
pub fn dataframe_to_material_records(df: &DataFrame) -> Result<Vec<MaterialRecord>> {
    ensure_columns(df, &MATERIAL_REQUIRED_COLUMNS)?;

    let materials = string_column(df, schema::MATERIAL)?;
    let required = float_column(df, schema::REQUIRED_QTY)?;
    let batched = float_column(df, schema::BATCHED_QTY)?;

    let records = materials
        .into_iter()
        .zip(required)
        .zip(batched)
        .map(|((material, required_qty), batched_qty)| MaterialRecord {
            material: material.unwrap_or_default(),
            required_qty,
            batched_qty,
        })
        .collect();

    Ok(records)
}

/// Parse a numeric cell. Blank, unparseable and NaN cells are absent.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn ensure_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing = schema::missing_columns(required, &column_names);
    if !missing.is_empty() {
        return Err(KpiError::MissingColumns(missing).into());
    }
    Ok(())
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(KpiError::from)?
        .cast(&DataType::String)
        .map_err(KpiError::from)
        .with_context(|| format!("Column '{}' cannot be read as text", name))?;
    let values = column.str().map_err(KpiError::from)?;

    Ok(values
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(string_column(df, name)?
        .into_iter()
        .map(|v| v.as_deref().and_then(parse_quantity))
        .collect())
}
