// crates/emodict-core/src/dataset.rs

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};

use crate::encoding::EMOTION_COLUMNS;
use crate::error::{LoaderError, Result};

const TEXT_COLUMNS: [&str; 4] = ["Speaker_name", "Speaker_party_name", "Date", "Text"];

fn required_columns() -> impl Iterator<Item = &'static str> {
    TEXT_COLUMNS.into_iter().chain(EMOTION_COLUMNS)
}

/// One source row, with missing fields preserved so that validation and
/// normalization can decide what to do with them.
#[derive(Debug, Clone)]
pub struct SpeechRecord {
    pub speaker_name: Option<String>,
    pub party_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub text: Option<String>,
    /// Emotion values in [`EMOTION_COLUMNS`] order.
    pub emotions: [Option<f64>; 5],
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Speaker_name")]
    speaker_name: Option<String>,
    #[serde(rename = "Speaker_party_name")]
    party_name: Option<String>,
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Text")]
    text: Option<String>,
    anger: Option<f64>,
    disgust: Option<f64>,
    fear: Option<f64>,
    joy: Option<f64>,
    sadness: Option<f64>,
}

impl CsvRow {
    fn into_record(self) -> SpeechRecord {
        SpeechRecord {
            date: self.date.as_deref().and_then(parse_date),
            speaker_name: self.speaker_name,
            party_name: self.party_name,
            text: self.text,
            emotions: [self.anger, self.disgust, self.fear, self.joy, self.sadness],
        }
    }
}

/// Load the NRC-encoded CSV dataset. A missing file or a missing required
/// column is fatal; a malformed row is warned about and dropped.
pub fn load_csv(path: &Path) -> Result<Vec<SpeechRecord>> {
    if !path.exists() {
        return Err(LoaderError::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    check_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut malformed = 0u64;
    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => records.push(row.into_record()),
            Err(err) => {
                malformed += 1;
                warn!(row = idx, error = %err, "malformed CSV row dropped");
            }
        }
    }

    info!(
        rows = records.len(),
        malformed,
        path = %path.display(),
        "CSV dataset loaded"
    );
    Ok(records)
}

/// Load the statistical-data export (the R data frame serialized as Parquet).
pub fn load_parquet(path: &Path) -> Result<Vec<SpeechRecord>> {
    if !path.exists() {
        return Err(LoaderError::MissingInput(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    let records = records_from_dataframe(&df)?;

    info!(rows = records.len(), path = %path.display(), "parquet dataset loaded");
    Ok(records)
}

/// Extract records from an in-memory data frame. `Date` may arrive as a
/// physical date column or as strings depending on how the export was
/// written; both are accepted by casting through String. Emotion columns are
/// cast to f64 so integer counts survive.
pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<SpeechRecord>> {
    for column in required_columns() {
        if df.column(column).is_err() {
            return Err(LoaderError::MissingColumn(column.to_string()));
        }
    }

    let speaker = string_column(df, "Speaker_name")?;
    let party = string_column(df, "Speaker_party_name")?;
    let date = string_column(df, "Date")?;
    let text = string_column(df, "Text")?;
    let emotions = EMOTION_COLUMNS
        .iter()
        .map(|name| float_column(df, name))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut values = [None; 5];
        for (slot, column) in values.iter_mut().zip(&emotions) {
            *slot = column.get(i);
        }

        records.push(SpeechRecord {
            speaker_name: speaker.get(i).map(str::to_string),
            party_name: party.get(i).map(str::to_string),
            date: date.get(i).and_then(parse_date),
            text: text.get(i).map(str::to_string),
            emotions: values,
        });
    }

    Ok(records)
}

fn check_headers(headers: &csv::StringRecord) -> Result<()> {
    for column in required_columns() {
        if !headers.iter().any(|header| header == column) {
            return Err(LoaderError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series.str()?.clone())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.clone())
}

/// Parse a calendar date, tolerating a trailing time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
        trimmed
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use polars::df;

    use super::*;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data")
            .join(name)
    }

    #[test]
    fn loads_csv_fixture_preserving_missing_fields() {
        let records = load_csv(&fixture("speeches.csv")).expect("fixture should load");
        assert_eq!(records.len(), 4);

        let alice = &records[0];
        assert_eq!(alice.speaker_name.as_deref(), Some("Alice"));
        assert_eq!(alice.party_name.as_deref(), Some("PartyA"));
        assert_eq!(alice.date, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(alice.text.as_deref(), Some("hi there"));
        assert_eq!(
            alice.emotions,
            [Some(1.0), Some(0.0), Some(0.0), Some(2.0), Some(0.0)]
        );

        // Third row has an empty Speaker_name cell.
        assert_eq!(records[2].speaker_name, None);
        assert_eq!(records[2].party_name.as_deref(), Some("PartyA"));

        // Fourth row has an empty disgust cell and a quoted text field.
        assert_eq!(records[3].emotions[1], None);
        assert_eq!(records[3].text.as_deref(), Some("quoted, text"));
    }

    #[test]
    fn missing_input_file_is_fatal() {
        let err = load_csv(Path::new("no-such-file.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::MissingInput(_)));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let err = load_csv(&fixture("missing_column.csv")).unwrap_err();
        match err {
            LoaderError::MissingColumn(column) => assert_eq!(column, "Date"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn extracts_records_from_dataframe_with_integer_counts() {
        let df = df!(
            "Speaker_name" => ["Alice", "Bob"],
            "Speaker_party_name" => ["PartyA", "PartyB"],
            "Date" => ["2021-01-01", "2021-01-02 00:00:00"],
            "Text" => ["hi", "yo"],
            "anger" => [1i64, 0],
            "disgust" => [0i64, 0],
            "fear" => [0i64, 0],
            "joy" => [2i64, 0],
            "sadness" => [0i64, 0],
        )
        .unwrap();

        let records = records_from_dataframe(&df).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].emotions[0], Some(1.0));
        assert_eq!(records[0].emotions[3], Some(2.0));
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2021, 1, 1));
        // Datetime-style strings still resolve to the calendar day.
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2021, 1, 2));
    }

    #[test]
    fn dataframe_missing_column_is_fatal() {
        let df = df!(
            "Speaker_name" => ["Alice"],
            "Speaker_party_name" => ["PartyA"],
            "Date" => ["2021-01-01"],
            "Text" => ["hi"],
        )
        .unwrap();

        let err = records_from_dataframe(&df).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(_)));
    }

    #[test]
    fn unparseable_dates_become_none() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(
            parse_date("2021-06-15T12:30:00"),
            NaiveDate::from_ymd_opt(2021, 6, 15)
        );
    }
}
