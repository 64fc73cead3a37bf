//! Fixture loading: JSON arrays in the payload shape, or flat CSV exports.
//!
//! Structure errors fail the load; individual unusable values (bad dates,
//! non-numeric amounts, blank text) load as absent fields.

use std::path::Path;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::{non_blank, parse_amount, parse_date, Document, DocumentData, Event};

pub fn load_events_json(source: &str, json: &str) -> Result<Vec<Event>, ReconError> {
    serde_json::from_str(json).map_err(|e| ReconError::FixtureParse {
        source: source.into(),
        message: e.to_string(),
    })
}

pub fn load_documents_json(source: &str, json: &str) -> Result<Vec<Document>, ReconError> {
    serde_json::from_str(json).map_err(|e| ReconError::FixtureParse {
        source: source.into(),
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct EventRow {
    id: String,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    contact: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            amount: row.amount.as_deref().and_then(parse_amount),
            date: row.date.as_deref().and_then(parse_date),
            reference: row.reference.and_then(non_blank),
            contact: row.contact.and_then(non_blank),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentRow {
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    total_amount: Option<String>,
    #[serde(default)]
    invoicing_date: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    receiving_date: Option<String>,
    #[serde(default)]
    issuer: Option<String>,
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    supplier: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            kind: row.kind.and_then(non_blank),
            data: DocumentData {
                total_amount: row.total_amount.as_deref().and_then(parse_amount),
                invoicing_date: row.invoicing_date.as_deref().and_then(parse_date),
                due_date: row.due_date.as_deref().and_then(parse_date),
                receiving_date: row.receiving_date.as_deref().and_then(parse_date),
                issuer: row.issuer.and_then(non_blank),
                recipient: row.recipient.and_then(non_blank),
                supplier: row.supplier.and_then(non_blank),
                reference: row.reference.and_then(non_blank),
            },
        }
    }
}

fn load_csv<R, T>(source: &str, csv_data: &str) -> Result<Vec<T>, ReconError>
where
    R: for<'de> Deserialize<'de>,
    T: From<R>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    reader
        .deserialize::<R>()
        .map(|row| {
            row.map(T::from).map_err(|e| ReconError::FixtureParse {
                source: source.into(),
                message: e.to_string(),
            })
        })
        .collect()
}

pub fn load_events_csv(source: &str, csv_data: &str) -> Result<Vec<Event>, ReconError> {
    load_csv::<EventRow, Event>(source, csv_data)
}

pub fn load_documents_csv(source: &str, csv_data: &str) -> Result<Vec<Document>, ReconError> {
    load_csv::<DocumentRow, Document>(source, csv_data)
}

enum Format {
    Json,
    Csv,
}

fn detect_format(path: &Path) -> Result<Format, ReconError> {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("json") => Ok(Format::Json),
        Some("csv") => Ok(Format::Csv),
        _ => Err(ReconError::UnsupportedFormat(path.display().to_string())),
    }
}

fn read(path: &Path) -> Result<String, ReconError> {
    std::fs::read_to_string(path)
        .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))
}

/// Read events from a `.json` or `.csv` file.
pub fn read_events(path: &Path) -> Result<Vec<Event>, ReconError> {
    let format = detect_format(path)?;
    let text = read(path)?;
    let source = path.display().to_string();
    let events = match format {
        Format::Json => load_events_json(&source, &text)?,
        Format::Csv => load_events_csv(&source, &text)?,
    };
    log::debug!("loaded {} events from {source}", events.len());
    Ok(events)
}

/// Read documents from a `.json` or `.csv` file.
pub fn read_documents(path: &Path) -> Result<Vec<Document>, ReconError> {
    let format = detect_format(path)?;
    let text = read(path)?;
    let source = path.display().to_string();
    let documents = match format {
        Format::Json => load_documents_json(&source, &text)?,
        Format::Csv => load_documents_csv(&source, &text)?,
    };
    log::debug!("loaded {} documents from {source}", documents.len());
    Ok(documents)
}
