use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::MatchConfig;
use crate::name::normalize_name;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A payment or bank transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_text")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub contact: Option<String>,
}

/// An invoice or receipt attached to the books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "de_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de_null_as_default")]
    pub data: DocumentData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default, deserialize_with = "de_amount")]
    pub total_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "de_date")]
    pub invoicing_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_date")]
    pub receiving_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_text")]
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub recipient: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub supplier: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub reference: Option<String>,
}

/// Both record pools, in caller order. Order decides ties.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub events: Vec<Event>,
    pub documents: Vec<Document>,
}

// ---------------------------------------------------------------------------
// Role-appropriate field extraction
// ---------------------------------------------------------------------------

/// The fields the matcher reads from either side of a pair.
pub trait MatchRecord {
    fn id(&self) -> &str;
    fn reference(&self) -> Option<&str>;
    fn amount(&self) -> Option<Decimal>;
    /// Every usable date. One for an event, up to three for a document.
    fn dates(&self) -> Vec<NaiveDate>;
    /// Normalized counterparty names usable for comparison.
    fn counterparty_names(&self, config: &MatchConfig) -> Vec<String>;
}

impl MatchRecord for Event {
    fn id(&self) -> &str {
        &self.id
    }

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    fn dates(&self) -> Vec<NaiveDate> {
        self.date.into_iter().collect()
    }

    fn counterparty_names(&self, _config: &MatchConfig) -> Vec<String> {
        normalize_name(self.contact.as_deref()).into_iter().collect()
    }
}

impl MatchRecord for Document {
    fn id(&self) -> &str {
        &self.id
    }

    fn reference(&self) -> Option<&str> {
        self.data.reference.as_deref()
    }

    fn amount(&self) -> Option<Decimal> {
        self.data.total_amount
    }

    fn dates(&self) -> Vec<NaiveDate> {
        [self.data.invoicing_date, self.data.due_date, self.data.receiving_date]
            .into_iter()
            .flatten()
            .collect()
    }

    fn counterparty_names(&self, config: &MatchConfig) -> Vec<String> {
        let self_company = normalize_name(Some(&config.self_company));
        [&self.data.issuer, &self.data.recipient, &self.data.supplier]
            .into_iter()
            .filter_map(|name| normalize_name(name.as_deref()))
            .filter(|name| Some(name) != self_company.as_ref())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Why a candidate was dropped from the heuristic scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    MissingAmount,
    AmountMismatch { difference: Decimal },
    DateOutOfWindow { min_diff_days: i64 },
    NameConflict,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAmount => write!(f, "amount missing"),
            Self::AmountMismatch { difference } => {
                write!(f, "amounts differ by {difference}")
            }
            Self::DateOutOfWindow { min_diff_days } => {
                write!(f, "nearest dates {min_diff_days} days apart")
            }
            Self::NameConflict => write!(f, "counterparty names conflict"),
        }
    }
}

/// Per-signal contributions of an accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub amount: f64,
    pub date: f64,
    /// Raw similarity in {0, 1, 2}; contributes `name * 5`.
    pub name: i8,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Reference,
    Heuristic,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// The chosen candidate and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Position in the candidate slice.
    pub index: usize,
    pub method: MatchMethod,
    /// `None` for reference matches, which are never scored.
    pub score: Option<ScoreBreakdown>,
}

/// One candidate's outcome, as reported by `explain`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateOutcome {
    pub id: String,
    pub reference_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub target_id: String,
    pub candidates: Vec<CandidateOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<MatchMethod>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub id: String,
    pub matched_id: Option<String>,
    pub method: Option<MatchMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    Events,
    Documents,
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Events => write!(f, "events"),
            Self::Documents => write!(f, "documents"),
        }
    }
}

/// Several records in one pool share a normalized reference; only the first
/// of them is reachable through the reference fast path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateReference {
    pub pool: Pool,
    pub reference: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub duplicate_references: Vec<DuplicateReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideSummary {
    pub total: usize,
    pub by_reference: usize,
    pub by_heuristic: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub events: SideSummary,
    pub documents: SideSummary,
    /// Pairs linked in both directions to each other.
    pub mutual_pairs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub event_links: Vec<Link>,
    pub document_links: Vec<Link>,
    pub diagnostics: Diagnostics,
}

// ---------------------------------------------------------------------------
// Lenient field parsing
// ---------------------------------------------------------------------------

/// Any JSON scalar a fixture might carry in a text or number slot.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(#[allow(dead_code)] bool),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(_) => None,
        }
    }
}

/// Parse a decimal amount, plain or scientific; unparseable text is absent.
pub(crate) fn parse_amount(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("unparseable amount '{trimmed}' treated as absent");
            None
        }
    }
}

/// Parse a `YYYY-MM-DD` date; malformed text is absent.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            log::warn!("unparseable date '{trimmed}' treated as absent");
            None
        }
    }
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Scalar::deserialize(d)?.into_text() {
        Some(id) => Ok(id),
        None => Err(serde::de::Error::custom("record id must be a string or number")),
    }
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?
        .and_then(Scalar::into_text)
        .and_then(non_blank))
}

/// Decimal value of a JSON/TOML float, taken from its shortest round-trip
/// text so that `123456789.01` stays exactly `123456789.01`.
pub(crate) fn decimal_from_f64(n: f64) -> Option<Decimal> {
    if !n.is_finite() {
        return None;
    }
    Decimal::from_str(&n.to_string()).ok()
}

fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Int(n)) => Some(Decimal::from(n)),
        Some(Scalar::Float(n)) => decimal_from_f64(n),
        Some(Scalar::Text(s)) => parse_amount(&s),
        _ => None,
    })
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Text(s)) => parse_date(&s),
        _ => None,
    })
}

fn de_null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
