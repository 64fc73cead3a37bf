//! `docmatch run`, `explain`, `validate`: file-driven matching.

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Subcommand};
use docmatch_recon::loader::{read_documents, read_events};
use docmatch_recon::model::{Explanation, ReconInput};
use docmatch_recon::{MatchConfig, ReconError};

use crate::exit_codes::{
    recon_exit_code, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_UNMATCHED, EXIT_USAGE,
};
use crate::util::{fmt_number, pad_right};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Link every event to a document and every document to an event
    #[command(after_help = "\
Exit code 5 with --fail-on-unmatched means at least one record found no match.

Examples:
  docmatch run transactions.json attachments.json
  docmatch run transactions.csv attachments.csv --json
  docmatch run transactions.json attachments.json --config strict.toml --output links.json")]
    Run {
        /// Events file (.json or .csv)
        events: PathBuf,

        /// Documents file (.json or .csv)
        documents: PathBuf,

        /// Match config (TOML); built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit 5 when any event or document is unmatched
        #[arg(long)]
        fail_on_unmatched: bool,
    },

    /// Show how every candidate scores against one event or document
    #[command(group(ArgGroup::new("target").required(true).args(["event", "document"])))]
    #[command(after_help = "\
Examples:
  docmatch explain transactions.json attachments.json --event 2003
  docmatch explain transactions.json attachments.json --document 3005 --json")]
    Explain {
        /// Events file (.json or .csv)
        events: PathBuf,

        /// Documents file (.json or .csv)
        documents: PathBuf,

        /// Explain the attachment search for this event id
        #[arg(long, value_name = "ID")]
        event: Option<String>,

        /// Explain the transaction search for this document id
        #[arg(long, value_name = "ID")]
        document: Option<String>,

        /// Match config (TOML); built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a match config without running
    #[command(after_help = "\
Examples:
  docmatch validate strict.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { events, documents, config, json, output, fail_on_unmatched } => {
            cmd_run(&events, &documents, config.as_deref(), json, output, fail_on_unmatched)
        }
        ReconCommands::Explain { events, documents, event, document, config, json } => {
            cmd_explain(&events, &documents, event, document, config.as_deref(), json)
        }
        ReconCommands::Validate { config } => cmd_validate(&config),
    }
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        recon_err(recon_exit_code(&err), err.to_string())
    }
}

fn load_config(path: Option<&Path>) -> Result<MatchConfig, CliError> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        recon_err(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = MatchConfig::from_toml(&text)?;
    log::debug!("using config '{}' from {}", config.name, path.display());
    Ok(config)
}

fn load_input(events: &Path, documents: &Path) -> Result<ReconInput, CliError> {
    Ok(ReconInput {
        events: read_events(events)?,
        documents: read_documents(documents)?,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| recon_err(EXIT_ERROR, format!("JSON serialization error: {e}")))
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    events_path: &Path,
    documents_path: &Path,
    config_path: Option<&Path>,
    json_output: bool,
    output_file: Option<PathBuf>,
    fail_on_unmatched: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let input = load_input(events_path, documents_path)?;
    let result = docmatch_recon::run(&config, &input)?;

    let json_str = to_json(&result)?;
    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_ERROR, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "events: {} total, {} by reference, {} heuristic, {} unmatched",
        s.events.total, s.events.by_reference, s.events.by_heuristic, s.events.unmatched,
    );
    eprintln!(
        "documents: {} total, {} by reference, {} heuristic, {} unmatched",
        s.documents.total,
        s.documents.by_reference,
        s.documents.by_heuristic,
        s.documents.unmatched,
    );
    eprintln!("mutual pairs: {}", s.mutual_pairs);
    let dups = &result.diagnostics.duplicate_references;
    if !dups.is_empty() {
        eprintln!("duplicate references: {}", dups.len());
    }

    let unmatched = s.events.unmatched + s.documents.unmatched;
    if fail_on_unmatched && unmatched > 0 {
        return Err(recon_err(EXIT_UNMATCHED, format!("{unmatched} unmatched records")));
    }
    Ok(())
}

// ============================================================================
// explain
// ============================================================================

fn cmd_explain(
    events_path: &Path,
    documents_path: &Path,
    event_id: Option<String>,
    document_id: Option<String>,
    config_path: Option<&Path>,
    json_output: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let input = load_input(events_path, documents_path)?;

    let explanation = match (event_id, document_id) {
        (Some(id), _) => {
            let event = input.events.iter().find(|e| e.id == id).ok_or_else(|| {
                unknown_id("event", &id, events_path)
            })?;
            docmatch_recon::explain(event, &input.documents, &config)
        }
        (None, Some(id)) => {
            let document = input.documents.iter().find(|d| d.id == id).ok_or_else(|| {
                unknown_id("document", &id, documents_path)
            })?;
            docmatch_recon::explain(document, &input.events, &config)
        }
        (None, None) => {
            return Err(recon_err(EXIT_USAGE, "one of --event or --document is required"));
        }
    };

    if json_output {
        println!("{}", to_json(&explanation)?);
    } else {
        print_explanation(&explanation);
    }
    Ok(())
}

fn unknown_id(kind: &str, id: &str, path: &Path) -> CliError {
    recon_err(EXIT_USAGE, format!("no {kind} with id '{id}'"))
        .with_hint(format!("check the ids in {}", path.display()))
}

const ID_WIDTH: usize = 12;
const NUM_WIDTH: usize = 7;

fn print_explanation(explanation: &Explanation) {
    println!(
        "{} {} {} {} {} {} outcome",
        pad_right("candidate", ID_WIDTH),
        pad_right("ref", 4),
        pad_right("amount", NUM_WIDTH),
        pad_right("date", NUM_WIDTH),
        pad_right("name", 4),
        pad_right("total", NUM_WIDTH),
    );
    for outcome in &explanation.candidates {
        let (amount, date, name, total) = match outcome.score {
            Some(b) => (Some(b.amount), Some(b.date), b.name.to_string(), Some(b.total)),
            None => (None, None, "-".to_string(), None),
        };
        let verdict = match &outcome.rejection {
            Some(rejection) => rejection.to_string(),
            None => "accepted".to_string(),
        };
        println!(
            "{} {} {} {} {} {} {}",
            pad_right(&outcome.id, ID_WIDTH),
            pad_right(if outcome.reference_match { "yes" } else { "no" }, 4),
            pad_right(&fmt_number(amount), NUM_WIDTH),
            pad_right(&fmt_number(date), NUM_WIDTH),
            pad_right(&name, 4),
            pad_right(&fmt_number(total), NUM_WIDTH),
            verdict,
        );
    }
    match (&explanation.selected_id, explanation.method) {
        (Some(id), Some(method)) => println!("{} -> {id} ({method})", explanation.target_id),
        _ => println!("{} -> no match", explanation.target_id),
    }
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let config = load_config(Some(config_path))?;
    eprintln!(
        "valid: {} (amount tolerance {}, date window {} days)",
        config.name, config.tolerance.amount, config.tolerance.date_window_days,
    );
    Ok(())
}
