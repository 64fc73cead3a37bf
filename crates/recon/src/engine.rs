use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::error::ReconError;
use crate::evidence::{compute_summary, duplicate_references};
use crate::matcher::{select_attachment, select_transaction};
use crate::model::{
    Diagnostics, Link, MatchRecord, Pool, ReconInput, ReconMeta, ReconResult, Selection,
};

/// Link every event to a document and every document to an event.
///
/// The two directions are independent lookups over the full opposite pool;
/// nothing is consumed, so one document may be the best match of several
/// events.
pub fn run(config: &MatchConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    ensure_unique_ids(Pool::Events, &input.events)?;
    ensure_unique_ids(Pool::Documents, &input.documents)?;

    let event_links: Vec<Link> = input
        .events
        .iter()
        .map(|event| {
            let selection = select_attachment(event, &input.documents, config);
            link(event, selection, &input.documents)
        })
        .collect();

    let document_links: Vec<Link> = input
        .documents
        .iter()
        .map(|document| {
            let selection = select_transaction(document, &input.events, config);
            link(document, selection, &input.events)
        })
        .collect();

    let mut duplicates = duplicate_references(Pool::Events, &input.events);
    duplicates.extend(duplicate_references(Pool::Documents, &input.documents));
    for dup in &duplicates {
        log::warn!(
            "{}: reference {} shared by {}; only {} is reachable by reference",
            dup.pool,
            dup.reference,
            dup.ids.join(", "),
            dup.ids[0]
        );
    }

    let summary = compute_summary(&event_links, &document_links);
    log::info!(
        "matched {}/{} events and {}/{} documents ({} mutual pairs)",
        summary.events.total - summary.events.unmatched,
        summary.events.total,
        summary.documents.total - summary.documents.unmatched,
        summary.documents.total,
        summary.mutual_pairs
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        event_links,
        document_links,
        diagnostics: Diagnostics { duplicate_references: duplicates },
    })
}

fn link<T, C>(target: &T, selection: Option<Selection>, candidates: &[C]) -> Link
where
    T: MatchRecord,
    C: MatchRecord,
{
    Link {
        id: target.id().to_string(),
        matched_id: selection.map(|s| candidates[s.index].id().to_string()),
        method: selection.map(|s| s.method),
        score: selection.and_then(|s| s.score).map(|b| b.total),
    }
}

fn ensure_unique_ids<T: MatchRecord>(pool: Pool, records: &[T]) -> Result<(), ReconError> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id()) {
            return Err(ReconError::DuplicateId {
                source: pool.to_string(),
                id: record.id().to_string(),
            });
        }
    }
    Ok(())
}
