//! `docmatch-recon`: links payment events to supporting documents.
//!
//! Pure engine crate: receives pre-loaded records, returns the best match per
//! record in either direction. Selection is a deterministic function of the
//! target and the ordered candidate list. No CLI dependencies.

pub mod amount;
pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod loader;
pub mod matcher;
pub mod model;
pub mod name;
pub mod reference;
pub mod scorer;

pub use config::{MatchConfig, DEFAULT_SELF_COMPANY};
pub use engine::run;
pub use error::ReconError;
pub use matcher::{
    explain, find_attachment, find_attachment_with, find_transaction, find_transaction_with,
    select, select_attachment, select_transaction,
};
pub use model::{Document, DocumentData, Event, ReconInput, ReconResult};
