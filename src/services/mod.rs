//! Business logic services.
//!
//! Services sit between the storage layer and the shell: the ledger owns the
//! dual representation of the feedback collection, the exporter renders a
//! snapshot of it to a file.

mod export;
mod ledger;

pub use export::{ExportFormat, export_to_path, write_csv, write_json};
pub use ledger::FeedbackLedger;
