//! Ingest tools

mod ingest_battles;
mod merge_records;

pub use ingest_battles::IngestBattlesTool;
pub use merge_records::MergeRecordsTool;
