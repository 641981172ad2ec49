pub mod analyze;
pub mod ingest;
pub mod inventory;
