//! # History Store
//!
//! Bounded, append-only reading log with best-effort CSV persistence.
//!
//! The in-memory log is authoritative while the process runs; the CSV file
//! is rewritten wholesale on each autosave so it always mirrors the bounded
//! (possibly truncated) log. On startup the log is restored from the file
//! when one exists.

mod persist;
mod store;

pub use persist::{load_csv, save_csv};
pub use store::HistoryStore;
