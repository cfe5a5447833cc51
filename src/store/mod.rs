//! Server-side persistent stats store.
//!
//! The store is an append-only JSONL log of tracked ambassador actions plus
//! an aggregation layer that folds the log into per-ambassador stats. The
//! log is the source of truth the dashboard synchronizes from — the client
//! never writes it.

pub mod logger;
pub mod reporter;
