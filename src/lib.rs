//! waypoint — ambassador journey dashboard with live stats sync.
//!
//! The dashboard's metrics (journey stage, completed tasks, hero text) live
//! in a server-side store and are synchronized into the display at page load
//! and on a refresh interval. The [`sync`] module implements the
//! synchronizer contract: update three designated regions in place, retain
//! last-known-good values on any failure, and never touch state owned by
//! other dashboard modules or the legacy local store.

pub mod cli;
pub mod config;
pub mod store;
pub mod sync;
pub mod web;
