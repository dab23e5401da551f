//! Repository modules.
//!
//! Durable storage for triage cases.

pub mod cases;
