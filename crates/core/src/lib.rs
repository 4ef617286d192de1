//! Functional core for liftlog.
//!
//! Domain records, the storage contract shared by every backend, the
//! error taxonomy with its HTTP mapping, and bearer credential checks.
//! Nothing in this crate performs I/O.

pub mod auth;
pub mod envelope;
pub mod storage;
pub mod workout;
