//! Workshop inquiry intake: the public form, the submission handler, and the
//! administrator review listing, backed by a single SQLite table.

pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
