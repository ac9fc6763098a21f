//! Core domain types
//!
//! Domain structures shared by the client and the CLI. These represent the
//! voice note as the remote service reports it; clients only ever observe
//! successive snapshots and never mutate them.

pub mod note;
