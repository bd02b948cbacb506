//! Purpose: Library crate behind the `dbf2sql` CLI.
//! Exports: `core` (DBF loading, table model, errors), `sql` (script emitters),
//! `output` (sink selection), `convert` (end-to-end run).
//! Role: Keeps the binary a thin argument parser over explicit inputs/outputs.
//! Invariants: Nothing here touches process-wide state; writers are passed in.
pub mod convert;
pub mod core;
pub mod output;
pub mod sql;
