//! Outward-facing formats: CSV output for the CLI and Google Pay request JSON.

pub mod csv;
pub mod google_pay;
