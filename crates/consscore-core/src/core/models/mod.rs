//! # Core Models Module
//!
//! Data structures describing the result of a conservation run.
//!
//! ## Key Components
//!
//! - [`conservation`] - Per-residue result tuples, the field selection that shapes them and
//!   the ordered record set returned by the pipeline

pub mod conservation;
