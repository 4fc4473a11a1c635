//! # Engine Module
//!
//! The plumbing underneath the conservation workflow: configuration, the error taxonomy,
//! progress events, the external program invokers and the run's working directory.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Pipeline parameters assembled through a validating builder
//! - **Error Handling** ([`error`]) - [`error::PipelineError`], wrapping every failure a run can hit
//! - **External Programs** ([`invoker`]) - Traits for the aligner and the rate-inference program,
//!   with MAFFT and Rate4Site implementations
//! - **Progress Monitoring** ([`progress`]) - Callback-based stage and event reporting
//! - **Run State** ([`state`]) - The forward-only stage machine of a run
//! - **Working Directory** ([`workspace`]) - Scoped acquisition and explicit release of the
//!   directory holding intermediate files
//!
//! ## Key Capabilities
//!
//! - **Swappable external programs** so the workflow can be driven by test doubles
//! - **Deterministic cleanup** through an explicit close on every exit path
//! - **Early validation** of names, relation types and field selections

pub mod config;
pub mod error;
pub mod invoker;
pub mod progress;
pub mod state;
pub mod workspace;
