//! # Workflows Module
//!
//! The top-level entry point of the library: a conservation run that turns a protein
//! sequence into per-residue conservation scores.
//!
//! ## Architecture
//!
//! - **Conservation Workflow** ([`conserve`]) - Ortholog retrieval with the group-to-pairwise
//!   fallback, alignment, rate inference and parsing, with the alignment cached on disk
//!   between runs of the same name.
//!
//! ## Key Capabilities
//!
//! - **Idempotent re-runs** that skip retrieval and alignment when a cached alignment exists
//! - **Explicit cleanup** of intermediate files and of an emptied working directory
//! - **Progress reporting** per stage through [`crate::engine::progress::ProgressReporter`]

pub mod conserve;
