//! # Core Module
//!
//! Pure data handling for the conservation pipeline: everything here works on strings and
//! files, never on the network or on external programs.
//!
//! ## Architecture
//!
//! - **Sequence Text** ([`fasta`]) - Slicing, stripping and filtering of multi-record FASTA text
//! - **Result Model** ([`models`]) - Per-residue conservation records and field selection
//! - **File I/O** ([`io`]) - Parsing of the Rate4Site score table
//!
//! ## Key Capabilities
//!
//! - **Record-level FASTA manipulation** that keeps record order and header/sequence boundaries
//! - **Configurable result tuples** built from a fixed field order
//! - **All-or-nothing parsing** of rate-inference output, so partial results never escape

pub mod fasta;
pub mod io;
pub mod models;
