//! Provides input functionality for the output files of external programs.
//!
//! Each submodule understands exactly one program's output format and turns it into the
//! typed models of [`crate::core::models`].

pub mod rate4site;
