//! # consScore Core Library
//!
//! Computes per-residue evolutionary conservation scores for a protein sequence by
//! retrieving its orthologs from the OMA browser, aligning them with MAFFT and scoring the
//! alignment with Rate4Site.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that text handling, service access and
//! orchestration can be tested in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless FASTA text transforms, the conservation result
//!   model and the Rate4Site output parser. Nothing in this layer touches the network.
//!
//! - **[`orthology`]: The Service Client.** Resolves a query sequence to its orthologs through
//!   the OMA REST API, behind an injectable [`orthology::HttpTransport`].
//!
//! - **[`engine`]: The Plumbing.** Pipeline configuration, error taxonomy, progress reporting,
//!   external process invokers and the scoped working directory.
//!
//! - **[`workflows`]: The Public API.** The conservation pipeline that ties the layers together:
//!   orthologs, then alignment, then scores, with on-disk caching of the alignment.

pub mod core;
pub mod engine;
pub mod orthology;
pub mod workflows;
