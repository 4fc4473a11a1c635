//! # Orthology Module
//!
//! Access to the OMA browser REST API: resolves a query sequence to an OMA protein and
//! downloads the sequences of its orthologs.
//!
//! ## Architecture
//!
//! - **Transport** ([`transport`]) - The [`HttpTransport`] seam and its blocking `reqwest`
//!   implementation
//! - **Client** ([`client`]) - The per-query state machine: identifier, taxonomic level, then
//!   FASTA retrieval
//! - **Errors** ([`error`]) - Status-code classification and the pairwise fallback policy
//!
//! ## Retrieval Modes
//!
//! Two entry points exist. [`OrthologyClient::get_hogs`] returns the hierarchical
//! orthologous group (HOG) of the query protein, a tighter set of close relatives.
//! [`OrthologyClient::get_orthologs`] returns the pairwise orthologs. Callers that prefer
//! groups but can live with pairwise orthologs consult
//! [`OrthologyError::allows_pairwise_fallback`] when group retrieval fails.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{
    OMA_BASE_URL, OrthologQuery, OrthologyClient, QueryState, TaxonomicLevel, build_url,
};
pub use error::OrthologyError;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
