use super::transport::TransportError;
use crate::core::fasta::FastaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrthologyError {
    #[error("Input sequence is empty")]
    EmptyInput,

    #[error(
        "The orthology service timed out; could not determine the orthologs of the sequence (status {status})"
    )]
    UpstreamTimeout { status: u16 },

    #[error("The orthology service rejected the request (status {status})")]
    UpstreamError { status: u16 },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed response from '{endpoint}': {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No protein in the orthology database matches the query sequence")]
    NoMatch,

    #[error("Protein '{id}' is not part of any hierarchical orthologous group")]
    NoGroup { id: String },

    #[error("No protein identifier has been resolved for the query")]
    UnresolvedIdentifier,

    #[error("No root taxonomic level has been resolved for protein '{id}'")]
    UnresolvedLevel { id: String },

    #[error("Invalid query sequence: {0}")]
    Fasta(#[from] FastaError),
}

impl OrthologyError {
    /// Whether a failed group retrieval may be retried through pairwise orthologs.
    ///
    /// Timeouts are excluded: the pairwise endpoints sit behind the same gateway.
    pub fn allows_pairwise_fallback(&self) -> bool {
        matches!(
            self,
            OrthologyError::UpstreamError { .. }
                | OrthologyError::Transport(_)
                | OrthologyError::NoGroup { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_upstream_transport_and_missing_group_allow_fallback() {
        assert!(OrthologyError::UpstreamError { status: 500 }.allows_pairwise_fallback());
        assert!(OrthologyError::NoGroup { id: "HUMAN1".into() }.allows_pairwise_fallback());
        assert!(
            OrthologyError::Transport(TransportError::Client("tls".into()))
                .allows_pairwise_fallback()
        );

        assert!(!OrthologyError::UpstreamTimeout { status: 504 }.allows_pairwise_fallback());
        assert!(!OrthologyError::EmptyInput.allows_pairwise_fallback());
        assert!(!OrthologyError::NoMatch.allows_pairwise_fallback());
        assert!(!OrthologyError::Fasta(FastaError::NotASequence).allows_pairwise_fallback());
    }
}
