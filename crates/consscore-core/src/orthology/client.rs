use super::error::OrthologyError;
use super::transport::HttpTransport;
use crate::core::fasta;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

pub const OMA_BASE_URL: &str = "https://omabrowser.org";

const STATUS_OK: u16 = 200;
const STATUS_GATEWAY_TIMEOUT: u16 = 504;

/// Joins a service base URL and an endpoint path with exactly one `/` between them.
pub fn build_url(base: &str, tail: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        tail.trim_start_matches('/')
    )
}

/// The taxonomic span of a hierarchical orthologous group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomicLevel {
    /// The deepest level the group reaches; group FASTA is fetched at this level.
    Root(String),
    /// Every alternative level the group spans.
    Alternatives(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Uninitialized,
    IdentifierResolved,
    LevelResolved,
    Fetched,
}

/// One retrieval session against the orthology service.
#[derive(Debug, Clone, Default)]
pub struct OrthologQuery {
    sequence: String,
    id: Option<String>,
    rel_type: Option<String>,
    level: Option<TaxonomicLevel>,
    hogs: Option<String>,
    pairwise: Option<String>,
}

impl OrthologQuery {
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn rel_type(&self) -> Option<&str> {
        self.rel_type.as_deref()
    }

    pub fn level(&self) -> Option<&TaxonomicLevel> {
        self.level.as_ref()
    }

    pub fn state(&self) -> QueryState {
        if self.hogs.is_some() || self.pairwise.is_some() {
            QueryState::Fetched
        } else if matches!(self.level, Some(TaxonomicLevel::Root(_))) {
            QueryState::LevelResolved
        } else if self.id.is_some() {
            QueryState::IdentifierResolved
        } else {
            QueryState::Uninitialized
        }
    }

    fn require_id(&self) -> Result<&str, OrthologyError> {
        self.id().ok_or(OrthologyError::UnresolvedIdentifier)
    }
}

#[derive(Debug, Deserialize)]
struct SequenceSearch {
    #[serde(default)]
    targets: Vec<SequenceTarget>,
}

#[derive(Debug, Deserialize)]
struct SequenceTarget {
    omaid: String,
}

#[derive(Debug, Deserialize)]
struct HogMembership {
    level: String,
    #[serde(default)]
    alternative_levels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OrthologEntry {
    canonicalid: String,
}

/// Client for the OMA browser REST API.
///
/// Results of [`get_hogs`](Self::get_hogs) and [`get_orthologs`](Self::get_orthologs) are
/// cached for the lifetime of the client, so repeated calls never hit the service twice.
pub struct OrthologyClient<'t> {
    transport: &'t dyn HttpTransport,
    base_url: String,
    input: String,
    query: OrthologQuery,
}

impl<'t> OrthologyClient<'t> {
    /// Creates a client for `input`, either FASTA text or a bare one-letter sequence.
    pub fn new(transport: &'t dyn HttpTransport, input: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: OMA_BASE_URL.to_string(),
            input: input.into(),
            query: OrthologQuery::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Restricts pairwise orthologs to one relation type (`1:1`, `1:n`, `m:1` or `m:n`).
    pub fn with_rel_type(mut self, rel_type: Option<String>) -> Self {
        self.query.rel_type = rel_type;
        self
    }

    pub fn query(&self) -> &OrthologQuery {
        &self.query
    }

    /// Looks up the best-matching protein for the query sequence and stores its identifier.
    ///
    /// Every call performs a fresh lookup.
    #[instrument(skip_all, name = "resolve_identifier")]
    pub fn resolve_identifier(&mut self) -> Result<&str, OrthologyError> {
        if self.query.sequence.is_empty() {
            self.load_sequence()?;
        }
        let tail = format!("/api/sequence/?query={}", self.query.sequence);
        let search: SequenceSearch = self.request_json(&tail)?;
        let target = search
            .targets
            .into_iter()
            .next()
            .ok_or(OrthologyError::NoMatch)?;

        info!(id = %target.omaid, "Resolved query sequence to protein.");
        Ok(self.query.id.insert(target.omaid).as_str())
    }

    /// Looks up the taxonomic span of the query protein's group.
    ///
    /// With `root` the deepest level is stored and returned; otherwise the list of
    /// alternative levels is.
    pub fn resolve_taxonomic_level(
        &mut self,
        root: bool,
    ) -> Result<&TaxonomicLevel, OrthologyError> {
        let id = self.query.require_id()?.to_string();
        let tail = format!("/api/hog/{}/", id);
        let memberships: Vec<HogMembership> = self.request_json(&tail)?;
        let membership = memberships
            .into_iter()
            .next()
            .ok_or(OrthologyError::NoGroup { id })?;

        let level = if root {
            TaxonomicLevel::Root(membership.level)
        } else {
            TaxonomicLevel::Alternatives(membership.alternative_levels)
        };
        debug!(level = ?level, "Resolved taxonomic level.");
        Ok(self.query.level.insert(level))
    }

    /// Downloads the FASTA text of the whole group at the resolved root level.
    pub fn fetch_group_fasta(&mut self) -> Result<String, OrthologyError> {
        let id = self.query.require_id()?;
        let level = match &self.query.level {
            Some(TaxonomicLevel::Root(level)) => level,
            _ => {
                return Err(OrthologyError::UnresolvedLevel { id: id.to_string() });
            }
        };
        let tail = format!("/oma/hogs/{}/{}/fasta/", id, level);
        self.request(&tail)
    }

    /// Downloads the FASTA text of the query protein's pairwise orthologs, filtered by the
    /// relation type when one is configured.
    pub fn fetch_pairwise_fasta(&mut self) -> Result<String, OrthologyError> {
        let tail = format!("/oma/vps/{}/fasta/", self.query.require_id()?);
        let orthologs = self.request(&tail)?;
        Ok(match self.query.rel_type() {
            Some(rel_type) => fasta::retain_records_containing(&orthologs, rel_type),
            None => orthologs,
        })
    }

    /// Lists the canonical identifiers of the query protein's orthologs.
    pub fn fetch_ortholog_ids(&mut self) -> Result<Vec<String>, OrthologyError> {
        let id = self.query.require_id()?;
        let tail = match self.query.rel_type() {
            Some(rel_type) => format!("/api/protein/{}/orthologs/?rel_type={}", id, rel_type),
            None => format!("/api/protein/{}/orthologs/", id),
        };
        let entries: Vec<OrthologEntry> = self.request_json(&tail)?;
        Ok(entries.into_iter().map(|entry| entry.canonicalid).collect())
    }

    /// Pairwise orthologs of the query, headed by the query sequence itself.
    ///
    /// The service echoes the best match first; that record is replaced by the query.
    #[instrument(skip_all, name = "get_orthologs")]
    pub fn get_orthologs(&mut self) -> Result<String, OrthologyError> {
        self.load_sequence()?;
        if let Some(cached) = &self.query.pairwise {
            debug!("Returning cached pairwise orthologs.");
            return Ok(cached.clone());
        }

        self.resolve_identifier()?;
        let orthologs = fasta::remove_first_record(&self.fetch_pairwise_fasta()?);
        let query_record = fasta::strip_internal_newlines(&self.query.sequence)?;
        let output = format!("{}\n{}", query_record, orthologs);

        info!(
            records = fasta::split_into_records(&output).len(),
            "Retrieved pairwise orthologs."
        );
        Ok(self.query.pairwise.insert(output).clone())
    }

    /// Members of the query protein's hierarchical orthologous group, without the query
    /// protein's own entry.
    #[instrument(skip_all, name = "get_hogs")]
    pub fn get_hogs(&mut self) -> Result<String, OrthologyError> {
        self.load_sequence()?;
        if let Some(cached) = &self.query.hogs {
            debug!("Returning cached group members.");
            return Ok(cached.clone());
        }

        let id = self.resolve_identifier()?.to_string();
        self.resolve_taxonomic_level(true)?;
        let output = fasta::remove_record_by_id(&self.fetch_group_fasta()?, &id);

        info!(
            records = fasta::split_into_records(&output).len(),
            "Retrieved hierarchical orthologous group."
        );
        Ok(self.query.hogs.insert(output).clone())
    }

    fn load_sequence(&mut self) -> Result<(), OrthologyError> {
        if self.input.trim().is_empty() {
            return Err(OrthologyError::EmptyInput);
        }
        self.query.sequence = fasta::extract_sequence(&self.input, 0)?;
        Ok(())
    }

    fn request(&self, tail: &str) -> Result<String, OrthologyError> {
        let url = build_url(&self.base_url, tail);
        debug!(url = %url, "Querying orthology service.");

        let response = self.transport.get(&url)?;
        match response.status {
            STATUS_OK => Ok(response.body),
            STATUS_GATEWAY_TIMEOUT => Err(OrthologyError::UpstreamTimeout {
                status: response.status,
            }),
            status => Err(OrthologyError::UpstreamError { status }),
        }
    }

    fn request_json<T: DeserializeOwned>(&self, tail: &str) -> Result<T, OrthologyError> {
        let body = self.request(tail)?;
        serde_json::from_str(&body).map_err(|source| OrthologyError::MalformedResponse {
            endpoint: tail.to_string(),
            source,
        })
    }
}
