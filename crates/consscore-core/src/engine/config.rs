use crate::core::models::conservation::{FieldSelection, ValueRepresentation};
use crate::orthology::OMA_BASE_URL;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Run name used when neither an explicit name nor an input file name is available.
pub const DEFAULT_RUN_NAME: &str = "Protein_Sequence";
/// Name of the working subdirectory created under the work root.
pub const DEFAULT_WORK_DIR_NAME: &str = "Sequence_Alignments";

pub const REL_TYPES: [&str; 4] = ["1:1", "1:n", "m:1", "m:n"];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How orthologs are obtained for the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalMode {
    /// Hierarchical orthologous group first, pairwise orthologs if the group is unavailable.
    #[default]
    HogsWithFallback,
    PairwiseOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrthologyConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub rel_type: Option<String>,
}

impl Default for OrthologyConfig {
    fn default() -> Self {
        Self {
            base_url: OMA_BASE_URL.to_string(),
            timeout: None,
            rel_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramConfig {
    pub mafft: PathBuf,
    pub rate4site: PathBuf,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            mafft: PathBuf::from("mafft"),
            rate4site: PathBuf::from("rate4site"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputConfig {
    pub fields: FieldSelection,
    pub representation: ValueRepresentation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Explicit run name; derived from the input when absent.
    pub name: Option<String>,
    /// Directory that holds every intermediate file of the run.
    pub work_dir: PathBuf,
    /// Keep the alignment and score files after the run.
    pub keep_cache: bool,
    pub retrieval: RetrievalMode,
    pub orthology: OrthologyConfig,
    pub programs: ProgramConfig,
    pub output: OutputConfig,
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    name: Option<String>,
    work_root: Option<PathBuf>,
    work_dir_name: Option<String>,
    keep_cache: Option<bool>,
    retrieval: Option<RetrievalMode>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    rel_type: Option<String>,
    mafft: Option<PathBuf>,
    rate4site: Option<PathBuf>,
    fields: Option<FieldSelection>,
    representation: Option<ValueRepresentation>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn work_root(mut self, root: PathBuf) -> Self {
        self.work_root = Some(root);
        self
    }
    pub fn work_dir_name(mut self, name: impl Into<String>) -> Self {
        self.work_dir_name = Some(name.into());
        self
    }
    pub fn keep_cache(mut self, keep: bool) -> Self {
        self.keep_cache = Some(keep);
        self
    }
    pub fn retrieval(mut self, mode: RetrievalMode) -> Self {
        self.retrieval = Some(mode);
        self
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn rel_type(mut self, rel_type: impl Into<String>) -> Self {
        self.rel_type = Some(rel_type.into());
        self
    }
    pub fn mafft(mut self, program: PathBuf) -> Self {
        self.mafft = Some(program);
        self
    }
    pub fn rate4site(mut self, program: PathBuf) -> Self {
        self.rate4site = Some(program);
        self
    }
    pub fn fields(mut self, fields: FieldSelection) -> Self {
        self.fields = Some(fields);
        self
    }
    pub fn representation(mut self, representation: ValueRepresentation) -> Self {
        self.representation = Some(representation);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let work_root = self
            .work_root
            .ok_or(ConfigError::MissingParameter("work_root"))?;
        let work_dir_name = self
            .work_dir_name
            .unwrap_or_else(|| DEFAULT_WORK_DIR_NAME.to_string());
        validate_file_stem("work_dir_name", &work_dir_name)?;

        if let Some(name) = &self.name {
            validate_file_stem("name", name)?;
        }

        if let Some(rel_type) = &self.rel_type {
            if !REL_TYPES.contains(&rel_type.as_str()) {
                return Err(ConfigError::InvalidParameter {
                    name: "rel_type",
                    reason: format!(
                        "'{}' is not one of {}",
                        rel_type,
                        REL_TYPES.join(", ")
                    ),
                });
            }
        }

        let fields = self.fields.unwrap_or_default();
        if fields.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "fields",
                reason: "at least one output field must be enabled".to_string(),
            });
        }

        let defaults = OrthologyConfig::default();
        let base_url = self.base_url.unwrap_or(defaults.base_url);
        if base_url.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "base_url",
                reason: "must not be empty".to_string(),
            });
        }

        let programs = ProgramConfig::default();
        Ok(PipelineConfig {
            name: self.name,
            work_dir: work_root.join(work_dir_name),
            keep_cache: self.keep_cache.unwrap_or(true),
            retrieval: self.retrieval.unwrap_or_default(),
            orthology: OrthologyConfig {
                base_url,
                timeout: self.timeout,
                rel_type: self.rel_type,
            },
            programs: ProgramConfig {
                mafft: self.mafft.unwrap_or(programs.mafft),
                rate4site: self.rate4site.unwrap_or(programs.rate4site),
            },
            output: OutputConfig {
                fields,
                representation: self.representation.unwrap_or_default(),
            },
        })
    }
}

/// Run names become file names, so they must be a single non-empty path component.
fn validate_file_stem(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: "must not be empty".to_string(),
        });
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("'{}' must be a plain file name", value),
        });
    }
    Ok(())
}
