use crate::cli::{OrthologsArgs, RetrievalFlags, ScoreArgs};
use crate::error::{CliError, Result};
use consscore::core::models::conservation::{FieldSelection, ValueRepresentation};
use consscore::engine::config as core_config;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialRetrievalMode {
    Hogs,
    Pairwise,
}

impl From<PartialRetrievalMode> for core_config::RetrievalMode {
    fn from(p: PartialRetrievalMode) -> Self {
        match p {
            PartialRetrievalMode::Hogs => core_config::RetrievalMode::HogsWithFallback,
            PartialRetrievalMode::Pairwise => core_config::RetrievalMode::PairwiseOnly,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialServiceConfig {
    #[serde(rename = "base-url")]
    base_url: Option<String>,
    #[serde(rename = "timeout-secs")]
    timeout_secs: Option<u64>,
    #[serde(rename = "rel-type")]
    rel_type: Option<String>,
    retrieval: Option<PartialRetrievalMode>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialProgramsConfig {
    mafft: Option<PathBuf>,
    rate4site: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPipelineConfig {
    #[serde(rename = "work-dir")]
    work_dir: Option<PathBuf>,
    #[serde(rename = "work-dir-name")]
    work_dir_name: Option<String>,
    cache: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    fields: Option<Vec<String>>,
    #[serde(rename = "text-values")]
    text_values: Option<bool>,
}

/// Settings read from a TOML file, every one optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConsScoreConfig {
    service: Option<PartialServiceConfig>,
    programs: Option<PartialProgramsConfig>,
    pipeline: Option<PartialPipelineConfig>,
    output: Option<PartialOutputConfig>,
}

impl PartialConsScoreConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `explicit` if given, else the default config file if one exists, else nothing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found, using built-in defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "consscore", "consscore")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Combines the file with the `score` arguments. Command-line flags win over `--set`
    /// values, which win over the file, which wins over built-in defaults.
    pub fn merge_with_cli(
        mut self,
        args: &ScoreArgs,
        current_dir: &Path,
    ) -> Result<core_config::PipelineConfig> {
        self.apply_set_values(&args.set_values)?;

        let mut builder = self.service_builder(args.retrieval, args.rel_type.as_ref())?;
        let pipeline = self.pipeline.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let work_root = args
            .work_dir
            .clone()
            .or(pipeline.work_dir)
            .map(|dir| current_dir.join(dir))
            .unwrap_or_else(|| current_dir.to_path_buf());
        builder = builder.work_root(work_root);
        if let Some(name) = pipeline.work_dir_name {
            builder = builder.work_dir_name(name);
        }
        if let Some(name) = &args.name {
            builder = builder.name(name.clone());
        }

        let keep_cache = !args.no_cache && pipeline.cache.unwrap_or(true);
        builder = builder.keep_cache(keep_cache);

        let field_names = if args.fields.is_empty() {
            output.fields
        } else {
            Some(args.fields.clone())
        };
        if let Some(names) = field_names {
            let fields = FieldSelection::from_names(&names)
                .map_err(|e| CliError::Argument(e.to_string()))?;
            builder = builder.fields(fields);
        }

        let text_values = args.text_values || output.text_values.unwrap_or(false);
        builder = builder.representation(if text_values {
            ValueRepresentation::Text
        } else {
            ValueRepresentation::Numeric
        });

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    /// Combines the file with the `orthologs` arguments. Only service settings apply.
    pub fn merge_for_orthologs(
        mut self,
        args: &OrthologsArgs,
        current_dir: &Path,
    ) -> Result<core_config::PipelineConfig> {
        self.service_builder(args.retrieval, args.rel_type.as_ref())?
            .work_root(current_dir.to_path_buf())
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn service_builder(
        &mut self,
        flags: RetrievalFlags,
        cli_rel_type: Option<&String>,
    ) -> Result<core_config::PipelineConfigBuilder> {
        let service = self.service.take().unwrap_or_default();
        let programs = self.programs.take().unwrap_or_default();

        let mut builder = core_config::PipelineConfigBuilder::new()
            .retrieval(Self::merge_retrieval(flags, service.retrieval));

        if let Some(url) = service.base_url {
            builder = builder.base_url(url);
        }
        match service.timeout_secs {
            Some(0) => {
                return Err(CliError::Config(
                    "`service.timeout-secs` must be greater than zero.".to_string(),
                ));
            }
            Some(secs) => builder = builder.timeout(Duration::from_secs(secs)),
            None => {}
        }
        if let Some(rel_type) = cli_rel_type.cloned().or(service.rel_type) {
            builder = builder.rel_type(rel_type);
        }
        if let Some(mafft) = programs.mafft {
            builder = builder.mafft(mafft);
        }
        if let Some(rate4site) = programs.rate4site {
            builder = builder.rate4site(rate4site);
        }
        Ok(builder)
    }

    fn merge_retrieval(
        cli_flags: RetrievalFlags,
        file_val: Option<PartialRetrievalMode>,
    ) -> core_config::RetrievalMode {
        if cli_flags.hogs {
            core_config::RetrievalMode::HogsWithFallback
        } else if cli_flags.pairwise {
            core_config::RetrievalMode::PairwiseOnly
        } else if let Some(val) = file_val {
            val.into()
        } else {
            core_config::RetrievalMode::default()
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "service.base-url" => {
                    self.service.get_or_insert_with(Default::default).base_url =
                        Some(value_str.to_string());
                }
                "service.timeout-secs" => {
                    self.service
                        .get_or_insert_with(Default::default)
                        .timeout_secs = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                "service.rel-type" => {
                    self.service.get_or_insert_with(Default::default).rel_type =
                        Some(value_str.to_string());
                }
                "service.retrieval" => {
                    let mode = match value_str {
                        "hogs" => PartialRetrievalMode::Hogs,
                        "pairwise" => PartialRetrievalMode::Pairwise,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid value for {}: '{}'. Expected 'hogs' or 'pairwise'.",
                                key, value_str
                            )));
                        }
                    };
                    self.service.get_or_insert_with(Default::default).retrieval = Some(mode);
                }
                "programs.mafft" => {
                    self.programs.get_or_insert_with(Default::default).mafft =
                        Some(PathBuf::from(value_str));
                }
                "programs.rate4site" => {
                    self.programs.get_or_insert_with(Default::default).rate4site =
                        Some(PathBuf::from(value_str));
                }
                "pipeline.work-dir" => {
                    self.pipeline.get_or_insert_with(Default::default).work_dir =
                        Some(PathBuf::from(value_str));
                }
                "pipeline.cache" => {
                    self.pipeline.get_or_insert_with(Default::default).cache =
                        Some(parse_bool(key, value_str)?);
                }
                "output.fields" => {
                    self.output.get_or_insert_with(Default::default).fields = Some(
                        value_str
                            .split(',')
                            .map(str::trim)
                            .filter(|name| !name.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                "output.text-values" => {
                    self.output.get_or_insert_with(Default::default).text_values =
                        Some(parse_bool(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid boolean value for {}: {} (expected true or false)",
            key, value
        ))
    })
}
