use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "consScore CLI - Per-residue evolutionary conservation scores from OMA orthologs, MAFFT alignments and Rate4Site.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute per-residue conservation scores for a protein sequence.
    Score(ScoreArgs),
    /// Retrieve the orthologs of a protein sequence as FASTA text.
    Orthologs(OrthologsArgs),
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Protein sequence in one-letter code, FASTA text, or the path of a FASTA file.
    #[arg(required = true, value_name = "SEQUENCE_OR_FILE")]
    pub input: String,

    /// Name of the run; names the intermediate files and the `<NAME> data` output.
    /// Defaults to the input file name, or `Protein_Sequence` for literal sequences.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub retrieval: RetrievalFlags,

    /// Keep only pairwise orthologs of this relation type (1:1, 1:n, m:1 or m:n).
    #[arg(long, value_name = "TYPE")]
    pub rel_type: Option<String>,

    /// Output fields, in any order: identity, score, interval, std-dev, gap-ratio.
    #[arg(short, long, value_name = "FIELD", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Keep scores, intervals and deviations exactly as Rate4Site printed them.
    #[arg(long)]
    pub text_values: bool,

    /// Delete the alignment and score files after the run.
    #[arg(long)]
    pub no_cache: bool,

    /// Directory under which the `Sequence_Alignments` working directory is created.
    /// Defaults to the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub work_dir: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the user configuration directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S service.timeout-secs=60
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `orthologs` subcommand.
#[derive(Args, Debug)]
pub struct OrthologsArgs {
    /// Protein sequence in one-letter code, FASTA text, or the path of a FASTA file.
    #[arg(required = true, value_name = "SEQUENCE_OR_FILE")]
    pub input: String,

    #[command(flatten)]
    pub retrieval: RetrievalFlags,

    /// Keep only pairwise orthologs of this relation type (1:1, 1:n, m:1 or m:n).
    #[arg(long, value_name = "TYPE")]
    pub rel_type: Option<String>,

    /// Write the orthologs to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// A group to handle the mutually exclusive ortholog retrieval modes.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct RetrievalFlags {
    /// Retrieve the hierarchical orthologous group, falling back to pairwise orthologs.
    #[arg(long)]
    pub hogs: bool,
    /// Retrieve pairwise orthologs only.
    #[arg(long)]
    pub pairwise: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_parses_fields_and_flags() {
        let cli = Cli::try_parse_from([
            "consscore",
            "-vv",
            "score",
            "MVLSPADKTN",
            "--fields",
            "identity,score,gap-ratio",
            "--pairwise",
            "--no-cache",
            "-S",
            "service.timeout-secs=10",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Score(args) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(args.input, "MVLSPADKTN");
        assert_eq!(args.fields, vec!["identity", "score", "gap-ratio"]);
        assert!(args.retrieval.pairwise);
        assert!(!args.retrieval.hogs);
        assert!(args.no_cache);
        assert_eq!(args.set_values, vec!["service.timeout-secs=10"]);
    }

    #[test]
    fn hogs_and_pairwise_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["consscore", "score", "MVLS", "--hogs", "--pairwise"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["consscore", "-q", "-v", "orthologs", "MVLS"]);
        assert!(result.is_err());
    }

    #[test]
    fn orthologs_accepts_output_path() {
        let cli =
            Cli::try_parse_from(["consscore", "orthologs", "query.fasta", "-o", "out.fasta"])
                .unwrap();
        let Commands::Orthologs(args) = cli.command else {
            panic!("expected orthologs command");
        };
        assert_eq!(args.output, Some(PathBuf::from("out.fasta")));
    }
}
