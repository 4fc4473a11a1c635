use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("'{program}' finished without producing '{path}'", path = path.display())]
    MissingOutput { program: String, path: PathBuf },
    #[error("I/O error at '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Builds a multiple sequence alignment from a FASTA file.
pub trait AlignmentInvoker {
    /// Aligns the sequences in `input` and writes the alignment to `output`.
    fn align(&self, input: &Path, output: &Path) -> Result<(), InvocationError>;

    /// Disposes of the alignment unless it is kept as a cache.
    fn cleanup(&self, output: &Path, keep: bool) -> Result<(), InvocationError> {
        if keep {
            return Ok(());
        }
        remove_if_exists(output)
    }
}

/// Files produced by one scoring run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreArtifacts {
    pub table: PathBuf,
    pub tree: PathBuf,
}

impl ScoreArtifacts {
    /// `<name>.res` and `<name>.tree` in the directory holding `msa`.
    pub fn beside(msa: &Path, name: &str) -> Self {
        let dir = msa.parent().unwrap_or_else(|| Path::new(""));
        Self {
            table: dir.join(format!("{}.res", name)),
            tree: dir.join(format!("{}.tree", name)),
        }
    }
}

/// Infers per-column evolutionary rates from an alignment.
pub trait ScoreInvoker {
    /// Scores `msa`, writing the rate table and the tree to `artifacts`.
    fn score(&self, msa: &Path, artifacts: &ScoreArtifacts) -> Result<(), InvocationError>;

    fn cleanup(&self, artifacts: &ScoreArtifacts, keep: bool) -> Result<(), InvocationError> {
        if keep {
            return Ok(());
        }
        remove_if_exists(&artifacts.table)?;
        remove_if_exists(&artifacts.tree)
    }
}

/// Runs `mafft --auto --quiet <input>` and captures the alignment from standard output.
#[derive(Debug, Clone)]
pub struct MafftAligner {
    program: PathBuf,
}

impl MafftAligner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MafftAligner {
    fn default() -> Self {
        Self::new("mafft")
    }
}

impl AlignmentInvoker for MafftAligner {
    fn align(&self, input: &Path, output: &Path) -> Result<(), InvocationError> {
        let program = self.program.display().to_string();
        let sink = File::create(output).map_err(|source| InvocationError::Io {
            path: output.to_path_buf(),
            source,
        })?;

        debug!(program = %program, input = %input.display(), "Running aligner.");
        let result = Command::new(&self.program)
            .args(["--auto", "--quiet"])
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::from(sink))
            .stderr(Stdio::piped())
            .output();

        // A half-written alignment would be mistaken for a cache hit by the next run.
        if let Err(e) = check_exit(&program, result) {
            let _ = fs::remove_file(output);
            return Err(e);
        }

        info!(alignment = %output.display(), "Alignment complete.");
        Ok(())
    }
}

/// Runs `rate4site -s <msa> -o <table> -x <tree>` inside the alignment's directory.
#[derive(Debug, Clone)]
pub struct Rate4SiteScorer {
    program: PathBuf,
}

impl Rate4SiteScorer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Rate4SiteScorer {
    fn default() -> Self {
        Self::new("rate4site")
    }
}

impl ScoreInvoker for Rate4SiteScorer {
    fn score(&self, msa: &Path, artifacts: &ScoreArtifacts) -> Result<(), InvocationError> {
        let program = self.program.display().to_string();
        let executable = resolve_program(&self.program)?;
        let msa = absolute(msa)?;
        let table = absolute(&artifacts.table)?;
        let tree = absolute(&artifacts.tree)?;

        let mut command = Command::new(&executable);
        command
            .arg("-s")
            .arg(&msa)
            .arg("-o")
            .arg(&table)
            .arg("-x")
            .arg(&tree)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        // Rate4Site drops auxiliary files into its current directory.
        if let Some(dir) = msa.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            command.current_dir(dir);
        }

        debug!(program = %program, msa = %msa.display(), "Running rate inference.");
        check_exit(&program, command.output())?;

        if !artifacts.table.is_file() {
            return Err(InvocationError::MissingOutput {
                program,
                path: artifacts.table.clone(),
            });
        }
        info!(table = %artifacts.table.display(), "Rate inference complete.");
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf, InvocationError> {
    std::path::absolute(path).map_err(|source| InvocationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Pins a relative program path like `bin/rate4site` to the caller's directory so a
/// changed child working directory does not redirect the lookup. Bare names are left to
/// the `PATH` search.
fn resolve_program(program: &Path) -> Result<PathBuf, InvocationError> {
    if program.is_relative() && program.components().count() > 1 {
        absolute(program)
    } else {
        Ok(program.to_path_buf())
    }
}

fn check_exit(program: &str, result: io::Result<Output>) -> Result<(), InvocationError> {
    let output = result.map_err(|source| InvocationError::Spawn {
        program: program.to_string(),
        source,
    })?;
    if output.status.success() {
        return Ok(());
    }
    Err(InvocationError::Failed {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

pub(crate) fn remove_if_exists(path: &Path) -> Result<(), InvocationError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(InvocationError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
