use crate::core::models::conservation::{
    ConservationRecord, Field, FieldSelection, FieldValue, GapRatio, Measure, ResidueConservation,
    ValueRepresentation,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?[0-9]*\.?[0-9]+").expect("numeric token pattern is valid"));

static COLUMN_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\[\],\s]+").expect("column separator pattern is valid"));

const ALPHA_MARKER: &str = "alpha parameter";
const COMMENT_MARKER: char = '#';

const FORMAT_STABILITY_WARNING: &str = "Rate4Site output is parsed by position and tag; \
     the layout is tied to a single Rate4Site release and may be misread by other versions.";

// Token positions after splitting a data line:
// POS SEQ SCORE [QQ-LOWER, QQ-UPPER] STD MSA-DATA
const IDENTITY_COLUMN: usize = 1;
const SCORE_COLUMN: usize = 2;
const INTERVAL_LOWER_COLUMN: usize = 3;
const INTERVAL_UPPER_COLUMN: usize = 4;
const STD_DEV_COLUMN: usize = 5;
const GAP_RATIO_COLUMN: usize = 6;

#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("Rate4Site output file not found: '{path}'", path = path.display())]
    FileNotFound { path: PathBuf },
    #[error("Unsupported Rate4Site output format in '{path}': {reason}", path = path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[error("Failed to read '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Lines of a Rate4Site table that carry data: non-blank and not `#` comments.
pub fn extract_data_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with(COMMENT_MARKER))
        .collect()
}

/// Every number in `text`, decimals and signs included, in order of appearance.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER_PATTERN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Reads the gamma-distribution alpha parameter from a Rate4Site output file.
///
/// # Errors
///
/// Returns [`RateTableError::FileNotFound`] if `path` does not exist, and
/// [`RateTableError::UnsupportedFormat`] if no line mentions the alpha parameter or that
/// line holds no number.
pub fn parse_alpha(path: &Path) -> Result<f64, RateTableError> {
    warn!("{}", FORMAT_STABILITY_WARNING);
    let contents = read_table(path)?;

    let line = contents
        .lines()
        .find(|line| line.contains(ALPHA_MARKER))
        .ok_or_else(|| RateTableError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("no line mentions the '{}'", ALPHA_MARKER),
        })?;

    extract_numbers(line)
        .first()
        .copied()
        .ok_or_else(|| RateTableError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("the alpha parameter line holds no number: '{}'", line.trim()),
        })
}

/// Turns Rate4Site score tables into [`ConservationRecord`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateTableParser {
    selection: FieldSelection,
    representation: ValueRepresentation,
}

impl RateTableParser {
    pub fn new(selection: FieldSelection, representation: ValueRepresentation) -> Self {
        Self {
            selection,
            representation,
        }
    }

    /// Parses every data line of the file at `path`.
    ///
    /// Parsing is all-or-nothing: a single malformed line fails the whole table.
    pub fn parse_records(&self, path: &Path) -> Result<ConservationRecord, RateTableError> {
        warn!("{}", FORMAT_STABILITY_WARNING);
        let contents = read_table(path)?;
        self.parse_str(&contents, path)
    }

    pub(crate) fn parse_str(
        &self,
        contents: &str,
        origin: &Path,
    ) -> Result<ConservationRecord, RateTableError> {
        let residues = extract_data_lines(contents)
            .into_iter()
            .enumerate()
            .map(|(position, line)| self.parse_line(position, line, origin))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            positions = residues.len(),
            path = %origin.display(),
            "Parsed Rate4Site score table."
        );
        Ok(ConservationRecord::new(self.selection, residues))
    }

    fn parse_line(
        &self,
        position: usize,
        line: &str,
        origin: &Path,
    ) -> Result<ResidueConservation, RateTableError> {
        let tokens: Vec<&str> = COLUMN_SEPARATORS
            .split(line)
            .filter(|token| !token.is_empty())
            .collect();
        let column = |index: usize| {
            tokens
                .get(index)
                .copied()
                .ok_or_else(|| unsupported(origin, position, line, "too few columns"))
        };

        let mut values = Vec::with_capacity(Field::ALL.len());
        for field in self.selection.enabled() {
            let value = match field {
                Field::Identity => {
                    let token = column(IDENTITY_COLUMN)?;
                    let mut chars = token.chars();
                    match (chars.next(), chars.next()) {
                        (Some(residue), None) => FieldValue::Identity(residue),
                        _ => {
                            return Err(unsupported(
                                origin,
                                position,
                                line,
                                "residue identity is not a single character",
                            ));
                        }
                    }
                }
                Field::Score => {
                    FieldValue::Score(self.measure(column(SCORE_COLUMN)?, origin, position, line)?)
                }
                Field::Interval => FieldValue::Interval(
                    self.measure(column(INTERVAL_LOWER_COLUMN)?, origin, position, line)?,
                    self.measure(column(INTERVAL_UPPER_COLUMN)?, origin, position, line)?,
                ),
                Field::StdDev => {
                    FieldValue::StdDev(self.measure(column(STD_DEV_COLUMN)?, origin, position, line)?)
                }
                Field::GapRatio => FieldValue::GapRatio(GapRatio::new(column(GAP_RATIO_COLUMN)?)),
            };
            values.push(value);
        }
        Ok(ResidueConservation::new(values))
    }

    fn measure(
        &self,
        token: &str,
        origin: &Path,
        position: usize,
        line: &str,
    ) -> Result<Measure, RateTableError> {
        match self.representation {
            ValueRepresentation::Text => Ok(Measure::Text(token.to_string())),
            ValueRepresentation::Numeric => token
                .parse()
                .map(Measure::Number)
                .map_err(|_| unsupported(origin, position, line, "non-numeric value")),
        }
    }
}

fn read_table(path: &Path) -> Result<String, RateTableError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            RateTableError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RateTableError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn unsupported(origin: &Path, position: usize, line: &str, problem: &str) -> RateTableError {
    RateTableError::UnsupportedFormat {
        path: origin.to_path_buf(),
        reason: format!("{} on data line {}: '{}'", problem, position + 1, line.trim()),
    }
}
