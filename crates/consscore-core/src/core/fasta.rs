use std::fmt;
use thiserror::Error;

/// Header given to sequences that arrive without an identification line.
pub const DEFAULT_HEADER: &str = "Input Sequence";

const RECORD_MARKER: char = '>';

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FastaError {
    #[error("Empty sequence entered.")]
    EmptySequence,
    #[error("Not a sequence: input must start with '>' or a one-letter residue code.")]
    NotASequence,
    #[error("Record index {index} is out of range for {len} record(s).")]
    RecordIndex { index: usize, len: usize },
}

/// A single FASTA entry with its line wrapping removed.
///
/// Headers are stored without the leading `>`. A record parsed from text that had no
/// identification line at all is a bare pseudo-record with no header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: Option<String>,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            sequence: sequence.into(),
        }
    }

    pub fn bare(sequence: impl Into<String>) -> Self {
        Self {
            header: None,
            sequence: sequence.into(),
        }
    }

    fn from_block(block: &str) -> Option<Self> {
        if let Some(rest) = block.strip_prefix(RECORD_MARKER) {
            let mut lines = rest.lines();
            let header = lines.next().unwrap_or_default().trim_end().to_string();
            let sequence = lines.map(str::trim).collect();
            Some(Self {
                header: Some(header),
                sequence,
            })
        } else {
            let sequence: String = block.lines().map(str::trim).collect();
            (!sequence.is_empty()).then(|| Self::bare(sequence))
        }
    }
}

impl fmt::Display for FastaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.header {
            Some(header) => write!(f, ">{}\n{}", header, self.sequence),
            None => write!(f, "{}", self.sequence),
        }
    }
}

/// Ordered FASTA records, in their order of appearance in the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaCollection {
    records: Vec<FastaRecord>,
}

impl FastaCollection {
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        split_into_records(text)
            .into_iter()
            .filter_map(FastaRecord::from_block)
            .collect()
    }

    pub fn records(&self) -> &[FastaRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&FastaRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FastaRecord> {
        self.records.iter()
    }
}

impl FromIterator<FastaRecord> for FastaCollection {
    fn from_iter<I: IntoIterator<Item = FastaRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FastaCollection {
    type Item = FastaRecord;
    type IntoIter = std::vec::IntoIter<FastaRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl fmt::Display for FastaCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}

/// Ensures the text carries a FASTA identification line, adding `>Input Sequence` to a bare
/// sequence.
///
/// # Errors
///
/// Returns [`FastaError::EmptySequence`] for empty input and [`FastaError::NotASequence`] when
/// the first character is neither `>` nor alphabetic.
pub fn header_check(text: &str) -> Result<String, FastaError> {
    match text.chars().next() {
        Some(RECORD_MARKER) => Ok(text.to_string()),
        None => Err(FastaError::EmptySequence),
        Some(c) if c.is_alphabetic() => Ok(format!(">{}\n{}", DEFAULT_HEADER, text)),
        Some(_) => Err(FastaError::NotASequence),
    }
}

/// Splits FASTA text into raw per-record blocks, each starting with `>` and with trailing
/// whitespace removed. Text without a leading `>` is returned as a single block.
pub fn split_into_records(text: &str) -> Vec<&str> {
    if !text.starts_with(RECORD_MARKER) {
        return vec![text];
    }

    let starts: Vec<usize> = text
        .match_indices(RECORD_MARKER)
        .map(|(idx, _)| idx)
        .collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(text.len());
            // A fragment holding only the marker itself is empty.
            (end - start > RECORD_MARKER.len_utf8()).then(|| text[start..end].trim_end())
        })
        .collect()
}

/// Joins the sequence lines of a single record onto one line, keeping the header line.
///
/// Only the first record's header is treated as a header; callers must split multi-record
/// text first.
pub fn strip_internal_newlines(text: &str) -> Result<String, FastaError> {
    let checked = header_check(text)?;
    let mut lines = checked.lines().map(str::trim_end).filter(|l| !l.is_empty());
    let header = lines.next().unwrap_or_default();
    let sequence: String = lines.collect();
    Ok(format!("{}\n{}", header, sequence))
}

/// Returns the residues of the record at `index`, with header and line breaks removed.
pub fn extract_sequence(text: &str, index: usize) -> Result<String, FastaError> {
    let records = split_into_records(text);
    let block = records.get(index).ok_or(FastaError::RecordIndex {
        index,
        len: records.len(),
    })?;
    Ok(block_sequence(block))
}

/// Drops every record whose raw text contains `id`.
///
/// Matching is by substring over the whole record, header and sequence alike.
pub fn remove_record_by_id(text: &str, id: &str) -> String {
    split_into_records(text)
        .into_iter()
        .filter(|record| !record.contains(id))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn remove_first_record(text: &str) -> String {
    split_into_records(text)
        .into_iter()
        .skip(1)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps only the records whose raw text contains `token`.
pub fn retain_records_containing(text: &str, token: &str) -> String {
    split_into_records(text)
        .into_iter()
        .filter(|record| record.contains(token))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Locates a motif in an alignment.
///
/// Every record of the alignment is checked in order and the column of the first hit is
/// returned. All aligned sequences share the same length, so the column is valid for each of
/// them.
pub fn find_motif(alignment: &str, motif: &str) -> Option<usize> {
    if motif.is_empty() {
        return None;
    }
    split_into_records(alignment)
        .into_iter()
        .find_map(|block| block_sequence(block).find(motif))
}

fn block_sequence(block: &str) -> String {
    block
        .lines()
        .filter(|line| !line.starts_with(RECORD_MARKER))
        .map(str::trim)
        .collect()
}
