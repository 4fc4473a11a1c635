use phf::{Map, phf_map};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use thiserror::Error;

/// One column of the Rate4Site score table that can be requested in a result tuple.
///
/// The declaration order is the fixed order of values inside every tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Single-letter code of the reference residue.
    Identity,
    /// Conservation score; lower means more conserved.
    Score,
    /// QQ-INTERVAL, the confidence interval of the rate estimate (25-75 percentiles by default).
    Interval,
    /// Standard deviation of the posterior rate distribution.
    StdDev,
    /// MSA DATA, the number of non-gapped sequences over the total at this column.
    GapRatio,
}

#[rustfmt::skip]
static FIELD_NAMES: Map<&'static str, Field> = phf_map! {
    "identity" => Field::Identity, "seq" => Field::Identity,
    "score" => Field::Score,
    "interval" => Field::Interval, "qqint" => Field::Interval, "qq-interval" => Field::Interval,
    "std-dev" => Field::StdDev, "std" => Field::StdDev,
    "gap-ratio" => Field::GapRatio, "gapped" => Field::GapRatio, "msa-data" => Field::GapRatio,
};

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Identity,
        Field::Score,
        Field::Interval,
        Field::StdDev,
        Field::GapRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Identity => "identity",
            Field::Score => "score",
            Field::Interval => "interval",
            Field::StdDev => "std-dev",
            Field::GapRatio => "gap-ratio",
        }
    }

    /// Looks up a field by its name or one of the Rate4Site column aliases
    /// (`qqint`, `std`, `gapped`, ...). Matching ignores case.
    pub fn from_name(name: &str) -> Option<Field> {
        FIELD_NAMES
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown conservation field '{0}'. Expected one of: identity, score, interval, std-dev, gap-ratio.")]
pub struct UnknownFieldError(pub String);

/// The set of fields a run computes. Defaults to identity and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub identity: bool,
    pub score: bool,
    pub interval: bool,
    pub std_dev: bool,
    pub gap_ratio: bool,
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self {
            identity: true,
            score: true,
            interval: false,
            std_dev: false,
            gap_ratio: false,
        }
    }
}

impl FieldSelection {
    pub fn none() -> Self {
        Self {
            identity: false,
            score: false,
            interval: false,
            std_dev: false,
            gap_ratio: false,
        }
    }

    pub fn all() -> Self {
        Field::ALL
            .into_iter()
            .fold(Self::none(), |selection, field| selection.with(field))
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, UnknownFieldError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::none(), |selection, name| {
            Field::from_name(name.as_ref())
                .map(|field| selection.with(field))
                .ok_or_else(|| UnknownFieldError(name.as_ref().to_string()))
        })
    }

    pub fn with(mut self, field: Field) -> Self {
        *self.flag_mut(field) = true;
        self
    }

    pub fn without(mut self, field: Field) -> Self {
        *self.flag_mut(field) = false;
        self
    }

    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Identity => self.identity,
            Field::Score => self.score,
            Field::Interval => self.interval,
            Field::StdDev => self.std_dev,
            Field::GapRatio => self.gap_ratio,
        }
    }

    /// Enabled fields in tuple order.
    pub fn enabled(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|field| self.contains(*field))
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().next().is_none()
    }

    fn flag_mut(&mut self, field: Field) -> &mut bool {
        match field {
            Field::Identity => &mut self.identity,
            Field::Score => &mut self.score,
            Field::Interval => &mut self.interval,
            Field::StdDev => &mut self.std_dev,
            Field::GapRatio => &mut self.gap_ratio,
        }
    }
}

/// How numeric columns are stored once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueRepresentation {
    /// Keep the text exactly as Rate4Site printed it.
    Text,
    #[default]
    Numeric,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Measure {
    Text(String),
    Number(f64),
}

impl Measure {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measure::Text(text) => text.parse().ok(),
            Measure::Number(value) => Some(*value),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Text(text) => f.write_str(text),
            Measure::Number(value) => write!(f, "{}", value),
        }
    }
}

/// The MSA DATA column, `"k/n"`: `k` sequences with a residue at this column out of `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapRatio(String);

impl GapRatio {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn counts(&self) -> Option<(u32, u32)> {
        let (present, total) = self.0.split_once('/')?;
        Some((present.trim().parse().ok()?, total.trim().parse().ok()?))
    }
}

impl fmt::Display for GapRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Identity(char),
    Score(Measure),
    Interval(Measure, Measure),
    StdDev(Measure),
    GapRatio(GapRatio),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Identity(_) => Field::Identity,
            FieldValue::Score(_) => Field::Score,
            FieldValue::Interval(..) => Field::Interval,
            FieldValue::StdDev(_) => Field::StdDev,
            FieldValue::GapRatio(_) => Field::GapRatio,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Identity(residue) => write!(f, "{}", residue),
            FieldValue::Score(score) => write!(f, "{}", score),
            FieldValue::Interval(lower, upper) => write!(f, "[{},{}]", lower, upper),
            FieldValue::StdDev(std_dev) => write!(f, "{}", std_dev),
            FieldValue::GapRatio(ratio) => write!(f, "{}", ratio),
        }
    }
}

/// The values of one alignment column, in fixed field order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResidueConservation {
    values: Vec<FieldValue>,
}

impl ResidueConservation {
    pub(crate) fn new(values: Vec<FieldValue>) -> Self {
        debug_assert!(values.windows(2).all(|w| w[0].field() < w[1].field()));
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.iter().find(|value| value.field() == field)
    }

    pub fn identity(&self) -> Option<char> {
        match self.get(Field::Identity) {
            Some(FieldValue::Identity(residue)) => Some(*residue),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<&Measure> {
        match self.get(Field::Score) {
            Some(FieldValue::Score(score)) => Some(score),
            _ => None,
        }
    }

    pub fn interval(&self) -> Option<(&Measure, &Measure)> {
        match self.get(Field::Interval) {
            Some(FieldValue::Interval(lower, upper)) => Some((lower, upper)),
            _ => None,
        }
    }

    pub fn std_dev(&self) -> Option<&Measure> {
        match self.get(Field::StdDev) {
            Some(FieldValue::StdDev(std_dev)) => Some(std_dev),
            _ => None,
        }
    }

    pub fn gap_ratio(&self) -> Option<&GapRatio> {
        match self.get(Field::GapRatio) {
            Some(FieldValue::GapRatio(ratio)) => Some(ratio),
            _ => None,
        }
    }
}

/// Per-position conservation values for the reference sequence.
///
/// Positions are 0-based and contiguous; position `i` is the `i`-th data line of the
/// Rate4Site table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConservationRecord {
    selection: FieldSelection,
    residues: Vec<ResidueConservation>,
}

impl ConservationRecord {
    pub(crate) fn new(selection: FieldSelection, residues: Vec<ResidueConservation>) -> Self {
        Self {
            selection,
            residues,
        }
    }

    pub fn selection(&self) -> FieldSelection {
        self.selection
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ResidueConservation> {
        self.residues.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ResidueConservation)> {
        self.residues.iter().enumerate()
    }

    pub fn to_map(&self) -> BTreeMap<usize, ResidueConservation> {
        self.residues.iter().cloned().enumerate().collect()
    }

    /// Writes the record as a tab-separated table with a header row naming the enabled
    /// fields.
    pub fn write_tsv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);

        let mut header = vec!["position".to_string()];
        header.extend(self.selection.enabled().map(|field| field.name().to_string()));
        csv_writer.write_record(&header)?;

        for (position, residue) in self.iter() {
            let mut row = vec![position.to_string()];
            row.extend(residue.values().iter().map(ToString::to_string));
            csv_writer.write_record(&row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ConservationRecord {
        let selection = FieldSelection::default().with(Field::GapRatio);
        let residues = vec![
            ResidueConservation::new(vec![
                FieldValue::Identity('A'),
                FieldValue::Score(Measure::Number(0.6979)),
                FieldValue::GapRatio(GapRatio::new("8/8")),
            ]),
            ResidueConservation::new(vec![
                FieldValue::Identity('T'),
                FieldValue::Score(Measure::Number(-1.577)),
                FieldValue::GapRatio(GapRatio::new("6/8")),
            ]),
        ];
        ConservationRecord::new(selection, residues)
    }

    #[test]
    fn field_lookup_accepts_names_and_aliases() {
        assert_eq!(Field::from_name("identity"), Some(Field::Identity));
        assert_eq!(Field::from_name("QQINT"), Some(Field::Interval));
        assert_eq!(Field::from_name(" std "), Some(Field::StdDev));
        assert_eq!(Field::from_name("gapped"), Some(Field::GapRatio));
        assert_eq!(Field::from_name("entropy"), None);
    }

    #[test]
    fn default_selection_is_identity_and_score() {
        let enabled: Vec<_> = FieldSelection::default().enabled().collect();
        assert_eq!(enabled, vec![Field::Identity, Field::Score]);
    }

    #[test]
    fn selection_from_names_keeps_fixed_order() {
        let selection = FieldSelection::from_names(["gap-ratio", "score", "qqint"]).unwrap();
        let enabled: Vec<_> = selection.enabled().collect();
        assert_eq!(enabled, vec![Field::Score, Field::Interval, Field::GapRatio]);
    }

    #[test]
    fn selection_from_names_rejects_unknown_field() {
        let result = FieldSelection::from_names(["score", "entropy"]);
        assert_eq!(result, Err(UnknownFieldError("entropy".to_string())));
    }

    #[test]
    fn empty_selection_is_detected() {
        assert!(FieldSelection::none().is_empty());
        assert!(!FieldSelection::all().is_empty());
        assert!(FieldSelection::default()
            .without(Field::Identity)
            .without(Field::Score)
            .is_empty());
    }

    #[test]
    fn gap_ratio_counts_parse_both_sides() {
        assert_eq!(GapRatio::new("7/10").counts(), Some((7, 10)));
        assert_eq!(GapRatio::new("seven").counts(), None);
    }

    #[test]
    fn measure_converts_text_to_number() {
        assert_eq!(Measure::Text("-0.8076".into()).as_f64(), Some(-0.8076));
        assert_eq!(Measure::Text("n/a".into()).as_f64(), None);
    }

    #[test]
    fn residue_accessors_find_values_by_field() {
        let record = sample_record();
        let first = record.get(0).unwrap();
        assert_eq!(first.identity(), Some('A'));
        assert_eq!(first.score(), Some(&Measure::Number(0.6979)));
        assert_eq!(first.gap_ratio().map(GapRatio::as_str), Some("8/8"));
        assert!(first.interval().is_none());
        assert!(first.std_dev().is_none());
    }

    #[test]
    fn to_map_uses_contiguous_positions() {
        let map = sample_record().to_map();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn write_tsv_emits_header_and_one_row_per_position() {
        let mut buffer = Vec::new();
        sample_record().write_tsv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "position\tidentity\tscore\tgap-ratio\n0\tA\t0.6979\t8/8\n1\tT\t-1.577\t6/8\n"
        );
    }
}
