use crate::core::fasta;
use crate::core::io::rate4site::{RateTableParser, parse_alpha};
use crate::core::models::conservation::ConservationRecord;
use crate::engine::config::{DEFAULT_RUN_NAME, PipelineConfig, RetrievalMode};
use crate::engine::error::PipelineError;
use crate::engine::invoker::{
    AlignmentInvoker, MafftAligner, Rate4SiteScorer, ScoreArtifacts, ScoreInvoker,
};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::PipelineStage;
use crate::engine::workspace::Workspace;
use crate::orthology::{HttpTransport, OrthologyClient, OrthologyError, ReqwestTransport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

const ORTHOLOGS_EXTENSION: &str = "orth";
const ALIGNMENT_EXTENSION: &str = "aln";

/// The query of a run: a FASTA file on disk or sequence text given directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceInput {
    File(PathBuf),
    Literal(String),
}

impl SequenceInput {
    /// Treats `input` as a file if such a file exists, and as sequence text otherwise.
    pub fn detect(input: &str) -> Self {
        let path = Path::new(input);
        if path.is_file() {
            SequenceInput::File(path.to_path_buf())
        } else {
            SequenceInput::Literal(input.to_string())
        }
    }

    pub fn read(&self) -> Result<String, PipelineError> {
        match self {
            SequenceInput::File(path) => {
                fs::read_to_string(path).map_err(|source| PipelineError::Input {
                    path: path.clone(),
                    source,
                })
            }
            SequenceInput::Literal(text) => Ok(text.clone()),
        }
    }

    /// The input file's name up to its first `.`, if the input is a file.
    pub fn file_stem(&self) -> Option<String> {
        match self {
            SequenceInput::File(path) => path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.split('.').next())
                .filter(|stem| !stem.is_empty())
                .map(str::to_string),
            SequenceInput::Literal(_) => None,
        }
    }
}

/// Runs name resolution: explicit name, then input file stem, then the default label.
pub fn derive_run_name(explicit: Option<&str>, input: &SequenceInput) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| input.file_stem())
        .unwrap_or_else(|| DEFAULT_RUN_NAME.to_string())
}

/// One conservation run: orthologs, then alignment, then rate inference.
///
/// All intermediate files live in the configured working directory and are named after
/// the run. An alignment left there by an earlier run with the same name is reused.
pub struct ConservationPipeline<'a> {
    input: SequenceInput,
    name: String,
    config: PipelineConfig,
    transport: Box<dyn HttpTransport + 'a>,
    aligner: Box<dyn AlignmentInvoker + 'a>,
    scorer: Box<dyn ScoreInvoker + 'a>,
    reporter: ProgressReporter<'a>,
    stage: PipelineStage,
    orthologs: Option<PathBuf>,
    alignment: Option<PathBuf>,
    scores: Option<ConservationRecord>,
    alpha: Option<f64>,
}

impl<'a> ConservationPipeline<'a> {
    pub fn new(
        input: SequenceInput,
        config: PipelineConfig,
        transport: Box<dyn HttpTransport + 'a>,
        aligner: Box<dyn AlignmentInvoker + 'a>,
        scorer: Box<dyn ScoreInvoker + 'a>,
    ) -> Self {
        let name = derive_run_name(config.name.as_deref(), &input);
        Self {
            input,
            name,
            config,
            transport,
            aligner,
            scorer,
            reporter: ProgressReporter::new(),
            stage: PipelineStage::Created,
            orthologs: None,
            alignment: None,
            scores: None,
            alpha: None,
        }
    }

    /// Wires the pipeline to the OMA browser, MAFFT and Rate4Site as configured.
    pub fn with_defaults(
        input: SequenceInput,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let transport =
            ReqwestTransport::new(config.orthology.timeout).map_err(OrthologyError::from)?;
        let aligner = MafftAligner::new(config.programs.mafft.clone());
        let scorer = Rate4SiteScorer::new(config.programs.rate4site.clone());
        Ok(Self::new(
            input,
            config,
            Box::new(transport),
            Box::new(aligner),
            Box::new(scorer),
        ))
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter<'a>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn orthologs(&self) -> Option<&Path> {
        self.orthologs.as_deref()
    }

    pub fn alignment(&self) -> Option<&Path> {
        self.alignment.as_deref()
    }

    pub fn scores(&self) -> Option<&ConservationRecord> {
        self.scores.as_ref()
    }

    /// Gamma-distribution alpha parameter of the last scoring step.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Fetches the orthologs of the input without touching the filesystem.
    ///
    /// In [`RetrievalMode::HogsWithFallback`] a group failure that
    /// [allows it](OrthologyError::allows_pairwise_fallback) is retried once through
    /// pairwise orthologs; every other failure propagates.
    pub fn retrieve_orthologs(&self) -> Result<String, PipelineError> {
        let sequence = self.input.read()?;
        let mut client = OrthologyClient::new(self.transport.as_ref(), sequence)
            .with_base_url(self.config.orthology.base_url.clone())
            .with_rel_type(self.config.orthology.rel_type.clone());

        let orthologs = match self.config.retrieval {
            RetrievalMode::PairwiseOnly => client.get_orthologs()?,
            RetrievalMode::HogsWithFallback => match client.get_hogs() {
                Ok(group) => group,
                Err(e) if e.allows_pairwise_fallback() => {
                    warn!(error = %e, "Group retrieval failed, falling back to pairwise orthologs.");
                    self.reporter.report(Progress::Fallback {
                        reason: e.to_string(),
                    });
                    client.get_orthologs()?
                }
                Err(e) => return Err(e.into()),
            },
        };

        let count = if orthologs.trim().is_empty() {
            0
        } else {
            fasta::split_into_records(&orthologs).len()
        };
        info!(sequences = count, "Retrieved orthologs.");
        self.reporter
            .report(Progress::Message(format!("Retrieved {} ortholog sequence(s)", count)));
        Ok(orthologs)
    }

    /// Retrieves the orthologs and writes them to `<name>.orth` in `dir`.
    pub fn call_orthologs(&mut self, dir: &Path) -> Result<PathBuf, PipelineError> {
        self.begin(PipelineStage::OrthologsFetched);
        let orthologs = self.retrieve_orthologs()?;

        let path = dir.join(format!("{}.{}", self.name, ORTHOLOGS_EXTENSION));
        fs::write(&path, &orthologs).map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "Wrote orthologs.");
        self.orthologs = Some(path.clone());
        self.finish(PipelineStage::OrthologsFetched);
        Ok(path)
    }

    /// Aligns the orthologs into `<name>.aln` next to the orthologs file.
    pub fn call_alignment(&mut self, orthologs: &Path) -> Result<PathBuf, PipelineError> {
        self.begin(PipelineStage::Aligned);
        let output = orthologs.with_file_name(format!("{}.{}", self.name, ALIGNMENT_EXTENSION));
        self.aligner.align(orthologs, &output)?;

        self.alignment = Some(output.clone());
        self.finish(PipelineStage::Aligned);
        Ok(output)
    }

    /// Scores the alignment, stores the parsed records and returns the alpha parameter.
    pub fn call_rate4site(&mut self, msa: &Path) -> Result<f64, PipelineError> {
        self.score_alignment(msa).map(|(_, alpha)| alpha)
    }

    /// Runs the whole pipeline and returns the per-residue conservation record.
    ///
    /// The working directory is released on every exit path, and removed when the cache is
    /// off and nothing is left in it.
    #[instrument(skip_all, name = "conservation_workflow", fields(run = %self.name))]
    pub fn pipe(&mut self) -> Result<ConservationRecord, PipelineError> {
        self.reset();
        let work_dir = self.config.work_dir.clone();
        let workspace =
            Workspace::acquire(&work_dir).map_err(|source| PipelineError::Workspace {
                path: work_dir.clone(),
                source,
            })?;

        let outcome = self.run_in(&workspace);

        self.begin(PipelineStage::CleanedUp);
        let released = workspace.close(self.config.keep_cache);
        match (outcome, released) {
            (Ok(record), Ok(_)) => {
                self.finish(PipelineStage::CleanedUp);
                info!(positions = record.len(), "Conservation workflow finished.");
                Ok(record)
            }
            (Ok(_), Err(source)) => Err(PipelineError::Workspace {
                path: work_dir,
                source,
            }),
            (Err(e), Err(close_error)) => {
                warn!(error = %close_error, "Failed to release working directory after an error.");
                Err(e)
            }
            (Err(e), Ok(_)) => Err(e),
        }
    }

    fn run_in(&mut self, workspace: &Workspace) -> Result<ConservationRecord, PipelineError> {
        let cached = workspace.file(&self.name, ALIGNMENT_EXTENSION);

        let (msa, record) = if cached.is_file() {
            info!(alignment = %cached.display(), "Reusing cached alignment.");
            self.reporter.report(Progress::CacheHit {
                alignment: cached.display().to_string(),
            });
            self.alignment = Some(cached.clone());
            self.stage = PipelineStage::Aligned;
            let (record, _) = self.score_alignment(&cached)?;
            (cached, record)
        } else {
            let orthologs = self.call_orthologs(workspace.path())?;
            let msa = self.call_alignment(&orthologs)?;
            let (record, _) = self.score_alignment(&msa)?;
            fs::remove_file(&orthologs).map_err(|source| PipelineError::Io {
                path: orthologs.clone(),
                source,
            })?;
            self.orthologs = None;
            (msa, record)
        };

        self.aligner.cleanup(&msa, self.config.keep_cache)?;
        Ok(record)
    }

    fn score_alignment(
        &mut self,
        msa: &Path,
    ) -> Result<(ConservationRecord, f64), PipelineError> {
        self.begin(PipelineStage::Scored);
        let artifacts = ScoreArtifacts::beside(msa, &self.name);
        self.scorer.score(msa, &artifacts)?;

        let parser = RateTableParser::new(
            self.config.output.fields,
            self.config.output.representation,
        );
        let record = parser.parse_records(&artifacts.table)?;
        let alpha = parse_alpha(&artifacts.table)?;
        self.scorer.cleanup(&artifacts, self.config.keep_cache)?;

        info!(alpha, positions = record.len(), "Parsed conservation scores.");
        self.alpha = Some(alpha);
        self.scores = Some(record.clone());
        self.finish(PipelineStage::Scored);
        Ok((record, alpha))
    }

    fn reset(&mut self) {
        self.stage = PipelineStage::Created;
        self.orthologs = None;
        self.alignment = None;
        self.scores = None;
        self.alpha = None;
    }

    fn begin(&self, stage: PipelineStage) {
        self.reporter.report(Progress::StageStart { stage });
    }

    fn finish(&mut self, stage: PipelineStage) {
        self.stage = stage;
        self.reporter.report(Progress::StageFinish { stage });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::conservation::{Field, FieldSelection, Measure};
    use crate::engine::config::PipelineConfigBuilder;
    use crate::engine::invoker::InvocationError;
    use crate::orthology::transport::mock::MockTransport;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use tempfile::{TempDir, tempdir};

    const BASE: &str = "http://oma.test";
    const SEQUENCE: &str = "MVLSPADKTN";
    const SEARCH_URL: &str = "http://oma.test/api/sequence/?query=MVLSPADKTN";
    const HOG_URL: &str = "http://oma.test/api/hog/HUMAN26253/";
    const GROUP_URL: &str = "http://oma.test/oma/hogs/HUMAN26253/Hominidae/fasta/";
    const PAIRWISE_URL: &str = "http://oma.test/oma/vps/HUMAN26253/fasta/";

    const SEARCH_BODY: &str = r#"{"targets":[{"omaid":"HUMAN26253"}]}"#;
    const HOG_BODY: &str = r#"[{"level":"Hominidae","alternative_levels":["Hominidae"]}]"#;
    const GROUP_BODY: &str = ">HUMAN26253\nMVLSPADKTN\n>PANTR01234\nMVLSPADKTS\n";
    const PAIRWISE_BODY: &str = ">HUMAN26253\nMVLSPADKTN\n>MOUSE55555\nMVLSGEDKSN\n";

    const R4S_TABLE: &str = "\
#Rates were calculated using the expectation of the posterior rate distribution
#The alpha parameter 2.83688
#POS SEQ  SCORE    QQ-INTERVAL     STD      MSA DATA
    1     M  0.6979   [0.1769,0.9338] 0.5212    3/3
    2     V  -1.577   [-1.632,-1.553] 0.0473    2/3
    3     L  0.1769   [-0.4212,0.6979] 0.4983   3/3
";

    struct CountingAligner {
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl AlignmentInvoker for CountingAligner {
        fn align(&self, input: &Path, output: &Path) -> Result<(), InvocationError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(InvocationError::Failed {
                    program: "mafft".into(),
                    status: "exit status: 1".into(),
                    stderr: "bad input".into(),
                });
            }
            let orthologs = fs::read_to_string(input).unwrap();
            fs::write(output, orthologs).unwrap();
            Ok(())
        }
    }

    struct TableScorer {
        calls: Rc<Cell<usize>>,
    }

    impl ScoreInvoker for TableScorer {
        fn score(&self, _msa: &Path, artifacts: &ScoreArtifacts) -> Result<(), InvocationError> {
            self.calls.set(self.calls.get() + 1);
            fs::write(&artifacts.table, R4S_TABLE).unwrap();
            fs::write(&artifacts.tree, "(a:0.1,b:0.2);").unwrap();
            Ok(())
        }
    }

    struct Harness {
        root: TempDir,
        align_calls: Rc<Cell<usize>>,
        score_calls: Rc<Cell<usize>>,
        requests: Rc<RefCell<Vec<String>>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                root: tempdir().unwrap(),
                align_calls: Rc::new(Cell::new(0)),
                score_calls: Rc::new(Cell::new(0)),
                requests: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn config(&self, builder: PipelineConfigBuilder) -> PipelineConfig {
            builder
                .work_root(self.root.path().to_path_buf())
                .base_url(BASE)
                .build()
                .unwrap()
        }

        fn pipeline(
            &mut self,
            input: SequenceInput,
            config: PipelineConfig,
            transport: MockTransport,
            failing_aligner: bool,
        ) -> ConservationPipeline<'static> {
            self.requests = transport.call_log();
            ConservationPipeline::new(
                input,
                config,
                Box::new(transport),
                Box::new(CountingAligner {
                    calls: Rc::clone(&self.align_calls),
                    fail: failing_aligner,
                }),
                Box::new(TableScorer {
                    calls: Rc::clone(&self.score_calls),
                }),
            )
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    fn full_service() -> MockTransport {
        MockTransport::new()
            .route(SEARCH_URL, 200, SEARCH_BODY)
            .route(HOG_URL, 200, HOG_BODY)
            .route(GROUP_URL, 200, GROUP_BODY)
            .route(PAIRWISE_URL, 200, PAIRWISE_BODY)
    }

    #[test]
    fn run_name_prefers_explicit_then_file_stem_then_default() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("hba_human.fasta.txt");
        fs::write(&file, ">HBA\nMVLS\n").unwrap();
        let file_input = SequenceInput::detect(file.to_str().unwrap());

        assert_eq!(derive_run_name(Some("custom"), &file_input), "custom");
        assert_eq!(derive_run_name(None, &file_input), "hba_human");
        assert_eq!(
            derive_run_name(None, &SequenceInput::detect(SEQUENCE)),
            DEFAULT_RUN_NAME
        );
    }

    #[test]
    fn detect_reads_file_contents_or_keeps_literal() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("query.fasta");
        fs::write(&file, ">query\nMVLS\n").unwrap();

        let from_file = SequenceInput::detect(file.to_str().unwrap());
        assert_eq!(from_file, SequenceInput::File(file.clone()));
        assert_eq!(from_file.read().unwrap(), ">query\nMVLS\n");

        let literal = SequenceInput::detect("MVLS");
        assert_eq!(literal.read().unwrap(), "MVLS");
    }

    #[test]
    fn call_orthologs_falls_back_to_pairwise_on_upstream_error() {
        let mut harness = Harness::new();
        let input_file = harness.root.path().join("query.fasta");
        fs::write(&input_file, format!(">query\n{}\n", SEQUENCE)).unwrap();

        let transport = MockTransport::new()
            .route(SEARCH_URL, 200, SEARCH_BODY)
            .route(HOG_URL, 500, "")
            .route(PAIRWISE_URL, 200, PAIRWISE_BODY);
        let config = harness.config(PipelineConfigBuilder::new());
        let mut pipeline =
            harness.pipeline(SequenceInput::File(input_file), config, transport, false);

        let out_dir = harness.root.path().join("out");
        fs::create_dir(&out_dir).unwrap();
        let path = pipeline.call_orthologs(&out_dir).unwrap();

        assert_eq!(path, out_dir.join("query.orth"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            ">Input Sequence\nMVLSPADKTN\n>MOUSE55555\nMVLSGEDKSN"
        );
        let requests = harness.requests();
        assert!(requests.contains(&HOG_URL.to_string()));
        assert!(requests.contains(&PAIRWISE_URL.to_string()));
        assert!(!requests.contains(&GROUP_URL.to_string()));
        assert_eq!(pipeline.stage(), PipelineStage::OrthologsFetched);
    }

    #[test]
    fn call_orthologs_does_not_fall_back_on_timeout() {
        let mut harness = Harness::new();
        let transport = MockTransport::new()
            .route(SEARCH_URL, 200, SEARCH_BODY)
            .route(HOG_URL, 504, "")
            .route(PAIRWISE_URL, 200, PAIRWISE_BODY);
        let config = harness.config(PipelineConfigBuilder::new());
        let mut pipeline =
            harness.pipeline(SequenceInput::Literal(SEQUENCE.into()), config, transport, false);

        let result = pipeline.call_orthologs(harness.root.path());
        assert!(matches!(
            result,
            Err(PipelineError::Orthology {
                source: OrthologyError::UpstreamTimeout { status: 504 }
            })
        ));
        assert!(!harness.requests().contains(&PAIRWISE_URL.to_string()));
    }

    #[test]
    fn pairwise_only_mode_skips_group_retrieval() {
        let mut harness = Harness::new();
        let config = harness.config(PipelineConfigBuilder::new().retrieval(RetrievalMode::PairwiseOnly));
        let pipeline =
            harness.pipeline(SequenceInput::Literal(SEQUENCE.into()), config, full_service(), false);

        let orthologs = pipeline.retrieve_orthologs().unwrap();
        assert!(orthologs.starts_with(">Input Sequence\n"));
        assert_eq!(harness.requests(), vec![SEARCH_URL, PAIRWISE_URL]);
    }

    #[test]
    fn retrieval_reports_sequence_count() {
        let mut harness = Harness::new();
        let config = harness.config(PipelineConfigBuilder::new().retrieval(RetrievalMode::PairwiseOnly));
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let reporter = ProgressReporter::with_callback(Box::new(move |event: Progress| {
            if let Progress::Message(text) = event {
                sink.lock().unwrap().push(text);
            }
        }));
        let pipeline = harness
            .pipeline(SequenceInput::Literal(SEQUENCE.into()), config, full_service(), false)
            .with_reporter(reporter);

        pipeline.retrieve_orthologs().unwrap();

        assert_eq!(
            *messages.lock().unwrap(),
            vec!["Retrieved 2 ortholog sequence(s)".to_string()]
        );
    }

    #[test]
    fn pipe_returns_records_and_alpha() {
        let mut harness = Harness::new();
        let config = harness.config(PipelineConfigBuilder::new().name("HBA"));
        let mut pipeline =
            harness.pipeline(SequenceInput::Literal(SEQUENCE.into()), config, full_service(), false);

        let record = pipeline.pipe().unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(record.get(1).unwrap().identity(), Some('V'));
        assert_eq!(record.get(1).unwrap().score(), Some(&Measure::Number(-1.577)));
        assert_eq!(pipeline.alpha(), Some(2.83688));
        assert_eq!(pipeline.stage(), PipelineStage::CleanedUp);

        let work_dir = harness.root.path().join("Sequence_Alignments");
        assert!(work_dir.join("HBA.aln").is_file());
        assert!(!work_dir.join("HBA.orth").exists());
        assert_eq!(harness.requests(), vec![SEARCH_URL, HOG_URL, GROUP_URL]);
    }

    #[test]
    fn pipe_reuses_cached_alignment_on_second_run() {
        let mut harness = Harness::new();
        let config = harness.config(PipelineConfigBuilder::new().name("HBA"));
        let mut pipeline =
            harness.pipeline(SequenceInput::Literal(SEQUENCE.into()), config, full_service(), false);

        let first = pipeline.pipe().unwrap();
        let second = pipeline.pipe().unwrap();

        assert_eq!(first, second);
        assert_eq!(harness.align_calls.get(), 1);
        assert_eq!(harness.score_calls.get(), 2);
        assert_eq!(harness.requests().len(), 3);
    }

    #[test]
    fn pipe_without_cache_leaves_no_working_directory() {
        let mut harness = Harness::new();
        let config = harness.config(
            PipelineConfigBuilder::new()
                .keep_cache(false)
                .fields(FieldSelection::all()),
        );
        let mut pipeline =
            harness.pipeline(SequenceInput::Literal(SEQUENCE.into()), config, full_service(), false);

        let record = pipeline.pipe().unwrap();

        assert_eq!(record.selection(), FieldSelection::all());
        assert_eq!(record.get(0).unwrap().len(), Field::ALL.len());
        assert!(!harness.root.path().join("Sequence_Alignments").exists());
    }

    #[test]
    fn pipe_releases_working_directory_on_failure() {
        let mut harness = Harness::new();
        let transport = MockTransport::new().route(SEARCH_URL, 503, "");
        let config = harness.config(PipelineConfigBuilder::new().keep_cache(false));
        let mut pipeline =
            harness.pipeline(SequenceInput::Literal(SEQUENCE.into()), config, transport, false);

        let result = pipeline.pipe();

        assert!(matches!(
            result,
            Err(PipelineError::Orthology {
                source: OrthologyError::UpstreamError { status: 503 }
            })
        ));
        assert!(!harness.root.path().join("Sequence_Alignments").exists());
    }

    #[test]
    fn alignment_failure_is_terminal_and_not_retried() {
        let mut harness = Harness::new();
        let config = harness.config(PipelineConfigBuilder::new());
        let mut pipeline =
            harness.pipeline(SequenceInput::Literal(SEQUENCE.into()), config, full_service(), true);

        let result = pipeline.pipe();

        assert!(matches!(result, Err(PipelineError::Invocation { .. })));
        assert_eq!(harness.align_calls.get(), 1);
        assert_eq!(harness.score_calls.get(), 0);
        assert!(pipeline.scores().is_none());
    }

    #[test]
    fn progress_reports_stages_in_order() {
        let mut harness = Harness::new();
        let config = harness.config(PipelineConfigBuilder::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event: Progress| {
            if let Progress::StageFinish { stage } = event {
                sink.lock().unwrap().push(stage);
            }
        }));
        let mut pipeline = harness
            .pipeline(SequenceInput::Literal(SEQUENCE.into()), config, full_service(), false)
            .with_reporter(reporter);

        pipeline.pipe().unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                PipelineStage::OrthologsFetched,
                PipelineStage::Aligned,
                PipelineStage::Scored,
                PipelineStage::CleanedUp,
            ]
        );
    }
}
