use crate::cli::ScoreArgs;
use crate::config::PartialConsScoreConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use consscore::{
    core::models::conservation::ConservationRecord,
    engine::progress::ProgressReporter,
    workflows::conserve::{ConservationPipeline, SequenceInput},
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: ScoreArgs) -> Result<()> {
    let partial_config = PartialConsScoreConfig::load(args.config.as_deref())?;
    let current_dir = std::env::current_dir()?;
    info!("Merging configuration from file and CLI arguments...");
    let final_config = partial_config.merge_with_cli(&args, &current_dir)?;

    let input = SequenceInput::detect(&args.input);
    info!("Resolved input as {:?}", &input);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut pipeline =
        ConservationPipeline::with_defaults(input, final_config)?.with_reporter(reporter);

    println!("Scoring conservation for '{}'...", pipeline.name());
    let outcome = pipeline.pipe();
    progress_handler.finish();
    let record = outcome?;

    let output_path = data_file_path(&current_dir, pipeline.name());
    info!("Writing {} position(s) to {:?}", record.len(), &output_path);
    write_record(&record, &output_path)?;

    if let Some(alpha) = pipeline.alpha() {
        println!("Alpha parameter: {}", alpha);
    }
    println!(
        "✓ Conservation scores for {} position(s) written to: {}",
        record.len(),
        output_path.display()
    );
    Ok(())
}

fn data_file_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{} data", name))
}

fn write_record(record: &ConservationRecord, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    record
        .write_tsv(BufWriter::new(file))
        .map_err(|e| CliError::Output {
            path: path.to_path_buf(),
            source: e.into(),
        })
}
