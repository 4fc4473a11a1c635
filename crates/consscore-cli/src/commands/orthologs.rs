use crate::cli::OrthologsArgs;
use crate::config::PartialConsScoreConfig;
use crate::error::Result;
use consscore::{
    core::fasta,
    workflows::conserve::{ConservationPipeline, SequenceInput},
};
use tracing::info;

pub fn run(args: OrthologsArgs) -> Result<()> {
    let partial_config = PartialConsScoreConfig::load(args.config.as_deref())?;
    let current_dir = std::env::current_dir()?;
    let final_config = partial_config.merge_for_orthologs(&args, &current_dir)?;

    let pipeline =
        ConservationPipeline::with_defaults(SequenceInput::detect(&args.input), final_config)?;
    info!("Querying the orthology service for '{}'", pipeline.name());
    let orthologs = pipeline.retrieve_orthologs()?;
    let count = fasta::split_into_records(&orthologs).len();

    match &args.output {
        Some(path) => {
            std::fs::write(path, &orthologs)?;
            println!("✓ {} sequence(s) written to: {}", count, path.display());
        }
        None => {
            info!("Retrieved {} sequence(s).", count);
            println!("{}", orthologs);
        }
    }
    Ok(())
}
