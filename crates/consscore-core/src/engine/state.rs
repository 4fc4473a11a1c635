use std::fmt;

/// Where a pipeline run stands. Stages only move forward within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PipelineStage {
    #[default]
    Created,
    OrthologsFetched,
    Aligned,
    Scored,
    CleanedUp,
}

impl PipelineStage {
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Created => "Preparing",
            PipelineStage::OrthologsFetched => "Retrieving orthologs",
            PipelineStage::Aligned => "Aligning sequences",
            PipelineStage::Scored => "Scoring conservation",
            PipelineStage::CleanedUp => "Cleaning up",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
