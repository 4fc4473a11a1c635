use super::state::PipelineStage;

#[derive(Debug, Clone)]
pub enum Progress {
    StageStart { stage: PipelineStage },
    StageFinish { stage: PipelineStage },

    /// An alignment from an earlier run was found and reused.
    CacheHit { alignment: String },
    /// Group retrieval failed and pairwise orthologs are used instead.
    Fallback { reason: String },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
