//! Fire-and-forget background jobs enqueued by the pipeline.
//!
//! The pipeline only hands a job off; it never waits for or observes the
//! result. Delivery happens out of band, keyed by session id.

use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum DeferredJob {
    /// Pre-render the battle backdrop for a session while personas are
    /// still being synthesized.
    BackdropRender { session_id: Uuid, prompt: String },
}

pub trait DeferredTasks: Send + Sync {
    fn enqueue(&self, job: DeferredJob);
}

/// Runs each job on a detached tokio task.
pub struct SpawnedTasks;

impl DeferredTasks for SpawnedTasks {
    fn enqueue(&self, job: DeferredJob) {
        match job {
            DeferredJob::BackdropRender { session_id, prompt } => {
                tokio::spawn(async move {
                    info!(%session_id, prompt = %prompt, "Backdrop render started");
                    // Rendering itself lives in the worker service; this job
                    // only warms it up so the asset is ready at battle start.
                });
            }
        }
    }
}

/// Drops jobs on the floor. For callers that want a profile with no side
/// effects, such as the CLI.
pub struct NoopTasks;

impl DeferredTasks for NoopTasks {
    fn enqueue(&self, job: DeferredJob) {
        debug!(?job, "Dropping deferred job");
    }
}
