//! Error types for research scheduling.

use scaffold_task_graph::TaskId;
use thiserror::Error;

/// Boxed error returned by [`Researcher`](crate::Researcher) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for research operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running research.
#[derive(Debug, Error)]
pub enum Error {
    /// The researcher failed for a task; the run stops there.
    #[error("Research failed for task '{task}'")]
    ResearchFailed {
        /// The task being researched.
        task: TaskId,
        /// Error reported by the researcher.
        #[source]
        source: BoxError,
    },

    /// A research job was cancelled or panicked before reporting back.
    #[error("Research job aborted: {reason}")]
    Aborted {
        /// What happened to the job.
        reason: String,
    },
}
