use std::process::ExitStatus;

use thiserror::Error;

use crate::fetch::DownloadError;
use crate::render::TemplateError;

/// Everything that can stop a submission.
///
/// Configuration problems abort before any script is written; IO and
/// download problems abort the remaining steps of the submission that hit
/// them. Nothing is retried.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("you can only choose one of docker or singularity")]
    BothRuntimes,
    #[error("you must choose one of docker or singularity")]
    NoRuntime,
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error("command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
