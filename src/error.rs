use crate::license::LicenseError;

/// Errors surfaced by the decrypt workflow.
///
/// User cancellation is not an error: it silently returns the workflow to
/// `Idle` and never appears here.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("File dialog failed: {0}")]
    Dialog(String),

    #[error("Failed to read package file '{path}': {source}")]
    PackageRead {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    License(#[from] LicenseError),

    #[error("Decryption produced no output for '{0}'")]
    DecryptionFailed(String),

    #[error("Failed to write decrypted artifact: {0}")]
    ArtifactWrite(#[from] std::io::Error),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("An unknown error occurred: {0}")]
    Other(anyhow::Error),
}
