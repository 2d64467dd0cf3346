//! Frame-resumable decrypt workflow for signed/encrypted package files.
//!
//! The crate is built around [`workflow::DecryptWorkflow`], a state machine
//! driven by one `tick()` per render frame. It sequences the external
//! collaborators (file dialog, package classifier, license loader and
//! decrypt engine) and persists the decrypted artifact to a deterministic
//! location under the configured cache root. The collaborators are consumed
//! through traits; this crate implements none of the cryptography itself.

pub mod artifact;
pub mod config;
pub mod dialog;
pub mod error;
pub mod license;
pub mod package;
pub mod workflow;

pub use config::WorkflowConfig;
pub use dialog::{DialogResult, FileDialog, FileFilter};
pub use error::WorkflowError;
pub use license::{LicenseError, LicenseKey, LicenseLoader};
pub use package::{Classification, DecryptEngine, PackageBuffer, PackageClassifier};
pub use workflow::{DecryptWorkflow, WorkflowSnapshot, WorkflowState};
