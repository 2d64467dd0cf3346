//! State machine for the package decrypt workflow.
//!
//! The controller is driven by one [`DecryptWorkflow::tick`] per render
//! frame. No operation suspends: the file and license gates report a
//! terminal outcome per invocation, and each gate fires at most once per
//! armed cycle, so re-entering the workflow every frame never repeats a
//! side effect.
//!
//! # States
//!
//! - **Idle**: No run in progress. With the dialog open and the file gate
//!   armed this doubles as "awaiting file".
//! - **PendingDecrypt**: Package bytes and key material are resolved; the
//!   decrypt step runs on the next tick, exactly once.
//! - **NotEncrypted**: The chosen package was already plaintext.
//! - **Succeeded**: Decryption finished and the artifact was written.
//! - **Failed**: License parse, decryption or artifact write failed.
//!
//! # State Transitions
//!
//! ```text
//! Idle -- file chosen, not encrypted --------------------> NotEncrypted
//! Idle -- file chosen, encrypted, not application -------> PendingDecrypt
//! Idle -- file chosen, encrypted, application:
//!         license parsed ------------------------------- > PendingDecrypt
//!         license parse failed -------------------------- > Failed
//!         license picker cancelled ---------------------- > Idle (closed)
//! Idle -- file picker cancelled or errored --------------> Idle (closed)
//! PendingDecrypt -- decrypt yields output ---------------> Succeeded
//! PendingDecrypt -- decrypt yields nothing / write fails -> Failed
//! NotEncrypted | Succeeded | Failed -- acknowledge() ----> Idle (closed)
//! ```
//!
//! License acquisition happens eagerly, inside the same tick that the file
//! gate reports success, so the presentation layer never observes
//! `PendingDecrypt` with unresolved inputs.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::artifact;
use crate::config::WorkflowConfig;
use crate::dialog::{DialogResult, FileDialog};
use crate::error::WorkflowError;
use crate::license::{LicenseKey, LicenseLoader};
use crate::package::{DecryptEngine, PackageBuffer, PackageClassifier};

/// Represents the different states the decrypt workflow can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    /// No run in progress.
    Idle,
    /// Inputs resolved, decrypt step pending.
    PendingDecrypt,
    /// Terminal: the package was already plaintext.
    NotEncrypted,
    /// Terminal: decrypted artifact written.
    Succeeded,
    /// Terminal: the run failed.
    Failed,
}

impl WorkflowState {
    /// Terminal states wait for the user to acknowledge before the
    /// workflow resets.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::NotEncrypted | WorkflowState::Succeeded | WorkflowState::Failed
        )
    }
}

impl Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::PendingDecrypt => "PendingDecrypt",
            WorkflowState::NotEncrypted => "NotEncrypted",
            WorkflowState::Succeeded => "Succeeded",
            WorkflowState::Failed => "Failed",
        };
        write!(f, "{state}")
    }
}

/// Read-only view of the controller for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub dialog_open: bool,
    pub file_name: Option<String>,
    pub artifact_path: Option<PathBuf>,
}

/// Controller sequencing file acquisition, classification, license
/// acquisition, decryption and artifact persistence for one run at a time.
pub struct DecryptWorkflow<D, C, L, E> {
    dialog: D,
    classifier: C,
    license_loader: L,
    engine: E,
    config: WorkflowConfig,
    state: WorkflowState,
    /// The dialog stays open from `open()` until acknowledge or abort.
    dialog_open: bool,
    /// The file gate fires at most once per armed cycle.
    file_gate_armed: bool,
    package: Option<PackageBuffer>,
    license: Option<LicenseKey>,
    /// Original file name, kept through terminal states for display.
    current_file: Option<String>,
    artifact: Option<PathBuf>,
}

impl<D, C, L, E> DecryptWorkflow<D, C, L, E>
where
    D: FileDialog,
    C: PackageClassifier,
    L: LicenseLoader,
    E: DecryptEngine,
{
    pub fn new(dialog: D, classifier: C, license_loader: L, engine: E, config: WorkflowConfig) -> Self {
        Self {
            dialog,
            classifier,
            license_loader,
            engine,
            config,
            state: WorkflowState::Idle,
            dialog_open: false,
            file_gate_armed: false,
            package: None,
            license: None,
            current_file: None,
            artifact: None,
        }
    }

    /// Open the workflow dialog and arm the file gate for the next tick.
    /// No-op while a run is already open.
    pub fn open(&mut self) {
        if self.dialog_open {
            return;
        }
        self.dialog_open = true;
        self.file_gate_armed = true;
        info!("[open] Dialog opened, file gate armed");
    }

    pub fn is_open(&self) -> bool {
        self.dialog_open
    }

    /// Get the current state.
    pub fn current_state(&self) -> WorkflowState {
        self.state
    }

    /// Original name of the file chosen for the current run.
    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    /// Path of the decrypted artifact, present only in `Succeeded`.
    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            state: self.state,
            dialog_open: self.dialog_open,
            file_name: self.current_file.clone(),
            artifact_path: self.artifact.clone(),
        }
    }

    /// Advance the workflow by one frame.
    ///
    /// At most one gate or the decrypt step runs per tick; everything else
    /// is a no-op, so the presentation layer may call this every frame.
    pub fn tick(&mut self) {
        if !self.dialog_open {
            return;
        }

        if self.file_gate_armed {
            self.file_gate_armed = false;
            self.run_file_gate();
            return;
        }

        if self.state == WorkflowState::PendingDecrypt && self.package.is_some() {
            self.run_decrypt();
        }
    }

    /// Dismiss a terminal state, clearing all per-run entities and closing
    /// the dialog. The next `open()` starts a fresh run.
    ///
    /// # Errors
    /// - If the current state is not terminal
    pub fn acknowledge(&mut self) -> Result<(), WorkflowError> {
        if !self.state.is_terminal() {
            return Err(WorkflowError::InvalidTransition {
                from: self.state.to_string(),
                to: WorkflowState::Idle.to_string(),
            });
        }
        info!("[acknowledge] Run dismissed, transitioning to Idle state");
        self.reset();
        Ok(())
    }

    /// Invoke the file gate once and process its outcome.
    fn run_file_gate(&mut self) {
        match self.dialog.open_file(&self.config.package_filters) {
            DialogResult::Chosen(path) => self.ingest_package(path),
            DialogResult::Cancelled => {
                info!("[run_file_gate] File picker cancelled, closing dialog");
                self.reset();
            }
            DialogResult::Error(message) => {
                error!(
                    "[run_file_gate] {}",
                    WorkflowError::Dialog(message)
                );
                self.reset();
            }
        }
    }

    /// Read and classify the chosen package, then resolve the inputs the
    /// decrypt step needs. Runs inside the same tick as the file gate.
    fn ingest_package(&mut self, path: PathBuf) {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) => {
                error!(
                    "[ingest_package] {}",
                    WorkflowError::PackageRead {
                        path: path.display().to_string(),
                        source,
                    }
                );
                self.reset();
                return;
            }
        };

        let classification = self.classifier.classify(&bytes);
        self.current_file = Some(file_name.clone());

        if !classification.encrypted {
            info!("[ingest_package] '{file_name}' is not encrypted, nothing to do");
            self.state = WorkflowState::NotEncrypted;
            return;
        }

        let package = PackageBuffer::new(file_name, bytes);
        if classification.application {
            // License-bound content: acquire the key before PendingDecrypt
            // is ever observable.
            self.run_license_gate(package);
        } else {
            // Encrypted auxiliary content decrypts with an empty key.
            self.enter_pending_decrypt(package, LicenseKey::empty());
        }
    }

    /// Invoke the license gate once for an encrypted application package.
    fn run_license_gate(&mut self, package: PackageBuffer) {
        match self.dialog.open_file(&self.config.license_filters) {
            DialogResult::Chosen(license_path) => {
                match self.license_loader.load_license(&license_path) {
                    Ok(key) => self.enter_pending_decrypt(package, key),
                    Err(err) => {
                        error!(
                            "[run_license_gate] Error opening license file '{}': {err}",
                            license_path.display()
                        );
                        self.state = WorkflowState::Failed;
                    }
                }
            }
            DialogResult::Cancelled => {
                info!("[run_license_gate] License picker cancelled, aborting run");
                self.reset();
            }
            DialogResult::Error(message) => {
                error!("[run_license_gate] {}", WorkflowError::Dialog(message));
                self.reset();
            }
        }
    }

    fn enter_pending_decrypt(&mut self, package: PackageBuffer, key: LicenseKey) {
        info!(
            "[enter_pending_decrypt] '{}' ready to decrypt ({} bytes, license: {})",
            package.file_name,
            package.len(),
            if key.is_empty() { "none" } else { "present" }
        );
        self.package = Some(package);
        self.license = Some(key);
        self.state = WorkflowState::PendingDecrypt;
    }

    /// Execute the decrypt step. Consumes the package buffer and the key,
    /// so a later tick can never trigger it again for this run.
    fn run_decrypt(&mut self) {
        let Some(package) = self.package.take() else {
            return;
        };
        let key = self.license.take().unwrap_or_else(LicenseKey::empty);
        let file_name = package.file_name.clone();

        match self.try_decrypt(package, key) {
            Ok(path) => {
                info!(
                    "[run_decrypt] '{file_name}' decrypted to {}",
                    path.display()
                );
                self.artifact = Some(path);
                self.state = WorkflowState::Succeeded;
            }
            Err(err) => {
                error!("[run_decrypt] '{file_name}': {err}");
                self.state = WorkflowState::Failed;
            }
        }
    }

    fn try_decrypt(
        &mut self,
        package: PackageBuffer,
        key: LicenseKey,
    ) -> Result<PathBuf, WorkflowError> {
        let PackageBuffer { file_name, bytes } = package;
        let plaintext = self.engine.decrypt(bytes, &key);
        // Key material is single-use: zeroed here on every outcome.
        drop(key);

        if plaintext.is_empty() {
            return Err(WorkflowError::DecryptionFailed(file_name));
        }

        let path = artifact::artifact_path(&self.config.cache_root, &file_name);
        artifact::write_artifact(&path, &plaintext)?;
        Ok(path)
    }

    /// Clear all per-run entities and close the dialog. The file gate is
    /// re-armed by the next `open()`.
    fn reset(&mut self) {
        self.package = None;
        self.license = None;
        self.current_file = None;
        self.artifact = None;
        self.state = WorkflowState::Idle;
        self.dialog_open = false;
        self.file_gate_armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::FileFilter;
    use crate::license::LicenseError;
    use crate::package::Classification;

    struct CancelDialog;

    impl FileDialog for CancelDialog {
        fn open_file(&mut self, _filters: &[FileFilter]) -> DialogResult {
            DialogResult::Cancelled
        }
    }

    struct PlainClassifier;

    impl PackageClassifier for PlainClassifier {
        fn classify(&self, _bytes: &[u8]) -> Classification {
            Classification {
                encrypted: false,
                application: false,
            }
        }
    }

    struct NoLicense;

    impl LicenseLoader for NoLicense {
        fn load_license(&self, _path: &Path) -> Result<LicenseKey, LicenseError> {
            Err(LicenseError::Malformed("unreachable".to_string()))
        }
    }

    struct IdentityEngine;

    impl DecryptEngine for IdentityEngine {
        fn decrypt(&self, bytes: Vec<u8>, _key: &LicenseKey) -> Vec<u8> {
            bytes
        }
    }

    fn workflow() -> DecryptWorkflow<CancelDialog, PlainClassifier, NoLicense, IdentityEngine> {
        DecryptWorkflow::new(
            CancelDialog,
            PlainClassifier,
            NoLicense,
            IdentityEngine,
            WorkflowConfig::default(),
        )
    }

    #[test]
    fn test_initial_state() {
        let workflow = workflow();
        assert_eq!(workflow.current_state(), WorkflowState::Idle);
        assert!(!workflow.is_open());
        assert!(workflow.current_file().is_none());
        assert!(workflow.artifact_path().is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!WorkflowState::Idle.is_terminal());
        assert!(!WorkflowState::PendingDecrypt.is_terminal());
        assert!(WorkflowState::NotEncrypted.is_terminal());
        assert!(WorkflowState::Succeeded.is_terminal());
        assert!(WorkflowState::Failed.is_terminal());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(WorkflowState::PendingDecrypt.to_string(), "PendingDecrypt");
        assert_eq!(WorkflowState::NotEncrypted.to_string(), "NotEncrypted");
    }

    #[test]
    fn test_tick_without_open_is_noop() {
        let mut workflow = workflow();
        workflow.tick();
        assert_eq!(workflow.current_state(), WorkflowState::Idle);
        assert!(!workflow.is_open());
    }

    #[test]
    fn test_cancelled_picker_closes_dialog() {
        let mut workflow = workflow();
        workflow.open();
        assert!(workflow.is_open());

        workflow.tick();
        assert_eq!(workflow.current_state(), WorkflowState::Idle);
        assert!(!workflow.is_open());
    }

    #[test]
    fn test_acknowledge_rejected_outside_terminal_state() {
        let mut workflow = workflow();
        let result = workflow.acknowledge();
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));

        workflow.open();
        let result = workflow.acknowledge();
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_open_while_open_is_noop() {
        let mut workflow = workflow();
        workflow.open();
        workflow.open();
        // One armed cycle: the single tick consumes it, a second tick
        // must not fire the gate again.
        workflow.tick();
        assert!(!workflow.is_open());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut workflow = workflow();
        workflow.open();
        let snapshot = workflow.snapshot();
        assert_eq!(snapshot.state, WorkflowState::Idle);
        assert!(snapshot.dialog_open);
        assert!(snapshot.file_name.is_none());
        assert!(snapshot.artifact_path.is_none());
    }
}
