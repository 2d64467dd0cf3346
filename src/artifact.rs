//! Persistence of decrypted artifacts. The output location is
//! deterministic: `<cache_root>/decrypted/<original_file_name>`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory under the cache root holding decrypted output.
pub const ARTIFACT_DIR: &str = "decrypted";

/// Deterministic output path for a decrypted package.
pub fn artifact_path(cache_root: &Path, file_name: &str) -> PathBuf {
    cache_root.join(ARTIFACT_DIR).join(file_name)
}

/// Write decrypted bytes to `path`, creating the parent directory if
/// absent. Any I/O failure is returned; the caller must not report
/// success on an unverified write.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}
