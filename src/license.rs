//! License key material and the loader that produces it from a license
//! file. Key material is sensitive and short-lived: it exists for exactly
//! one decrypt attempt and is zeroed on drop regardless of outcome.

use std::fmt;
use std::path::Path;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque key material parsed out of a license file.
///
/// The empty key is a valid decrypt input for content that is not
/// license-bound.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct LicenseKey(Vec<u8>);

impl LicenseKey {
    pub fn new(material: Vec<u8>) -> Self {
        Self(material)
    }

    /// Key for content that never required a license.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Key material must never leak through logs.
impl fmt::Debug for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LicenseKey({} bytes)", self.0.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    #[error("Failed to read license file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed license file: {0}")]
    Malformed(String),
}

/// Host capability that parses a license file into key material.
pub trait LicenseLoader {
    fn load_license(&self, path: &Path) -> Result<LicenseKey, LicenseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_empty() {
        assert!(LicenseKey::empty().is_empty());
        assert!(LicenseKey::default().is_empty());
        assert!(!LicenseKey::new(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_debug_redacts_material() {
        let key = LicenseKey::new(vec![0xAA; 16]);
        let rendered = format!("{key:?}");
        assert_eq!(rendered, "LicenseKey(16 bytes)");
        assert!(!rendered.contains("170"));
    }

    #[test]
    fn test_zeroize_clears_material() {
        let mut key = LicenseKey::new(vec![0xAA; 16]);
        key.zeroize();
        assert!(key.is_empty());
    }
}
