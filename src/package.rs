//! Package bytes and the external capabilities that inspect and decrypt
//! them. Detection and decryption are host concerns; this crate only
//! defines their contracts.

use crate::license::LicenseKey;

/// Raw contents of the user-chosen package file, together with the
/// original file name used for display and for naming the output artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageBuffer {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PackageBuffer {
    pub fn new(file_name: String, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// What the classifier reports about a package payload. The two flags are
/// independent: non-application content can still be encrypted, it just
/// never requires a license.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub encrypted: bool,
    pub application: bool,
}

/// Host capability that inspects package bytes. Content is sniffed, never
/// trusted from the file extension.
pub trait PackageClassifier {
    fn classify(&self, bytes: &[u8]) -> Classification;
}

/// Host capability that decrypts package bytes with the given key.
///
/// An empty key is the expected input for non-licensed content. Empty
/// output signals failure; there is no richer error channel.
pub trait DecryptEngine {
    fn decrypt(&self, bytes: Vec<u8>, key: &LicenseKey) -> Vec<u8>;
}
