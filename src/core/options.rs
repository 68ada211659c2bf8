//! The configuration object validators inspect.

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Raw certificate or key material (PEM bytes).
///
/// `Debug` never prints the bytes, so material can sit inside structs that get logged.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct CertificateMaterial(Vec<u8>);

impl CertificateMaterial {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CertificateMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertificateMaterial(<{} bytes>)", self.0.len())
    }
}

impl From<String> for CertificateMaterial {
    fn from(pem: String) -> Self {
        Self(pem.into_bytes())
    }
}

impl From<&str> for CertificateMaterial {
    fn from(pem: &str) -> Self {
        Self(pem.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for CertificateMaterial {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for CertificateMaterial {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Mapping from certificate name (e.g. `"ca"`, `"client"`) to its material.
///
/// Iteration order is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CertificateSet(BTreeMap<String, CertificateMaterial>);

impl CertificateSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, material: impl Into<CertificateMaterial>) {
        self.0.insert(name.into(), material.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, material: impl Into<CertificateMaterial>) -> Self {
        self.insert(name, material);
        self
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&CertificateMaterial> {
        self.0.get(name)
    }

    /// Whether an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CertificateMaterial)> {
        self.0.iter().map(|(name, material)| (name.as_str(), material))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load every regular file in `dir` as an entry keyed by its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its files cannot be read.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        let mut set = Self::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            set.insert(name, fs::read(entry.path())?);
        }

        tracing::debug!(
            dir = %dir.as_ref().display(),
            entries = set.len(),
            "Loaded certificate set"
        );
        Ok(set)
    }
}

impl<N, M> FromIterator<(N, M)> for CertificateSet
where
    N: Into<String>,
    M: Into<CertificateMaterial>,
{
    fn from_iter<I: IntoIterator<Item = (N, M)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, material)| (name.into(), material.into()))
                .collect(),
        )
    }
}

/// Configuration under test, as far as the validators are concerned.
///
/// `certificates: None` means the configuration carries no certificate set at all,
/// which is reported differently from a set that lacks a particular entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Options {
    /// Named certificate material, if any was configured
    #[serde(default)]
    pub certificates: Option<CertificateSet>,
}

impl Options {
    /// Options without a certificate set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a certificate set.
    pub fn with_certificates(mut self, certificates: CertificateSet) -> Self {
        self.certificates = Some(certificates);
        self
    }

    /// Build options from a certificate directory.
    ///
    /// A directory that does not exist yields options without a certificate set.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn from_certificate_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Self::new());
        }
        Ok(Self::new().with_certificates(CertificateSet::from_directory(dir)?))
    }
}
