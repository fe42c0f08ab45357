//! Loaders for the two inputs of a run.
//!
//! - [`modfile`]: reads `go.mod` into a [`ModFile`] (module path, Go version,
//!   ordered `require` list).
//! - [`gosum`]: reads `go.sum` into [`LockEntries`] keyed by `path@version`.
//!
//! Both sit behind a small trait so the graph code never touches the
//! filesystem directly.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::LoadError;

pub mod gosum;
pub mod modfile;

/// A parsed `go.mod`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModFile {
    pub module_path: String,
    pub go_version: Option<String>,
    pub requires: Vec<Requirement>,
}

/// One `require` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

/// A resolved module version as recorded in `go.sum`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockEntry {
    pub module_path: String,
    pub version: String,
    pub hash: String,
}

impl LockEntry {
    pub fn key(&self) -> String {
        lock_key(&self.module_path, &self.version)
    }
}

/// `go.sum` entries keyed by `path@version`.
pub type LockEntries = BTreeMap<String, LockEntry>;

pub fn lock_key(module_path: &str, version: &str) -> String {
    format!("{}@{}", module_path, version)
}

pub trait ManifestLoader {
    fn load_manifest(&self, path: &Path) -> Result<ModFile, LoadError>;
}

pub trait LockLoader {
    /// A lock file that does not exist yields an empty map, not an error.
    fn load_lock(&self, path: &Path) -> Result<LockEntries, LoadError>;
}
