use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::LoadError;
use crate::graph::{DependencyGraph, EnhancedDependencyGraph};
use crate::parser::gosum::GoSumLoader;
use crate::parser::modfile::GoModLoader;
use crate::parser::{LockEntries, LockLoader, ManifestLoader, ModFile};

pub const MANIFEST_FILE: &str = "go.mod";
pub const LOCK_FILE: &str = "go.sum";

/// A Go module directory with its inputs loaded.
#[derive(Debug)]
pub struct Project {
    pub path: PathBuf,
    pub modfile: ModFile,
    pub lock_entries: LockEntries,
}

impl Project {
    /// Load `go.mod` and `go.sum` from `path` with the standard loaders.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::load_with(path, &GoModLoader::new(), &GoSumLoader::new())
    }

    pub fn load_with(
        path: &Path,
        manifests: &dyn ManifestLoader,
        locks: &dyn LockLoader,
    ) -> Result<Self, LoadError> {
        let path = resolve_path(path);
        let manifest = path.join(MANIFEST_FILE);
        if !manifest.is_file() {
            return Err(LoadError::MissingManifest(path));
        }

        let modfile = manifests.load_manifest(&manifest)?;
        let lock_entries = locks.load_lock(&path.join(LOCK_FILE))?;
        info!(
            module = %modfile.module_path,
            requires = modfile.requires.len(),
            lock_entries = lock_entries.len(),
            "loaded project"
        );

        Ok(Self {
            path,
            modfile,
            lock_entries,
        })
    }

    /// Base graph merged with the lock entries; no analysis pass has run yet.
    pub fn into_graph(self) -> EnhancedDependencyGraph {
        let base = DependencyGraph::from_modfile(&self.modfile);
        EnhancedDependencyGraph::build(base, self.lock_entries)
    }
}

/// Absolute form of `path`; falls back to the path as given when it cannot
/// be canonicalized.
pub fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const GO_MOD: &str = "module example.com/app\n\ngo 1.21\n\nrequire (\n\tgithub.com/spf13/cobra v1.8.0\n\tgithub.com/spf13/pflag v1.0.5 // indirect\n)\n";

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = Project::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingManifest(_)));
        assert!(err.to_string().starts_with("go.mod file not found in"));
    }

    #[test]
    fn test_load_without_lock_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), GO_MOD).unwrap();

        let project = Project::load(dir.path()).unwrap();
        assert!(project.path.is_absolute());
        assert_eq!(project.modfile.module_path, "example.com/app");
        assert!(project.lock_entries.is_empty());

        let graph = project.into_graph();
        assert_eq!(graph.graph.all_nodes.len(), 3);
    }

    #[test]
    fn test_load_with_lock_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), GO_MOD).unwrap();
        fs::write(
            dir.path().join("go.sum"),
            "github.com/spf13/cobra v1.8.0 h1:abc=\n\
             github.com/spf13/cobra v1.8.0/go.mod h1:def=\n\
             github.com/inconshreveable/mousetrap v1.1.0 h1:ghi=\n",
        )
        .unwrap();

        let graph = Project::load(dir.path()).unwrap().into_graph();
        assert_eq!(graph.lock_entries.len(), 2);
        assert_eq!(graph.graph.all_nodes.len(), 4);
        assert_eq!(
            graph.enhanced_nodes["github.com/spf13/cobra"].hash.as_deref(),
            Some("h1:abc=")
        );
        assert!(!graph.enhanced_nodes["github.com/inconshreveable/mousetrap"].is_direct());
    }

    #[test]
    fn test_unreadable_lock_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), GO_MOD).unwrap();
        fs::create_dir(dir.path().join("go.sum")).unwrap();

        let err = Project::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_bad_manifest_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/app\nrequire (\n").unwrap();
        let err = Project::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
