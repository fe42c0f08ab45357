use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, trace};

use super::{LockEntries, LockEntry, LockLoader};
use crate::error::LoadError;

/// Loader for `go.sum` files.
#[derive(Debug, Default)]
pub struct GoSumLoader;

impl GoSumLoader {
    pub fn new() -> Self {
        Self
    }
}

impl LockLoader for GoSumLoader {
    fn load_lock(&self, path: &Path) -> Result<LockEntries, LoadError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no go.sum, continuing without lock entries");
                return Ok(LockEntries::new());
            }
            Err(e) => return Err(LoadError::read(path, e)),
        };

        let entries = parse_go_sum(&content);
        debug!(entries = entries.len(), "parsed go.sum");
        Ok(entries)
    }
}

/// Parse `go.sum` content.
///
/// Each line is `<module> <version>[/go.mod] <hash>`. The `/go.mod` lines only
/// checksum the module's manifest and are skipped, as are lines with fewer
/// than three fields.
pub fn parse_go_sum(content: &str) -> LockEntries {
    let mut entries = LockEntries::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [module_path, version, hash, ..] = parts.as_slice() else {
            if !parts.is_empty() {
                trace!(line, "skipping short go.sum line");
            }
            continue;
        };

        if version.ends_with("/go.mod") {
            continue;
        }

        let entry = LockEntry {
            module_path: module_path.to_string(),
            version: version.to_string(),
            hash: hash.to_string(),
        };
        entries.insert(entry.key(), entry);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const SAMPLE: &str = "\
github.com/spf13/cobra v1.8.0 h1:7aJaZx1B85qltLMc546zn58BxxfZdR/W22ej9CFoEf0=
github.com/spf13/cobra v1.8.0/go.mod h1:WXLWApfZ71AjXPya3WOlMsY9yMs7YeiHhFVlvLyhcho=
golang.org/x/mod v0.14.0 h1:dGoOF9QVLYng8IHTm7BAyWqCqSheQ5pYWGhzW00YJr0=
golang.org/x/mod v0.12.0 h1:rmsUpXtvNzj340zd98LZ4KntptpfRHwpFOHG188oHXc=

truncated-line v1.0.0
";

    #[test]
    fn test_parse_skips_go_mod_and_short_lines() {
        let entries = parse_go_sum(SAMPLE);
        assert_eq!(entries.len(), 3);

        let cobra = &entries["github.com/spf13/cobra@v1.8.0"];
        assert_eq!(cobra.hash, "h1:7aJaZx1B85qltLMc546zn58BxxfZdR/W22ej9CFoEf0=");
        assert!(entries.contains_key("golang.org/x/mod@v0.12.0"));
        assert!(entries.contains_key("golang.org/x/mod@v0.14.0"));
    }

    #[test]
    fn test_load_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", SAMPLE).unwrap();
        let entries = GoSumLoader::new().load_lock(f.path()).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let entries = GoSumLoader::new()
            .load_lock(&dir.path().join("go.sum"))
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unreadable_existing_path_is_error() {
        // A directory exists but cannot be read as a file.
        let dir = TempDir::new().unwrap();
        let err = GoSumLoader::new().load_lock(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
