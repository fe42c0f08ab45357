use std::path::Path;

use tracing::debug;

use super::{ManifestLoader, ModFile, Requirement};
use crate::error::LoadError;

/// Loader for `go.mod` files.
///
/// Understands `module`, `go`, and `require` (single-line and block form).
/// `replace`, `exclude`, `retract`, `toolchain`, `godebug`, `tool` and
/// `ignore` are accepted and skipped.
#[derive(Debug, Default)]
pub struct GoModLoader;

impl GoModLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestLoader for GoModLoader {
    fn load_manifest(&self, path: &Path) -> Result<ModFile, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::read(path, e))?;
        let modfile = parse_go_mod(path, &content)?;

        debug!(
            module = %modfile.module_path,
            requires = modfile.requires.len(),
            "parsed go.mod"
        );
        Ok(modfile)
    }
}

const SKIPPED_DIRECTIVES: &[&str] = &[
    "replace", "exclude", "retract", "toolchain", "godebug", "tool", "ignore",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Block {
    Require,
    Skipped,
}

/// Parse `go.mod` content. `path` is only used for error messages.
pub fn parse_go_mod(path: &Path, content: &str) -> Result<ModFile, LoadError> {
    let mut modfile = ModFile::default();
    let mut block: Option<(Block, usize)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let (code, comment) = split_comment(raw);
        let code = code.trim();

        if let Some((kind, _)) = block {
            if code == ")" {
                block = None;
            } else if !code.is_empty() && kind == Block::Require {
                modfile.requires.push(parse_requirement(path, line_no, code, comment)?);
            }
            continue;
        }

        let mut tokens = code.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        // `require(` opens a block just like `require (`.
        let (directive, args): (&str, Vec<&str>) = match first.strip_suffix('(') {
            Some(d) if !d.is_empty() => (d, std::iter::once("(").chain(tokens).collect()),
            _ => (first, tokens.collect()),
        };

        match directive {
            "module" => match args.as_slice() {
                [module] => modfile.module_path = unquote(module).to_string(),
                _ => return Err(LoadError::parse(path, line_no, "usage: module module/path")),
            },
            "go" => match args.as_slice() {
                [version] => modfile.go_version = Some(version.to_string()),
                _ => return Err(LoadError::parse(path, line_no, "usage: go 1.23")),
            },
            "require" => {
                if args == ["("] {
                    block = Some((Block::Require, line_no));
                } else {
                    let rest = code["require".len()..].trim();
                    modfile.requires.push(parse_requirement(path, line_no, rest, comment)?);
                }
            }
            d if SKIPPED_DIRECTIVES.contains(&d) => {
                if args.last() == Some(&"(") {
                    block = Some((Block::Skipped, line_no));
                }
            }
            other => {
                return Err(LoadError::parse(
                    path,
                    line_no,
                    format!("unknown directive: {}", other),
                ))
            }
        }
    }

    if let Some((_, opened_at)) = block {
        return Err(LoadError::parse(path, opened_at, "unterminated block: missing ')'"));
    }
    if modfile.module_path.is_empty() {
        return Err(LoadError::parse(path, 0, "missing module declaration"));
    }

    Ok(modfile)
}

fn parse_requirement(
    path: &Path,
    line_no: usize,
    text: &str,
    comment: Option<&str>,
) -> Result<Requirement, LoadError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [module, version] = parts.as_slice() else {
        return Err(LoadError::parse(
            path,
            line_no,
            "usage: require module/path v1.2.3",
        ));
    };

    Ok(Requirement {
        path: unquote(module).to_string(),
        version: unquote(version).to_string(),
        indirect: comment.map(is_indirect_marker).unwrap_or(false),
    })
}

/// `// indirect` or `// indirect; some note`.
fn is_indirect_marker(comment: &str) -> bool {
    let c = comment.trim();
    c == "indirect" || c.starts_with("indirect;")
}

fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(pos) => (&line[..pos], Some(&line[pos + 2..])),
        None => (line, None),
    }
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}
