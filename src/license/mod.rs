//! License lookup and risk classification.
//!
//! - [`LicenseLookup`]: resolves a module path to a license identifier.
//!   [`ModuleLicenseTable`] is the built-in table-and-pattern implementation.
//! - [`spdx`]: risk level of single SPDX identifiers plus alias normalization.
//! - [`classifier`]: risk level of whole license strings, including
//!   `OR` / `AND` expressions.

use std::collections::HashMap;

use crate::config::LicenseConfig;

pub mod classifier;
pub mod spdx;

pub const UNKNOWN_LICENSE: &str = "Unknown";

/// Something that can name the license of a module.
pub trait LicenseLookup {
    /// Always returns a non-empty identifier; `"Unknown"` when nothing matches.
    fn license_for(&self, module_path: &str) -> String;
}

/// Exact module paths, then path patterns, then `"Unknown"`.
#[derive(Debug, Clone)]
pub struct ModuleLicenseTable {
    known: HashMap<String, String>,
    /// `(substring, license)`; the first pattern contained in the path wins.
    patterns: Vec<(String, String)>,
}

const KNOWN_MODULES: &[(&str, &str)] = &[
    ("github.com/spf13/cobra", "Apache-2.0"),
    ("github.com/spf13/pflag", "BSD-3-Clause"),
    ("github.com/awalterschulze/gographviz", "Apache-2.0"),
    ("github.com/inconshreveable/mousetrap", "Apache-2.0"),
    ("golang.org/x/mod", "BSD-3-Clause"),
    ("gopkg.in/yaml.v3", "Apache-2.0"),
    ("github.com/google/licensecheck", "BSD-3-Clause"),
    ("github.com/fatih/color", "MIT"),
];

const PATH_PATTERNS: &[(&str, &str)] = &[
    ("golang.org/x/", "BSD-3-Clause"),
    ("github.com/mattn/", "MIT"),
];

impl ModuleLicenseTable {
    pub fn builtin() -> Self {
        Self {
            known: KNOWN_MODULES
                .iter()
                .map(|(m, l)| (m.to_string(), l.to_string()))
                .collect(),
            patterns: PATH_PATTERNS
                .iter()
                .map(|(p, l)| (p.to_string(), l.to_string()))
                .collect(),
        }
    }

    /// Built-in table with configured entries layered on top. Configured
    /// modules replace built-in ones; configured patterns are tried first.
    pub fn from_config(config: &LicenseConfig) -> Self {
        let mut table = Self::builtin();
        table
            .known
            .extend(config.known.iter().map(|(m, l)| (m.clone(), l.clone())));

        let mut patterns: Vec<(String, String)> = config
            .patterns
            .iter()
            .map(|(p, l)| (p.clone(), l.clone()))
            .collect();
        patterns.sort();
        patterns.append(&mut table.patterns);
        table.patterns = patterns;
        table
    }
}

impl LicenseLookup for ModuleLicenseTable {
    fn license_for(&self, module_path: &str) -> String {
        if let Some(license) = self.known.get(module_path) {
            return license.clone();
        }
        self.patterns
            .iter()
            .find(|(pattern, _)| module_path.contains(pattern.as_str()))
            .map(|(_, license)| license.clone())
            .unwrap_or_else(|| UNKNOWN_LICENSE.to_string())
    }
}
