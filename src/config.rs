use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::health::DEFAULT_WELL_KNOWN;
use crate::license::classifier::classify;
use crate::models::{LicenseRisk, PolicyVerdict, Severity};

/// Root configuration structure, deserialized from `.modviz/config.toml`.
/// Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub licenses: LicenseConfig,
    pub security: SecurityConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Exact module path → license, on top of the built-in table.
    pub known: HashMap<String, String>,
    /// Path substring → license, tried before the built-in patterns.
    pub patterns: BTreeMap<String, String>,
    /// Per-license verdict overrides keyed by license identifier.
    pub policy: HashMap<String, PolicyAction>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Severities that make `security` exit with status 1.
    pub fail_on: Vec<Severity>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            fail_on: vec![Severity::Critical, Severity::High],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Modules treated as actively maintained regardless of version.
    pub well_known: Vec<String>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            well_known: DEFAULT_WELL_KNOWN.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The action to take when a dependency's license matches a policy rule.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Pass,
    Warn,
    Error,
}

impl PolicyAction {
    pub fn to_verdict(&self) -> PolicyVerdict {
        match self {
            PolicyAction::Pass => PolicyVerdict::Pass,
            PolicyAction::Warn => PolicyVerdict::Warn,
            PolicyAction::Error => PolicyVerdict::Error,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.modviz/config.toml`
/// 3. `~/.config/modviz/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".modviz").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config: PathBuf = home.join(".config").join("modviz").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    debug!("no config file found, using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Verdict for a license: an explicit policy entry wins, otherwise the
/// license's risk decides. Copyleft warns; proprietary and unidentified
/// licenses are errors.
pub fn license_verdict(config: &Config, license: &str) -> PolicyVerdict {
    if let Some(action) = config.licenses.policy.get(license) {
        return action.to_verdict();
    }
    match classify(license) {
        LicenseRisk::Permissive => PolicyVerdict::Pass,
        LicenseRisk::WeakCopyleft | LicenseRisk::StrongCopyleft => PolicyVerdict::Warn,
        LicenseRisk::Proprietary | LicenseRisk::Unknown => PolicyVerdict::Error,
    }
}
