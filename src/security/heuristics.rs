use crate::models::{SecurityIssue, Severity};

const PRERELEASE_MARKERS: &[&str] = &["dev", "alpha", "beta", "rc", "snapshot"];

/// Date stamps of pseudo-versions from 2016-2018.
const OLD_DATE_MARKERS: &[&str] = &["20161208", "20170", "20180"];

const INSECURE_PATH_MARKERS: &[&str] = &["crypto/md5", "crypto/sha1", "net/http/httputil"];

const ZERO_VERSION: &str = "v0.0.0";

fn issue(id: &str, severity: Severity, description: &str, fixed_in: &str) -> SecurityIssue {
    SecurityIssue {
        id: id.to_string(),
        severity,
        description: description.to_string(),
        fixed_in: fixed_in.to_string(),
    }
}

/// Pre-release and old pseudo-version checks on the version string.
pub fn check_version(version: &str) -> Vec<SecurityIssue> {
    let mut issues = Vec::new();

    if PRERELEASE_MARKERS.iter().any(|m| version.contains(m)) {
        issues.push(issue(
            "DEV-VERSION",
            Severity::Low,
            "Development version detected in dependencies",
            "Use stable release version",
        ));
    }

    if OLD_DATE_MARKERS.iter().any(|m| version.contains(m)) {
        issues.push(issue(
            "OLD-VERSION",
            Severity::Medium,
            "Very old package version may have security vulnerabilities",
            "Update to latest version",
        ));
    }

    issues
}

/// One issue per insecure primitive named in the module path.
pub fn check_module_path(module_path: &str) -> Vec<SecurityIssue> {
    INSECURE_PATH_MARKERS
        .iter()
        .filter(|m| module_path.contains(*m))
        .map(|_| {
            issue(
                "INSECURE-CRYPTO",
                Severity::High,
                "Package uses insecure cryptographic functions",
                "Use secure alternatives (SHA-256, bcrypt, etc.)",
            )
        })
        .collect()
}

pub fn check_missing_version(version: &str) -> Vec<SecurityIssue> {
    if version.is_empty() || version == ZERO_VERSION {
        vec![issue(
            "NO-VERSION",
            Severity::Low,
            "Package without proper versioning detected",
            "Use properly versioned packages",
        )]
    } else {
        Vec::new()
    }
}
