use crate::models::LicenseRisk;

const PERMISSIVE: &[&str] = &[
    "MIT", "MIT-0", "Apache-2.0", "BSD-2-Clause", "BSD-3-Clause", "ISC", "0BSD", "Unlicense",
    "Zlib", "CC0-1.0", "BlueOak-1.0.0",
];

/// Risk level of a single SPDX identifier.
///
/// Copyleft families are matched by prefix so `-only` / `-or-later` variants
/// land in the same bucket.
pub fn risk_of_id(id: &str) -> LicenseRisk {
    let id = id.trim();

    if PERMISSIVE.contains(&id) {
        return LicenseRisk::Permissive;
    }
    if id.starts_with("LGPL-") || id.starts_with("MPL-") || id.starts_with("EPL-") || id == "EUPL-1.2" {
        return LicenseRisk::WeakCopyleft;
    }
    if id.starts_with("GPL-") || id.starts_with("AGPL-") || id == "EUPL-1.1" {
        return LicenseRisk::StrongCopyleft;
    }
    LicenseRisk::Unknown
}

/// Map a handful of common spellings to their SPDX identifier.
pub fn normalize(raw: &str) -> String {
    let id = match raw.trim() {
        "Apache 2.0" | "Apache License 2.0" => "Apache-2.0",
        "MIT License" => "MIT",
        "BSD" | "New BSD" => "BSD-3-Clause",
        "Simplified BSD" => "BSD-2-Clause",
        "GPLv2" => "GPL-2.0",
        "GPLv3" => "GPL-3.0",
        "LGPLv3" => "LGPL-3.0",
        "AGPLv3" => "AGPL-3.0",
        "MPL 2.0" => "MPL-2.0",
        other => other,
    };
    id.to_string()
}
