use crate::license::spdx::{normalize, risk_of_id};
use crate::models::LicenseRisk;

/// Classify a license string into a risk level.
///
/// `A OR B` takes the most permissive side, `A AND B` the most restrictive.
/// `/` is read as `OR`, `WITH` exceptions are ignored.
pub fn classify(license: &str) -> LicenseRisk {
    let trimmed = license.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        return LicenseRisk::Unknown;
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("proprietary") || lower.contains("commercial") {
        return LicenseRisk::Proprietary;
    }

    let expr = trimmed.replace('/', " OR ");
    expr.split(" OR ")
        .map(|alternative| {
            alternative
                .split(" AND ")
                .map(classify_single)
                .max_by_key(restrictiveness)
                .unwrap_or(LicenseRisk::Unknown)
        })
        .min_by_key(restrictiveness)
        .unwrap_or(LicenseRisk::Unknown)
}

fn classify_single(id: &str) -> LicenseRisk {
    let base = id.split(" WITH ").next().unwrap_or(id);
    let base = base.trim().trim_matches(|c: char| c == '(' || c == ')');
    risk_of_id(&normalize(base))
}

/// Ordering used to combine expression parts. `Unknown` ranks between the
/// copyleft families and proprietary so that `MIT OR Unknown` stays permissive
/// while `MIT AND Unknown` is not.
fn restrictiveness(risk: &LicenseRisk) -> u8 {
    match risk {
        LicenseRisk::Permissive => 0,
        LicenseRisk::WeakCopyleft => 1,
        LicenseRisk::StrongCopyleft => 2,
        LicenseRisk::Unknown => 3,
        LicenseRisk::Proprietary => 4,
    }
}
