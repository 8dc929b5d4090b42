use std::cmp::Ordering;

/// Compares two Debian version strings (epoch, upstream, revision).
pub fn cmp(old: &str, new: &str) -> Ordering {
    deb_version::compare_versions(old, new)
}

/// Sorts versions into Debian order, oldest first.
pub fn sort(versions: &mut [String]) {
    versions.sort_by(|a, b| cmp(a, b));
}

pub fn latest(versions: &[String]) -> Option<&String> {
    versions.iter().max_by(|a, b| cmp(a, b))
}

/// Resolves a requested version against the known ones. `None` and the
/// literal `"latest"` both resolve to the highest version.
pub fn resolve<'a>(versions: &'a [String], requested: Option<&str>) -> Option<&'a String> {
    match requested {
        None | Some("latest") => latest(versions),
        Some(requested) => versions.iter().find(|v| v.as_str() == requested),
    }
}
