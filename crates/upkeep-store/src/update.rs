use semver::Version;

use crate::error::StoreError;
use crate::lookup::{StoreMetadata, fetch_store_metadata};

/// A newer published version discovered on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUpdate {
    pub current_version: String,
    pub latest_version: String,
    pub store_url: String,
}

/// Check the store for a version newer than `current_version`.
///
/// Returns `Ok(None)` when the published version is not newer.
///
/// # Errors
/// Propagates any [`fetch_store_metadata`] error.
pub async fn check_for_store_update(
    client: &reqwest::Client,
    app_id: &str,
    current_version: &str,
) -> Result<Option<StoreUpdate>, StoreError> {
    let metadata = fetch_store_metadata(client, app_id).await?;
    Ok(store_update_from_metadata(metadata, current_version))
}

fn store_update_from_metadata(
    metadata: StoreMetadata,
    current_version: &str,
) -> Option<StoreUpdate> {
    let latest = metadata
        .version
        .strip_prefix('v')
        .unwrap_or(&metadata.version);
    let current = current_version.strip_prefix('v').unwrap_or(current_version);

    if is_newer_version(latest, current) {
        Some(StoreUpdate {
            current_version: current.to_string(),
            latest_version: latest.to_string(),
            store_url: metadata.store_url,
        })
    } else {
        None
    }
}

/// Lenient semver comparison; falls back to plain inequality when either
/// side does not normalize to a version.
#[must_use]
pub fn is_newer_version(latest: &str, current: &str) -> bool {
    match (parse_semver(latest), parse_semver(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => latest != current,
    }
}

fn parse_semver(version: &str) -> Option<Version> {
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    // Stores publish truncated versions like "2.4"; pad to X.Y.Z.
    let (core, suffix) = split_semver_core_and_suffix(version);
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().and_then(|part| part.parse::<u64>().ok());
    let patch = parts.next().and_then(|part| part.parse::<u64>().ok());

    if parts.next().is_some() {
        return None;
    }

    let normalized = match (minor, patch) {
        (None, None) => format!("{major}.0.0{suffix}"),
        (Some(minor), None) => format!("{major}.{minor}.0{suffix}"),
        (Some(minor), Some(patch)) => format!("{major}.{minor}.{patch}{suffix}"),
        (None, Some(_)) => return None,
    };

    Version::parse(&normalized).ok()
}

fn split_semver_core_and_suffix(version: &str) -> (&str, &str) {
    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    (&version[..suffix_idx], &version[suffix_idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(version: &str) -> StoreMetadata {
        StoreMetadata {
            version: version.to_string(),
            store_url: "https://apps.apple.com/app/id1".to_string(),
        }
    }

    #[test]
    fn test_version_comparison() {
        assert!(is_newer_version("1.0.1", "1.0.0"));
        assert!(is_newer_version("1.1.0", "1.0.0"));
        assert!(is_newer_version("2.0.0", "1.9.9"));
        assert!(is_newer_version("1.2", "1.1.9"));
        assert!(is_newer_version("1", "0.99.0"));
        assert!(is_newer_version("1.0.0", "1.0.0-beta.2"));
        assert!(!is_newer_version("1.0.0", "1.0.0"));
        assert!(!is_newer_version("1.2", "1.2.0"));
        assert!(!is_newer_version("1.0.0-beta.2", "1.0.0-beta.10"));
        assert!(!is_newer_version("1.0.0", "1.0.1"));
        assert!(!is_newer_version("0.9.0", "1.0.0"));
    }

    #[test]
    fn returns_update_when_the_listing_is_newer() {
        let update = store_update_from_metadata(listing("2.5.0"), "2.4.1")
            .expect("newer listing should produce an update");

        assert_eq!(update.current_version, "2.4.1");
        assert_eq!(update.latest_version, "2.5.0");
        assert_eq!(update.store_url, "https://apps.apple.com/app/id1");
    }

    #[test]
    fn returns_none_when_up_to_date() {
        assert!(store_update_from_metadata(listing("2.4.1"), "2.4.1").is_none());
        assert!(store_update_from_metadata(listing("2.4.0"), "2.4.1").is_none());
    }

    #[test]
    fn v_prefixes_are_stripped_on_both_sides() {
        let update = store_update_from_metadata(listing("v3.0.0"), "v2.9.9").unwrap();

        assert_eq!(update.latest_version, "3.0.0");
        assert_eq!(update.current_version, "2.9.9");
    }
}
