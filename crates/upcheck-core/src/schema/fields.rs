//! JSON key names and the lookup helpers every schema parser shares.
//!
//! Each helper records its own failure in the [`ErrorCollector`] and returns
//! `None`, so callers can keep walking the document.

use serde_json::Value;

use crate::error::ErrorCollector;
use crate::messages;
use crate::types::{InfoPageLink, TargetPlatform};
use crate::version::VersionInfo;

pub const SCHEMA_VERSION: &str = "SchemaVersion";

// 1.3
pub const VERSION_STRING: &str = "VersionString";
pub const DESCRIPTION: &str = "Description";
pub const INFO_PAGE_URL: &str = "InfoPageURL";
pub const DOWNLOAD_URL: &str = "DownloadURL";
pub const TARGET_INFO: &str = "TargetInfo";

// 1.5
pub const RELEASE_VERSION: &str = "ReleaseVersion";
pub const RELEASE_DATE: &str = "ReleaseDate";
pub const RELEASE_DESCRIPTION: &str = "ReleaseDescription";
pub const INFO_PAGE_LINKS: &str = "InfoPageLinks";
pub const DOWNLOAD_LINKS: &str = "DownloadLinks";
pub const TARGET_PLATFORMS: &str = "TargetPlatforms";
pub const PACKAGE_TYPE: &str = "PackageType";
pub const RELEASE_TYPE: &str = "ReleaseType";

// 1.6
pub const RELEASES: &str = "Releases";
pub const RELEASE_TITLE: &str = "ReleaseTitle";
pub const RELEASE_PLATFORMS: &str = "ReleasePlatforms";
pub const RELEASE_TAGS: &str = "ReleaseTags";
pub const PACKAGE_NAME: &str = "PackageName";

pub const URL: &str = "URL";

const VERSION_PARTS: [&str; 4] = ["Major", "Minor", "Patch", "Build"];

/// Look up a required member, reporting it as missing when absent.
pub(crate) fn required<'a>(
    object: &'a Value,
    field: &str,
    errors: &mut ErrorCollector,
) -> Option<&'a Value> {
    let value = object.get(field);
    if value.is_none() {
        errors.push(messages::missing_entry(field));
    }
    value
}

/// A string value; anything else is reported as an invalid `field` value.
pub(crate) fn as_text(value: &Value, field: &str, errors: &mut ErrorCollector) -> Option<String> {
    if let Some(text) = value.as_str() {
        Some(text.to_owned())
    } else {
        errors.push(messages::invalid_value(field));
        None
    }
}

pub(crate) fn required_text(
    object: &Value,
    field: &str,
    errors: &mut ErrorCollector,
) -> Option<String> {
    required(object, field, errors).and_then(|value| as_text(value, field, errors))
}

/// A list that must hold at least one element.
pub(crate) fn non_empty_list<'a>(
    value: &'a Value,
    field: &str,
    errors: &mut ErrorCollector,
) -> Option<&'a [Value]> {
    let Some(items) = value.as_array() else {
        errors.push(messages::invalid_value(field));
        return None;
    };
    if items.is_empty() {
        errors.push(messages::empty_list(field));
        return None;
    }
    Some(items)
}

pub(crate) fn required_list<'a>(
    object: &'a Value,
    field: &str,
    errors: &mut ErrorCollector,
) -> Option<&'a [Value]> {
    required(object, field, errors).and_then(|value| non_empty_list(value, field, errors))
}

/// Parse a list of `{URL, Description}` objects stored under `field`.
///
/// Entries missing either member are reported as incomplete and skipped;
/// the rest are kept.
pub(crate) fn info_links(
    object: &Value,
    field: &str,
    errors: &mut ErrorCollector,
) -> Vec<InfoPageLink> {
    let Some(entries) = required_list(object, field, errors) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let url = entry.get(URL).and_then(Value::as_str);
            let description = entry.get(DESCRIPTION).and_then(Value::as_str);
            match (url, description) {
                (Some(url), Some(description)) => Some(InfoPageLink {
                    url: url.to_owned(),
                    page_description: description.to_owned(),
                }),
                _ => {
                    errors.push(messages::incomplete_entry(field));
                    None
                }
            }
        })
        .collect()
}

/// Decode a `ReleaseVersion` object.
///
/// Every component is optional and defaults to zero, but at least one must be
/// present. Components that are not unsigned 32-bit integers invalidate the
/// whole version.
pub(crate) fn release_version(value: &Value, errors: &mut ErrorCollector) -> Option<VersionInfo> {
    let mut components = [0_u32; 4];
    let mut present = false;

    for (slot, name) in components.iter_mut().zip(VERSION_PARTS) {
        let Some(raw) = value.get(name) else {
            continue;
        };
        present = true;
        match raw.as_u64().and_then(|number| u32::try_from(number).ok()) {
            Some(number) => *slot = number,
            None => {
                errors.push(messages::INVALID_RELEASE_VERSION);
                return None;
            }
        }
    }

    if !present {
        errors.push(messages::INVALID_RELEASE_VERSION);
        return None;
    }

    let [major, minor, patch, build] = components;
    Some(VersionInfo::new(major, minor, patch, build))
}

pub(crate) fn required_release_version(
    object: &Value,
    errors: &mut ErrorCollector,
) -> Option<VersionInfo> {
    required(object, RELEASE_VERSION, errors).and_then(|value| release_version(value, errors))
}

/// Decode a non-empty list of platform names stored under `field`.
///
/// Stops at the first unrecognized name and fails the whole list.
pub(crate) fn platforms(
    value: &Value,
    field: &str,
    errors: &mut ErrorCollector,
) -> Option<Vec<TargetPlatform>> {
    let entries = non_empty_list(value, field, errors)?;
    let mut platforms = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(platform) = entry.as_str().and_then(TargetPlatform::from_wire) else {
            errors.push(messages::invalid_value(field));
            return None;
        };
        platforms.push(platform);
    }

    Some(platforms)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{info_links, platforms, release_version, required_list, required_text};
    use crate::error::ErrorCollector;
    use crate::types::TargetPlatform;
    use crate::version::VersionInfo;

    #[test]
    fn required_text_reports_missing_and_mistyped_values() {
        let doc = json!({ "ReleaseDate": "2024-01-01", "ReleaseTitle": 7 });
        let mut errors = ErrorCollector::new();

        assert_eq!(
            required_text(&doc, "ReleaseDate", &mut errors).as_deref(),
            Some("2024-01-01")
        );
        assert!(required_text(&doc, "ReleaseTitle", &mut errors).is_none());
        assert!(required_text(&doc, "Description", &mut errors).is_none());

        assert_eq!(
            errors.messages(),
            [
                "The version file contains an invalid ReleaseTitle value.",
                "The version file is missing the Description entry.",
            ]
        );
    }

    #[test]
    fn required_list_rejects_empty_lists() {
        let doc = json!({ "Releases": [] });
        let mut errors = ErrorCollector::new();

        assert!(required_list(&doc, "Releases", &mut errors).is_none());
        assert!(errors.contains("empty Releases list"));
    }

    #[test]
    fn info_links_keep_complete_entries() {
        let doc = json!({
            "InfoPageLinks": [
                { "URL": "https://gpuopen.com", "Description": "Home" },
                { "URL": "https://example.com" }
            ]
        });
        let mut errors = ErrorCollector::new();

        let links = info_links(&doc, "InfoPageLinks", &mut errors);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].page_description, "Home");
        assert_eq!(
            errors.messages(),
            ["The version file contains an incomplete InfoPageLinks entry."]
        );
    }

    #[test]
    fn release_version_defaults_absent_components() {
        let mut errors = ErrorCollector::new();

        assert_eq!(
            release_version(&json!({ "Major": 2, "Build": 9 }), &mut errors),
            Some(VersionInfo::new(2, 0, 0, 9))
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn release_version_needs_one_numeric_component() {
        let mut errors = ErrorCollector::new();

        assert!(release_version(&json!({}), &mut errors).is_none());
        assert!(release_version(&json!({ "Major": -1 }), &mut errors).is_none());
        assert!(release_version(&json!({ "Minor": "3" }), &mut errors).is_none());
        assert_eq!(errors.len(), 3);
        assert!(errors.contains("invalid ReleaseVersion number"));
    }

    #[test]
    fn platforms_stop_at_first_unknown_name() {
        let mut errors = ErrorCollector::new();

        assert_eq!(
            platforms(&json!(["Windows", "Ubuntu"]), "ReleasePlatforms", &mut errors),
            Some(vec![TargetPlatform::Windows, TargetPlatform::Linux])
        );
        assert!(
            platforms(
                &json!(["Windows", "Haiku", "Plan9"]),
                "ReleasePlatforms",
                &mut errors
            )
            .is_none()
        );
        assert!(platforms(&json!([]), "TargetPlatforms", &mut errors).is_none());

        assert_eq!(
            errors.messages(),
            [
                "The version file contains an invalid ReleasePlatforms value.",
                "The version file contains an empty TargetPlatforms list.",
            ]
        );
    }
}
