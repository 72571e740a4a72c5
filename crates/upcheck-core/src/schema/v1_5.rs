use serde_json::Value;

use super::fields::{
    self, DOWNLOAD_LINKS, INFO_PAGE_LINKS, PACKAGE_TYPE, RELEASE_DATE, RELEASE_DESCRIPTION,
    RELEASE_TYPE, TARGET_PLATFORMS, URL,
};
use super::legacy::{LegacyPackage, LegacyUpdateInfo};
use crate::error::{ErrorCollector, Parsed};
use crate::messages;
use crate::types::{PackageType, ReleaseType};

/// Members every 1.5 download link must carry, checked in this order.
const DOWNLOAD_LINK_MEMBERS: [&str; 4] = [URL, TARGET_PLATFORMS, PACKAGE_TYPE, RELEASE_TYPE];

pub fn parse(document: &Value) -> Parsed<LegacyUpdateInfo> {
    let mut errors = ErrorCollector::new();
    let mut info = LegacyUpdateInfo::default();

    if let Some(version) = fields::required_release_version(document, &mut errors) {
        info.release_version = version;
    }
    if let Some(date) = fields::required_text(document, RELEASE_DATE, &mut errors) {
        info.release_date = date;
    }
    if let Some(description) = fields::required_text(document, RELEASE_DESCRIPTION, &mut errors) {
        info.release_description = description;
    }

    info.info_links = fields::info_links(document, INFO_PAGE_LINKS, &mut errors);

    if let Some(entries) = fields::required_list(document, DOWNLOAD_LINKS, &mut errors) {
        info.available_packages = entries
            .iter()
            .filter_map(|entry| download_link(entry, &mut errors))
            .collect();
    }

    Parsed {
        value: info,
        errors,
    }
}

/// Only the first missing member of an entry is reported.
fn download_link(entry: &Value, errors: &mut ErrorCollector) -> Option<LegacyPackage> {
    if let Some(missing) = DOWNLOAD_LINK_MEMBERS
        .iter()
        .find(|member| entry.get(**member).is_none())
    {
        errors.push(messages::missing_entry(missing));
        return None;
    }

    let Some(release_type) = entry
        .get(RELEASE_TYPE)
        .and_then(Value::as_str)
        .and_then(ReleaseType::from_wire)
    else {
        errors.push(messages::invalid_value(RELEASE_TYPE));
        return None;
    };
    let Some(package_type) = entry
        .get(PACKAGE_TYPE)
        .and_then(Value::as_str)
        .and_then(PackageType::from_wire)
    else {
        errors.push(messages::invalid_value(PACKAGE_TYPE));
        return None;
    };
    let target_platforms = fields::platforms(&entry[TARGET_PLATFORMS], TARGET_PLATFORMS, errors)?;
    let url = fields::as_text(&entry[URL], URL, errors)?;

    Some(LegacyPackage {
        url,
        package_type,
        release_type,
        target_platforms,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::parse;
    use crate::types::{PackageType, ReleaseType, TargetPlatform};
    use crate::version::VersionInfo;

    fn document(download_links: Value) -> Value {
        json!({
            "SchemaVersion": "1.5",
            "ReleaseVersion": { "Major": 1, "Minor": 5, "Build": 120 },
            "ReleaseDate": "2020-02-14",
            "ReleaseDescription": "Radeon Memory Visualizer",
            "InfoPageLinks": [{ "URL": "https://gpuopen.com/rmv", "Description": "RMV" }],
            "DownloadLinks": download_links
        })
    }

    #[test]
    fn parses_packages_with_platform_lists() {
        let parsed = parse(&document(json!([
            {
                "URL": "https://example.com/rmv.zip",
                "TargetPlatforms": ["Windows"],
                "PackageType": "ZIP",
                "ReleaseType": "GA"
            },
            {
                "URL": "https://example.com/rmv.tgz",
                "TargetPlatforms": ["Ubuntu", "RHEL"],
                "PackageType": "TAR",
                "ReleaseType": "Beta"
            }
        ])));

        assert!(parsed.is_ok(), "unexpected errors: {}", parsed.errors);
        let info = parsed.value;
        assert_eq!(info.release_version, VersionInfo::new(1, 5, 0, 120));
        assert_eq!(info.available_packages.len(), 2);

        let linux = &info.available_packages[1];
        assert_eq!(linux.package_type, PackageType::Tar);
        assert_eq!(linux.release_type, ReleaseType::Beta);
        assert_eq!(
            linux.target_platforms,
            [TargetPlatform::Linux, TargetPlatform::Rhel]
        );
    }

    #[test]
    fn download_link_reports_first_missing_member_only() {
        let parsed = parse(&document(json!([
            { "PackageType": "ZIP" },
            { "URL": "u", "TargetPlatforms": ["Windows"] }
        ])));

        assert_eq!(
            parsed.errors.messages(),
            [
                "The version file is missing the URL entry.",
                "The version file is missing the PackageType entry.",
            ]
        );
        assert!(parsed.value.available_packages.is_empty());
    }

    #[test]
    fn release_type_is_validated_before_package_type() {
        let parsed = parse(&document(json!([{
            "URL": "u",
            "TargetPlatforms": ["Windows"],
            "PackageType": "DMG",
            "ReleaseType": "Nightly"
        }])));

        assert_eq!(
            parsed.errors.messages(),
            ["The version file contains an invalid ReleaseType value."]
        );
    }

    #[test]
    fn invalid_platform_fails_the_package() {
        let parsed = parse(&document(json!([{
            "URL": "u",
            "TargetPlatforms": ["Windows", "BeOS"],
            "PackageType": "MSI",
            "ReleaseType": "GA"
        }])));

        assert!(!parsed.is_ok());
        assert!(parsed.errors.contains("invalid TargetPlatforms value"));
        assert!(parsed.value.available_packages.is_empty());
    }

    #[test]
    fn missing_top_level_fields_are_all_reported() {
        let parsed = parse(&json!({ "SchemaVersion": "1.5", "ReleaseVersion": {} }));

        assert_eq!(
            parsed.errors.messages(),
            [
                "The version file contains an invalid ReleaseVersion number.",
                "The version file is missing the ReleaseDate entry.",
                "The version file is missing the ReleaseDescription entry.",
                "The version file is missing the InfoPageLinks entry.",
                "The version file is missing the DownloadLinks entry.",
            ]
        );
    }
}
