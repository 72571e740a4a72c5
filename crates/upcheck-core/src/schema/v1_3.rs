use serde_json::Value;

use super::fields::{
    self, DESCRIPTION, DOWNLOAD_URL, INFO_PAGE_URL, RELEASE_DATE, TARGET_INFO, URL, VERSION_STRING,
};
use super::legacy::{LegacyPackage, LegacyUpdateInfo};
use crate::error::{ErrorCollector, Parsed};
use crate::messages;
use crate::types::{PackageType, ReleaseType, TargetPlatform};
use crate::version::VersionInfo;

/// `TargetInfo` tokens fold platform and package format into one string.
const TARGET_INFO_TOKENS: [(&str, TargetPlatform, PackageType); 5] = [
    ("Windows_ZIP", TargetPlatform::Windows, PackageType::Zip),
    ("Windows_MSI", TargetPlatform::Windows, PackageType::Msi),
    ("Linux_TAR", TargetPlatform::Linux, PackageType::Tar),
    ("Linux_RPM", TargetPlatform::Linux, PackageType::Rpm),
    ("Linux_Debian", TargetPlatform::Linux, PackageType::Debian),
];

fn target_info(token: &str) -> Option<(TargetPlatform, PackageType)> {
    TARGET_INFO_TOKENS
        .iter()
        .find(|(name, _, _)| *name == token)
        .map(|&(_, platform, package_type)| (platform, package_type))
}

/// Parse a schema 1.3 document.
///
/// 1.3 has no release types, so every package is treated as a GA release.
pub fn parse(document: &Value) -> Parsed<LegacyUpdateInfo> {
    let mut errors = ErrorCollector::new();
    let mut info = LegacyUpdateInfo::default();

    if let Some(raw) = fields::required_text(document, VERSION_STRING, &mut errors) {
        match VersionInfo::parse_lenient(&raw) {
            Some(version) => info.release_version = version,
            None => errors.push(messages::INVALID_RELEASE_VERSION),
        }
    }
    if let Some(date) = fields::required_text(document, RELEASE_DATE, &mut errors) {
        info.release_date = date;
    }
    if let Some(description) = fields::required_text(document, DESCRIPTION, &mut errors) {
        info.release_description = description;
    }

    info.info_links = fields::info_links(document, INFO_PAGE_URL, &mut errors);

    if let Some(entries) = fields::required_list(document, DOWNLOAD_URL, &mut errors) {
        info.available_packages = entries
            .iter()
            .filter_map(|entry| download_url(entry, &mut errors))
            .collect();
    }

    Parsed {
        value: info,
        errors,
    }
}

fn download_url(entry: &Value, errors: &mut ErrorCollector) -> Option<LegacyPackage> {
    let url = entry.get(URL).and_then(Value::as_str);
    let token = entry.get(TARGET_INFO).and_then(Value::as_str);
    let (Some(url), Some(token)) = (url, token) else {
        errors.push(messages::incomplete_entry(DOWNLOAD_URL));
        return None;
    };

    let Some((platform, package_type)) = target_info(token) else {
        errors.push(messages::invalid_value(TARGET_INFO));
        return None;
    };

    Some(LegacyPackage {
        url: url.to_owned(),
        package_type,
        release_type: ReleaseType::GeneralAvailability,
        target_platforms: vec![platform],
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse;
    use crate::types::{PackageType, ReleaseType, TargetPlatform};
    use crate::version::VersionInfo;

    #[test]
    fn parses_complete_document() {
        let doc = json!({
            "SchemaVersion": "1.3",
            "VersionString": "1.2.3.4",
            "ReleaseDate": "2019-03-01",
            "Description": "Radeon Compute Profiler",
            "InfoPageURL": [{ "URL": "https://gpuopen.com/rcp", "Description": "Product page" }],
            "DownloadURL": [
                { "URL": "https://example.com/rcp.zip", "TargetInfo": "Windows_ZIP" },
                { "URL": "https://example.com/rcp.deb", "TargetInfo": "Linux_Debian" }
            ]
        });

        let parsed = parse(&doc);

        assert!(parsed.is_ok(), "unexpected errors: {}", parsed.errors);
        let info = parsed.value;
        assert_eq!(info.release_version, VersionInfo::new(1, 2, 3, 4));
        assert_eq!(info.release_description, "Radeon Compute Profiler");
        assert_eq!(info.info_links[0].url, "https://gpuopen.com/rcp");
        assert_eq!(info.available_packages.len(), 2);
        assert_eq!(info.available_packages[1].package_type, PackageType::Debian);
        assert_eq!(
            info.available_packages[1].target_platforms,
            [TargetPlatform::Linux]
        );
        assert!(
            info.available_packages
                .iter()
                .all(|package| package.release_type == ReleaseType::GeneralAvailability)
        );
    }

    #[test]
    fn short_version_strings_are_padded() {
        let doc = json!({
            "VersionString": "3.1",
            "ReleaseDate": "d",
            "Description": "x",
            "InfoPageURL": [{ "URL": "u", "Description": "d" }],
            "DownloadURL": [{ "URL": "u", "TargetInfo": "Linux_TAR" }]
        });

        let parsed = parse(&doc);

        assert!(parsed.is_ok());
        assert_eq!(parsed.value.release_version, VersionInfo::new(3, 1, 0, 0));
    }

    #[test]
    fn reports_every_problem_and_keeps_good_fields() {
        let doc = json!({
            "VersionString": "",
            "Description": "still parsed",
            "InfoPageURL": [],
            "DownloadURL": [
                { "URL": "https://example.com/a.zip", "TargetInfo": "Amiga_ADF" },
                { "TargetInfo": "Windows_MSI" },
                { "URL": "https://example.com/b.msi", "TargetInfo": "Windows_MSI" }
            ]
        });

        let parsed = parse(&doc);

        assert!(!parsed.is_ok());
        assert_eq!(
            parsed.errors.messages(),
            [
                "The version file contains an invalid ReleaseVersion number.",
                "The version file is missing the ReleaseDate entry.",
                "The version file contains an empty InfoPageURL list.",
                "The version file contains an invalid TargetInfo value.",
                "The version file contains an incomplete DownloadURL entry.",
            ]
        );
        assert_eq!(parsed.value.release_description, "still parsed");
        assert_eq!(parsed.value.available_packages.len(), 1);
    }
}
