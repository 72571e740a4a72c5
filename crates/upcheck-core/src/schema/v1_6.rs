use log::debug;
use serde_json::Value;

use super::fields::{
    self, DOWNLOAD_LINKS, INFO_PAGE_LINKS, PACKAGE_NAME, PACKAGE_TYPE, RELEASE_DATE,
    RELEASE_PLATFORMS, RELEASE_TAGS, RELEASE_TITLE, RELEASE_TYPE, RELEASES, URL,
};
use crate::error::{ErrorCollector, Parsed};
use crate::messages;
use crate::types::{DownloadLink, PackageType, ReleaseInfo, ReleaseType, UpdateInfo};

/// Parse a schema 1.6 document straight into the canonical shape.
///
/// Every release is kept in the output, even ones with errors, so the caller
/// sees exactly what could be read.
pub fn parse(document: &Value) -> Parsed<UpdateInfo> {
    let mut errors = ErrorCollector::new();
    let mut info = UpdateInfo::default();

    if let Some(entries) = fields::required_list(document, RELEASES, &mut errors) {
        info.releases = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| release(index, entry, &mut errors))
            .collect();
    }

    Parsed {
        value: info,
        errors,
    }
}

fn release(index: usize, entry: &Value, errors: &mut ErrorCollector) -> ReleaseInfo {
    let failures_before = errors.len();
    let mut release = ReleaseInfo::default();

    if let Some(version) = fields::required_release_version(entry, errors) {
        release.version = version;
    }
    if let Some(date) = fields::required_text(entry, RELEASE_DATE, errors) {
        release.date = date;
    }
    if let Some(title) = fields::required_text(entry, RELEASE_TITLE, errors) {
        release.title = title;
    }
    if let Some(raw) = fields::required_text(entry, RELEASE_TYPE, errors) {
        match ReleaseType::from_wire(&raw) {
            Some(release_type) => release.release_type = release_type,
            None => errors.push(messages::invalid_value(RELEASE_TYPE)),
        }
    }
    if let Some(platforms) = fields::required(entry, RELEASE_PLATFORMS, errors)
        .and_then(|value| fields::platforms(value, RELEASE_PLATFORMS, errors))
    {
        release.target_platforms = platforms;
    }
    if let Some(tags) = fields::required(entry, RELEASE_TAGS, errors) {
        release.tags = tags_of(tags, errors);
    }
    release.info_links = fields::info_links(entry, INFO_PAGE_LINKS, errors);

    if errors.len() == failures_before {
        if let Some(links) = fields::required_list(entry, DOWNLOAD_LINKS, errors) {
            release.download_links = links
                .iter()
                .filter_map(|link| download_link(link, errors))
                .collect();
        }
    } else {
        debug!("Skipping DownloadLinks of release #{index}: earlier fields failed");
    }

    release
}

/// `ReleaseTags` may be empty, but must be a list of strings.
fn tags_of(value: &Value, errors: &mut ErrorCollector) -> Vec<String> {
    let tags = value
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|tag| tag.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
        });

    tags.unwrap_or_else(|| {
        errors.push(messages::invalid_value(RELEASE_TAGS));
        Vec::new()
    })
}

fn download_link(entry: &Value, errors: &mut ErrorCollector) -> Option<DownloadLink> {
    let Some(url) = entry.get(URL) else {
        errors.push(messages::missing_entry(URL));
        return None;
    };
    let Some(package_type) = entry.get(PACKAGE_TYPE) else {
        errors.push(messages::missing_entry(PACKAGE_TYPE));
        return None;
    };
    let Some(package_type) = package_type.as_str().and_then(PackageType::from_wire) else {
        errors.push(messages::invalid_value(PACKAGE_TYPE));
        return None;
    };
    let url = fields::as_text(url, URL, errors)?;
    let package_name = match entry.get(PACKAGE_NAME) {
        Some(name) => Some(fields::as_text(name, PACKAGE_NAME, errors)?),
        None => None,
    };

    Some(DownloadLink {
        url,
        package_type,
        package_name,
    })
}
