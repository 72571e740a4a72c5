//! User-facing message texts.
//!
//! Callers and tests match on these as substrings, so the wording is part of
//! the public contract even though the concatenation order is not.

use crate::schema::CURRENT_SCHEMA_VERSION;

pub const FAILED_TO_PARSE_VERSION_FILE: &str = "Failed to parse version file.";
pub const UNSUPPORTED_SCHEMA_VERSION: &str = "The schema version of the version file is not supported; latest supported version is";
pub const URL_MUST_POINT_TO_A_JSON_FILE: &str = "URL must point to a JSON file.";
pub const UNKNOWN_ERROR_OCCURRED: &str = "An unknown error occurred:";

pub const FAILED_TO_LAUNCH_DOWNLOADER: &str =
    "Failed to launch the Radeon Tools Download Assistant (rtda).";
pub const FAILED_TO_LOAD_LATEST_RELEASE: &str = "Failed to load latest release information.";
pub const FAILED_TO_DOWNLOAD_VERSION_FILE: &str = "Failed to download version file.";
pub const FAILED_TO_LOAD_VERSION_FILE: &str = "Failed to load version file.";
pub const DOWNLOADED_AN_EMPTY_VERSION_FILE: &str = "Downloaded an empty version file.";

pub const MISSING_ASSETS: &str = "The latest releases JSON is missing the assets element.";
pub const ASSET_NOT_FOUND: &str = "The required asset was not found in the assets list.";
pub const ASSET_DOWNLOAD_URL_NOT_FOUND: &str =
    "The download url was not found for the required asset.";

pub const INVALID_RELEASE_VERSION: &str =
    "The version file contains an invalid ReleaseVersion number.";

#[must_use]
pub fn unsupported_schema_version() -> String {
    format!("{UNSUPPORTED_SCHEMA_VERSION} {CURRENT_SCHEMA_VERSION}.")
}

#[must_use]
pub fn missing_entry(field: &str) -> String {
    format!("The version file is missing the {field} entry.")
}

#[must_use]
pub fn empty_list(field: &str) -> String {
    format!("The version file contains an empty {field} list.")
}

#[must_use]
pub fn incomplete_entry(field: &str) -> String {
    format!("The version file contains an incomplete {field} entry.")
}

#[must_use]
pub fn invalid_value(field: &str) -> String {
    format!("The version file contains an invalid {field} value.")
}
