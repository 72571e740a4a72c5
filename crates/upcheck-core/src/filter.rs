use log::debug;

use crate::types::{TargetPlatform, UpdateInfo};

/// Keep only releases that target `platform`, preserving order.
///
/// An unknown platform disables filtering. Returns whether any releases
/// remain; an empty result is not an error.
pub fn filter_for_platform(info: &mut UpdateInfo, platform: TargetPlatform) -> bool {
    if platform == TargetPlatform::Unknown {
        debug!("Host platform unknown; keeping all {} release(s)", info.releases.len());
        return true;
    }

    let before = info.releases.len();
    info.releases.retain(|release| release.targets(platform));
    debug!(
        "Kept {} of {before} release(s) for {platform}",
        info.releases.len()
    );

    !info.releases.is_empty()
}

#[cfg(test)]
mod tests {
    use super::filter_for_platform;
    use crate::types::{ReleaseInfo, TargetPlatform, UpdateInfo};

    fn release(title: &str, platforms: &[TargetPlatform]) -> ReleaseInfo {
        ReleaseInfo {
            title: title.to_string(),
            target_platforms: platforms.to_vec(),
            ..ReleaseInfo::default()
        }
    }

    fn sample() -> UpdateInfo {
        UpdateInfo {
            is_update_available: false,
            releases: vec![
                release("win", &[TargetPlatform::Windows]),
                release("linux", &[TargetPlatform::Linux, TargetPlatform::Rhel]),
                release("all", &[TargetPlatform::Windows, TargetPlatform::Linux]),
            ],
        }
    }

    fn titles(info: &UpdateInfo) -> Vec<&str> {
        info.releases.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn keeps_matching_releases_in_order() {
        let mut info = sample();

        assert!(filter_for_platform(&mut info, TargetPlatform::Linux));
        assert_eq!(titles(&info), ["linux", "all"]);
    }

    #[test]
    fn unknown_platform_keeps_everything() {
        let mut info = sample();

        assert!(filter_for_platform(&mut info, TargetPlatform::Unknown));
        assert_eq!(info.releases.len(), 3);
    }

    #[test]
    fn no_match_leaves_empty_list() {
        let mut info = sample();

        assert!(!filter_for_platform(&mut info, TargetPlatform::Darwin));
        assert!(info.releases.is_empty());
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let mut once = sample();
        filter_for_platform(&mut once, TargetPlatform::Windows);
        let mut twice = once.clone();
        filter_for_platform(&mut twice, TargetPlatform::Windows);

        assert_eq!(once, twice);
    }
}
