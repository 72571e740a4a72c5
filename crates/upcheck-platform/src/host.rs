use std::fmt;

/// Operating system family the binary was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPlatform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl HostPlatform {
    /// The platform of the running build target.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Other => "Other",
        }
    }

    /// File name of the external downloader helper on this platform.
    #[must_use]
    pub fn downloader_file_name(self) -> &'static str {
        match self {
            Self::Windows => "rtda.exe",
            Self::Linux | Self::MacOs | Self::Other => "rtda",
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::HostPlatform;

    #[test]
    fn current_matches_build_target() {
        let current = HostPlatform::current();

        #[cfg(target_os = "windows")]
        assert_eq!(current, HostPlatform::Windows);
        #[cfg(target_os = "linux")]
        assert_eq!(current, HostPlatform::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(current, HostPlatform::MacOs);
        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        assert_eq!(current, HostPlatform::Other);
    }

    #[test]
    fn downloader_name_has_exe_suffix_only_on_windows() {
        assert_eq!(HostPlatform::Windows.downloader_file_name(), "rtda.exe");
        assert_eq!(HostPlatform::Linux.downloader_file_name(), "rtda");
        assert_eq!(HostPlatform::MacOs.downloader_file_name(), "rtda");
    }

    #[test]
    fn display_uses_human_readable_names() {
        assert_eq!(HostPlatform::MacOs.to_string(), "macOS");
        assert_eq!(HostPlatform::Linux.to_string(), "Linux");
    }
}
