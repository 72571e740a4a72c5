use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A four part `Major.Minor.Patch.Build` version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

/// Outcome of [`VersionInfo::compare`], read as "`self` is ... than `other`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Newer,
    Older,
    Equal,
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Self::Newer,
            Ordering::Less => Self::Older,
            Ordering::Equal => Self::Equal,
        }
    }
}

impl VersionInfo {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Comparison {
        self.cmp(other).into()
    }

    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.compare(other) == Comparison::Newer
    }

    /// Lenient parse used by schema 1.3 `VersionString` values.
    ///
    /// Accepts one to four leading numeric components; whatever is missing is
    /// zero. Parsing stops at the first character that breaks the
    /// `N.N.N.N` pattern, so `"2.1-beta"` reads as `2.1.0.0`.
    /// Returns `None` when not even the first component is numeric.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Option<Self> {
        let mut components = [0_u32; 4];
        let mut parsed = 0;

        for (slot, part) in components.iter_mut().zip(input.split('.')) {
            let end = part
                .find(|ch: char| !ch.is_ascii_digit())
                .unwrap_or(part.len());
            let digits = &part[..end];
            let Ok(value) = digits.parse::<u32>() else {
                break;
            };
            *slot = value;
            parsed += 1;
            if digits.len() != part.len() {
                break;
            }
        }

        if parsed == 0 {
            return None;
        }

        let [major, minor, patch, build] = components;
        Some(Self::new(major, minor, patch, build))
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then(self.build.cmp(&other.build))
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
    Build,
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::Build => write!(f, "build"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Expected Major.Minor.Patch.Build format, got: {input}")]
    InvalidFormat { input: String },
    #[error("Invalid {component} version: {value}")]
    InvalidComponent {
        component: VersionComponent,
        value: String,
    },
}

/// Strict `Major.Minor.Patch.Build` parse: exactly four numeric components.
impl FromStr for VersionInfo {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('.').collect();
        let &[major, minor, patch, build] = parts.as_slice() else {
            return Err(VersionParseError::InvalidFormat {
                input: s.to_string(),
            });
        };

        let component = |value: &str, component: VersionComponent| {
            value
                .parse::<u32>()
                .map_err(|_| VersionParseError::InvalidComponent {
                    component,
                    value: value.to_string(),
                })
        };

        Ok(Self::new(
            component(major, VersionComponent::Major)?,
            component(minor, VersionComponent::Minor)?,
            component(patch, VersionComponent::Patch)?,
            component(build, VersionComponent::Build)?,
        ))
    }
}
