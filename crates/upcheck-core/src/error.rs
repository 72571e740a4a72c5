use std::fmt;

use thiserror::Error;

use crate::messages;

/// Append-only list of validation messages gathered during one parse pass.
///
/// Parsers keep going after a bad field so that a single run reports every
/// problem in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCollector {
    messages: Vec<String>,
}

impl ErrorCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages recorded so far. Parsers snapshot this to tell
    /// whether a section added any failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|message| message.contains(needle))
    }
}

impl fmt::Display for ErrorCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join(" "))
    }
}

/// Output of a schema parser: whatever could be extracted plus every
/// validation failure met on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub errors: ErrorCollector,
}

impl<T> Parsed<T> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Map the extracted value, keeping the collected errors.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            errors: self.errors,
        }
    }

    /// Discard the partial value when any validation failed.
    ///
    /// # Errors
    /// Returns [`ManifestError::Invalid`] carrying every collected message.
    pub fn into_result(self) -> Result<T, ManifestError> {
        if self.errors.is_empty() {
            Ok(self.value)
        } else {
            Err(ManifestError::Invalid(self.errors))
        }
    }
}

/// Failure to turn manifest text into a canonical [`crate::UpdateInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("{prefix} {details}", prefix = messages::FAILED_TO_PARSE_VERSION_FILE)]
    FailedToParse { details: String },

    #[error("{}", messages::missing_entry(crate::schema::fields::SCHEMA_VERSION))]
    MissingSchemaVersion,

    #[error("{}", messages::unsupported_schema_version())]
    UnsupportedSchemaVersion { found: String },

    #[error("{0}")]
    Invalid(ErrorCollector),
}

impl ManifestError {
    pub fn failed_to_parse(details: impl fmt::Display) -> Self {
        Self::FailedToParse {
            details: details.to_string(),
        }
    }

    /// Every validation message carried by this error.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.messages().to_vec(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCollector, ManifestError, Parsed};

    #[test]
    fn collector_keeps_messages_in_order() {
        let mut errors = ErrorCollector::new();
        errors.push("first.");
        errors.push(String::from("second."));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.to_string(), "first. second.");
        assert!(errors.contains("second"));
        assert!(!errors.contains("third"));
    }

    #[test]
    fn parsed_keeps_partial_value_until_converted() {
        let mut errors = ErrorCollector::new();
        errors.push("The version file is missing the ReleaseDate entry.");
        let parsed = Parsed { value: 7, errors };

        assert!(!parsed.is_ok());
        assert_eq!(parsed.value, 7);
        assert!(matches!(
            parsed.into_result(),
            Err(ManifestError::Invalid(ref errors)) if errors.contains("ReleaseDate")
        ));
    }

    #[test]
    fn clean_parse_converts_to_value() {
        let parsed = Parsed {
            value: "ok",
            errors: ErrorCollector::new(),
        };
        assert_eq!(parsed.map(str::len).into_result(), Ok(2));
    }

    #[test]
    fn schema_errors_use_fixed_wording() {
        assert_eq!(
            ManifestError::MissingSchemaVersion.to_string(),
            "The version file is missing the SchemaVersion entry."
        );
        assert!(
            ManifestError::failed_to_parse("EOF while parsing an object")
                .to_string()
                .starts_with("Failed to parse version file. EOF")
        );
        assert!(
            ManifestError::UnsupportedSchemaVersion {
                found: "9.9".to_string()
            }
            .to_string()
            .contains("not supported")
        );
    }
}
