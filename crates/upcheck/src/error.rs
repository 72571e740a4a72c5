use upcheck_core::FetchError;

use crate::controller::ControllerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
    Controller(ControllerError),
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Io { kind, message } => write!(f, "{kind}: {message}"),
            Self::Controller(error) => write!(f, "{error}"),
        }
    }
}

impl From<std::io::Error> for AppErrorDetail {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<ControllerError> for AppErrorDetail {
    fn from(value: ControllerError) -> Self {
        Self::Controller(value)
    }
}

impl From<FetchError> for AppErrorDetail {
    fn from(value: FetchError) -> Self {
        Self::Message(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    MissingManifestLocation,
    InvalidCurrentVersion {
        input: String,
    },
    FetcherUnavailable {
        method: &'static str,
        details: AppErrorDetail,
    },
    OperationFailed {
        operation: &'static str,
        details: AppErrorDetail,
    },
    OperationCancelled {
        operation: &'static str,
    },
    SettingsSaveFailed {
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn invalid_current_version(input: impl Into<String>) -> Self {
        Self::InvalidCurrentVersion {
            input: input.into(),
        }
    }

    pub fn fetcher_unavailable(method: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::FetcherUnavailable {
            method,
            details: details.into(),
        }
    }

    pub fn operation_failed(operation: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::OperationFailed {
            operation,
            details: details.into(),
        }
    }

    pub fn operation_cancelled(operation: &'static str) -> Self {
        Self::OperationCancelled { operation }
    }

    pub fn settings_save_failed(details: impl Into<AppErrorDetail>) -> Self {
        Self::SettingsSaveFailed {
            details: details.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingManifestLocation => write!(
                f,
                "No manifest location configured; pass --location or set manifest_location"
            ),
            Self::InvalidCurrentVersion { input } => {
                write!(f, "Invalid current version '{input}'")
            }
            Self::FetcherUnavailable { method, details } => {
                write!(f, "Cannot use the {method} fetcher: {details}")
            }
            Self::OperationFailed { operation, details } => {
                write!(f, "{operation} failed: {details}")
            }
            Self::OperationCancelled { operation } => write!(f, "{operation} cancelled"),
            Self::SettingsSaveFailed { details } => {
                write!(f, "Failed to save settings: {details}")
            }
        }
    }
}

impl std::error::Error for AppError {}
