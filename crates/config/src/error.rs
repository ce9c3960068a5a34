use std::path::PathBuf;

use crate::SourceFormat;

/// Reasons a configuration is rejected.
///
/// Every variant aborts the build; a malformed configuration is never
/// partially honoured.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("missing required field `{field}`")]
    MissingRequiredField { field: &'static str },

    #[error("unknown key `{key}`{}", .section.map(|s| format!(" in `{s}`")).unwrap_or_default())]
    UnknownKey {
        key: String,
        /// Enclosing table, `None` for top-level keys.
        section: Option<&'static str>,
    },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to parse {format} config: {message}")]
    Parse {
        format: SourceFormat,
        message: String,
    },

    #[error("failed to read config `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no config file found in `{}` or its parents", .dir.display())]
    NotFound { dir: PathBuf },
}

impl Error {
    pub fn invalid(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// The configuration key the error is about, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredField { field } => Some(*field),
            Self::UnknownKey { key, .. } => Some(key.as_str()),
            Self::InvalidValue { field, .. } => Some(field.as_str()),
            Self::Parse { .. } | Self::Read { .. } | Self::NotFound { .. } => None,
        }
    }
}
