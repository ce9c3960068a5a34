use std::fmt;
use std::path;

use crate::Error;
use crate::Result;

/// Syntax of a configuration source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    #[default]
    Yaml,
    Toml,
}

impl SourceFormat {
    /// Pick the format from a file extension, falling back to YAML.
    pub fn from_path(path: &path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => SourceFormat::Toml,
            _ => SourceFormat::Yaml,
        }
    }

    pub(crate) fn parse(self, content: &str) -> Result<serde_yaml::Value> {
        if content.trim().is_empty() {
            return Ok(serde_yaml::Value::Null);
        }

        match self {
            SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| Error::Parse {
                format: self,
                message: e.to_string(),
            }),
            SourceFormat::Toml => toml::from_str(content).map_err(|e| Error::Parse {
                format: self,
                message: e.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Yaml => write!(f, "YAML"),
            SourceFormat::Toml => write!(f, "TOML"),
        }
    }
}
