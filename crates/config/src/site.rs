use std::fmt;
use std::path;

use crate::path::{Pattern, RelPath};
use crate::{Theme, ThemeOptions};

/// Configuration of one documentation site.
///
/// Built once per build invocation by the loader (see
/// [`SiteConfig::from_file`]) and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SiteConfig {
    #[serde(skip)]
    pub(crate) root: path::PathBuf,
    pub(crate) project: String,
    pub(crate) copyright: String,
    pub(crate) author: String,
    pub(crate) extensions: Vec<String>,
    pub(crate) templates_path: Vec<RelPath>,
    pub(crate) exclude_patterns: Vec<Pattern>,
    #[serde(rename = "html_theme")]
    pub(crate) theme_name: Theme,
    #[serde(rename = "html_theme_options")]
    pub(crate) theme_options: ThemeOptions,
    #[serde(rename = "html_static_path")]
    pub(crate) static_path: Vec<RelPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) default_role: Option<String>,
}

impl SiteConfig {
    pub(crate) fn new(project: String) -> Self {
        Self {
            root: path::PathBuf::from("."),
            project,
            copyright: Default::default(),
            author: Default::default(),
            extensions: Default::default(),
            templates_path: Default::default(),
            exclude_patterns: Default::default(),
            theme_name: Default::default(),
            theme_options: Default::default(),
            static_path: Default::default(),
            default_role: Default::default(),
        }
    }

    /// Directory the configuration was loaded from; relative paths resolve against it.
    pub fn root(&self) -> &path::Path {
        &self.root
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn copyright(&self) -> &str {
        &self.copyright
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Enabled extensions, in load order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Directories searched for template overrides.
    pub fn templates_path(&self) -> &[RelPath] {
        &self.templates_path
    }

    pub fn exclude_patterns(&self) -> &[Pattern] {
        &self.exclude_patterns
    }

    pub fn theme_name(&self) -> Theme {
        self.theme_name
    }

    pub fn theme_options(&self) -> &ThemeOptions {
        &self.theme_options
    }

    /// Directories copied verbatim into the output.
    pub fn static_path(&self) -> &[RelPath] {
        &self.static_path
    }

    /// Role applied to unadorned inline literals.
    pub fn default_role(&self) -> Option<&str> {
        self.default_role.as_deref()
    }
}

impl fmt::Display for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{converted}")
    }
}
