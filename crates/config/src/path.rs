//! Relative paths and exclude patterns, checked at load time.

use std::fmt;

use relative_path::{Component, RelativePath, RelativePathBuf};

static DRIVE_PREFIX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"^[A-Za-z]:").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("`{0}` is absolute, expected a path relative to the project root")]
    Absolute(String),
    #[error("`{0}` contains a NUL byte")]
    Nul(String),
    #[error("`{0}` escapes the project root")]
    EscapesRoot(String),
    #[error("`{0}` matches the project root itself")]
    MatchesRoot(String),
    #[error("`{pattern}` is not a valid glob: {reason}")]
    Glob { pattern: String, reason: String },
}

/// A path relative to the project root.
///
/// The original spelling is kept so the loaded record round-trips.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct RelPath(RelativePathBuf);

impl RelPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        check_lexical(raw)?;
        Ok(Self(RelativePathBuf::from(raw)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Resolve against the directory the configuration was loaded from.
    pub fn to_path(&self, root: &std::path::Path) -> std::path::PathBuf {
        self.0.to_path(root)
    }
}

impl TryFrom<String> for RelPath {
    type Error = PathError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl serde::Serialize for RelPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Debug for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A glob anchored at the project root.
///
/// `_build` excludes the top-level `_build` only, `**/.ipynb_checkpoints`
/// matches at any depth.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Pattern {
    raw: String,
    line: String,
}

impl Pattern {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        check_lexical(raw)?;
        let line = anchored(raw)?;
        let mut builder = ignore::gitignore::GitignoreBuilder::new("");
        builder.add_line(None, &line).map_err(|e| PathError::Glob {
            pattern: raw.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: raw.to_owned(),
            line,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The pattern in gitignore syntax, rooted at the project root.
    pub fn as_gitignore_line(&self) -> &str {
        &self.line
    }
}

impl TryFrom<String> for Pattern {
    type Error = PathError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl serde::Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `./venv/` becomes `/venv/`, `g/.` becomes `/g`.
fn anchored(raw: &str) -> Result<String, PathError> {
    let normalized = RelativePath::new(raw).normalize();
    if normalized.as_str().is_empty() {
        return Err(PathError::MatchesRoot(raw.to_owned()));
    }
    let dir_only = if raw.ends_with('/') { "/" } else { "" };
    Ok(format!("/{normalized}{dir_only}"))
}

fn check_lexical(raw: &str) -> Result<(), PathError> {
    if raw.trim().is_empty() {
        return Err(PathError::Empty);
    }
    if raw.contains('\0') {
        return Err(PathError::Nul(raw.to_owned()));
    }
    if raw.starts_with('/') || raw.starts_with('\\') || DRIVE_PREFIX.is_match(raw) {
        return Err(PathError::Absolute(raw.to_owned()));
    }

    // Walk the components instead of normalizing so `a/../..` is caught too.
    let mut depth = 0usize;
    for component in RelativePath::new(raw).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| PathError::EscapesRoot(raw.to_owned()))?;
            }
            Component::Normal(_) => depth += 1,
        }
    }

    Ok(())
}
