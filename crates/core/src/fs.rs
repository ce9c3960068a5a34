use relative_path::RelativePathBuf;

use docconf_config::SiteConfig;
use docconf_config::path::RelPath;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePath {
    pub abs_path: std::path::PathBuf,
    pub rel_path: RelativePathBuf,
}

impl SourcePath {
    pub fn from_root(root: &std::path::Path, path: &std::path::Path) -> Option<Self> {
        let abs_path = path.to_owned();
        let rel_path = path.strip_prefix(root).ok()?;
        let rel_path = RelativePathBuf::from_path(rel_path).ok()?;
        Some(Self { abs_path, rel_path })
    }
}

/// A configured directory that is not present on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingDir {
    pub field: &'static str,
    pub path: RelPath,
}

/// `templates_path` and `html_static_path` entries with no directory behind them.
pub fn missing_dirs(config: &SiteConfig) -> Vec<MissingDir> {
    let templates = config
        .templates_path()
        .iter()
        .map(|p| ("templates_path", p));
    let statics = config
        .static_path()
        .iter()
        .map(|p| ("html_static_path", p));
    templates
        .chain(statics)
        .filter(|(_, p)| !p.to_path(config.root()).is_dir())
        .map(|(field, path)| MissingDir {
            field,
            path: path.clone(),
        })
        .collect()
}
