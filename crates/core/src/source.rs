use docconf_config::SiteConfig;
use docconf_config::path::Pattern;

use crate::Error;
use crate::Result;
use crate::SourcePath;

/// The files a site build reads: everything under the config root that no
/// exclude pattern rules out.
#[derive(Debug, Clone)]
pub struct Source {
    root: std::path::PathBuf,
    exclude: ignore::gitignore::Gitignore,
}

impl Source {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(config.root(), config.exclude_patterns())
    }

    pub fn new<'p>(
        root: &std::path::Path,
        patterns: impl IntoIterator<Item = &'p Pattern>,
    ) -> Result<Self> {
        let mut exclude = ignore::gitignore::GitignoreBuilder::new(root);
        for pattern in patterns.into_iter() {
            exclude
                .add_line(None, pattern.as_gitignore_line())
                .map_err(|e| Error::invalid("exclude_patterns", e))?;
        }
        let exclude = exclude
            .build()
            .map_err(|e| Error::invalid("exclude_patterns", e))?;

        let source = Self {
            root: root.to_owned(),
            exclude,
        };
        Ok(source)
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn includes_file(&self, file: &std::path::Path) -> bool {
        let is_dir = false;
        self.includes_path(file, is_dir)
    }

    pub fn includes_dir(&self, dir: &std::path::Path) -> bool {
        let is_dir = true;
        self.includes_path(dir, is_dir)
    }

    /// Included files, sorted by name within each directory.
    pub fn iter(&self) -> impl Iterator<Item = SourcePath> + '_ {
        walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| self.includes_entry(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(move |e| SourcePath::from_root(&self.root, e.path()))
    }

    fn includes_path(&self, path: &std::path::Path, is_dir: bool) -> bool {
        let Some(rel) = self.strip_root(path) else {
            return self.includes_path_leaf(path, is_dir);
        };
        if rel.as_os_str().is_empty() {
            return true;
        }

        let excluded_ancestor = rel
            .ancestors()
            .skip(1)
            .filter(|a| !a.as_os_str().is_empty())
            .any(|a| !self.includes_path_leaf(&self.root.join(a), true));
        if excluded_ancestor {
            return false;
        }

        self.includes_path_leaf(&self.root.join(rel), is_dir)
    }

    /// `path` relative to the root; bare relative paths count as under a `.` root.
    fn strip_root<'p>(&self, path: &'p std::path::Path) -> Option<&'p std::path::Path> {
        if let Ok(rel) = path.strip_prefix(&self.root) {
            return Some(rel);
        }
        let root_is_cwd = self
            .root
            .components()
            .all(|c| c == std::path::Component::CurDir);
        if root_is_cwd && path.is_relative() {
            return Some(path.strip_prefix(".").unwrap_or(path));
        }
        None
    }

    fn includes_path_leaf(&self, path: &std::path::Path, is_dir: bool) -> bool {
        match self.exclude.matched(path, is_dir) {
            ignore::Match::None => true,
            ignore::Match::Ignore(glob) => {
                log::trace!("{:?}: excluded by {:?}", path, glob.original());
                false
            }
            ignore::Match::Whitelist(glob) => {
                log::trace!("{:?}: kept by {:?}", path, glob.original());
                true
            }
        }
    }

    fn includes_entry(&self, entry: &walkdir::DirEntry) -> bool {
        // Parents were already checked while walking down to this entry.
        let is_dir = entry.file_type().is_dir();
        self.includes_path_leaf(entry.path(), is_dir)
    }
}
