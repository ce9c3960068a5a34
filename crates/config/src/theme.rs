use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HTML themes the generator ships or commonly installs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
#[non_exhaustive]
pub enum Theme {
    #[default]
    Alabaster,
    Classic,
    Sphinxdoc,
    Scrolls,
    Agogo,
    Traditional,
    Nature,
    Haiku,
    Pyramid,
    Bizstyle,
    Basic,
    SphinxRtdTheme,
    SphinxBookTheme,
    PydataSphinxTheme,
    Furo,
}

impl Theme {
    pub const ALL: &'static [Theme] = &[
        Theme::Alabaster,
        Theme::Classic,
        Theme::Sphinxdoc,
        Theme::Scrolls,
        Theme::Agogo,
        Theme::Traditional,
        Theme::Nature,
        Theme::Haiku,
        Theme::Pyramid,
        Theme::Bizstyle,
        Theme::Basic,
        Theme::SphinxRtdTheme,
        Theme::SphinxBookTheme,
        Theme::PydataSphinxTheme,
        Theme::Furo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Alabaster => "alabaster",
            Theme::Classic => "classic",
            Theme::Sphinxdoc => "sphinxdoc",
            Theme::Scrolls => "scrolls",
            Theme::Agogo => "agogo",
            Theme::Traditional => "traditional",
            Theme::Nature => "nature",
            Theme::Haiku => "haiku",
            Theme::Pyramid => "pyramid",
            Theme::Bizstyle => "bizstyle",
            Theme::Basic => "basic",
            Theme::SphinxRtdTheme => "sphinx_rtd_theme",
            Theme::SphinxBookTheme => "sphinx_book_theme",
            Theme::PydataSphinxTheme => "pydata_sphinx_theme",
            Theme::Furo => "furo",
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTheme(s.to_owned()))
    }
}

impl TryFrom<String> for Theme {
    type Error = UnknownTheme;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Theme {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(pub String);

/// Value type a theme option expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Bool,
}

/// Keys accepted in `html_theme_options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeOptionKey {
    /// Link target for the "view source" button.
    RepositoryUrl,
    /// Prefix of the documentation inside the repository, for edit links.
    PathToDocs,
    UseRepositoryButton,
    UseEditPageButton,
    UseFullscreenButton,
    /// Raw content appended to the navigation bar.
    ExtraNavbar,
    /// Placeholder of the search input.
    SearchBarText,
}

impl ThemeOptionKey {
    pub const ALL: &'static [ThemeOptionKey] = &[
        ThemeOptionKey::RepositoryUrl,
        ThemeOptionKey::PathToDocs,
        ThemeOptionKey::UseRepositoryButton,
        ThemeOptionKey::UseEditPageButton,
        ThemeOptionKey::UseFullscreenButton,
        ThemeOptionKey::ExtraNavbar,
        ThemeOptionKey::SearchBarText,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeOptionKey::RepositoryUrl => "repository_url",
            ThemeOptionKey::PathToDocs => "path_to_docs",
            ThemeOptionKey::UseRepositoryButton => "use_repository_button",
            ThemeOptionKey::UseEditPageButton => "use_edit_page_button",
            ThemeOptionKey::UseFullscreenButton => "use_fullscreen_button",
            ThemeOptionKey::ExtraNavbar => "extra_navbar",
            ThemeOptionKey::SearchBarText => "search_bar_text",
        }
    }

    pub fn kind(self) -> OptionKind {
        match self {
            ThemeOptionKey::UseRepositoryButton
            | ThemeOptionKey::UseEditPageButton
            | ThemeOptionKey::UseFullscreenButton => OptionKind::Bool,
            ThemeOptionKey::RepositoryUrl
            | ThemeOptionKey::PathToDocs
            | ThemeOptionKey::ExtraNavbar
            | ThemeOptionKey::SearchBarText => OptionKind::String,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ThemeOptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ThemeOptionValue {
    String(String),
    Bool(bool),
}

impl ThemeOptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ThemeOptionValue::String(s) => Some(s),
            ThemeOptionValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ThemeOptionValue::Bool(b) => Some(*b),
            ThemeOptionValue::String(_) => None,
        }
    }
}

/// `html_theme_options`, holding only the keys that were configured.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ThemeOptions(BTreeMap<ThemeOptionKey, ThemeOptionValue>);

impl ThemeOptions {
    pub(crate) fn insert(&mut self, key: ThemeOptionKey, value: ThemeOptionValue) {
        debug_assert!(match key.kind() {
            OptionKind::String => value.as_str().is_some(),
            OptionKind::Bool => value.as_bool().is_some(),
        });
        self.0.insert(key, value);
    }

    pub fn get(&self, key: ThemeOptionKey) -> Option<&ThemeOptionValue> {
        self.0.get(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.string(ThemeOptionKey::RepositoryUrl)
    }

    pub fn path_to_docs(&self) -> Option<&str> {
        self.string(ThemeOptionKey::PathToDocs)
    }

    pub fn use_repository_button(&self) -> Option<bool> {
        self.flag(ThemeOptionKey::UseRepositoryButton)
    }

    pub fn use_edit_page_button(&self) -> Option<bool> {
        self.flag(ThemeOptionKey::UseEditPageButton)
    }

    pub fn use_fullscreen_button(&self) -> Option<bool> {
        self.flag(ThemeOptionKey::UseFullscreenButton)
    }

    pub fn extra_navbar(&self) -> Option<&str> {
        self.string(ThemeOptionKey::ExtraNavbar)
    }

    pub fn search_bar_text(&self) -> Option<&str> {
        self.string(ThemeOptionKey::SearchBarText)
    }

    fn string(&self, key: ThemeOptionKey) -> Option<&str> {
        self.get(key).and_then(ThemeOptionValue::as_str)
    }

    fn flag(&self, key: ThemeOptionKey) -> Option<bool> {
        self.get(key).and_then(ThemeOptionValue::as_bool)
    }
}
