use std::path;

use serde_yaml::{Mapping, Value};

use crate::path::{Pattern, RelPath};
use crate::{
    Error, OptionKind, Result, SiteConfig, SourceFormat, Theme, ThemeOptionKey, ThemeOptionValue,
    ThemeOptions,
};

/// File names looked up by [`SiteConfig::from_cwd`], in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["_docconf.yml", "_docconf.yaml", "_docconf.toml"];

const PROJECT: &str = "project";
const COPYRIGHT: &str = "copyright";
const AUTHOR: &str = "author";
const EXTENSIONS: &str = "extensions";
const TEMPLATES_PATH: &str = "templates_path";
const EXCLUDE_PATTERNS: &str = "exclude_patterns";
const HTML_THEME: &str = "html_theme";
const HTML_THEME_OPTIONS: &str = "html_theme_options";
const HTML_STATIC_PATH: &str = "html_static_path";
const DEFAULT_ROLE: &str = "default_role";

const KNOWN_KEYS: &[&str] = &[
    PROJECT,
    COPYRIGHT,
    AUTHOR,
    EXTENSIONS,
    TEMPLATES_PATH,
    EXCLUDE_PATTERNS,
    HTML_THEME,
    HTML_THEME_OPTIONS,
    HTML_STATIC_PATH,
    DEFAULT_ROLE,
];

static EXTENSION_NAME: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

static ROLE_NAME: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z][A-Za-z0-9_+.-]*(:[A-Za-z][A-Za-z0-9_+.-]*)?$").unwrap()
});

impl SiteConfig {
    /// Validate configuration text.
    ///
    /// Checks run in a fixed order: syntax, required fields, unknown
    /// top-level keys, then each field in declaration order.
    pub fn parse(content: &str, format: SourceFormat) -> Result<SiteConfig> {
        let value = format.parse(content)?;
        from_value(value)
    }

    pub fn from_file<P: Into<path::PathBuf>>(path: P) -> Result<SiteConfig> {
        Self::from_file_internal(path.into())
    }

    fn from_file_internal(path: path::PathBuf) -> Result<SiteConfig> {
        let content = std::fs::read_to_string(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;

        let mut config = Self::parse(&content, SourceFormat::from_path(&path))?;

        let mut root = path;
        root.pop(); // Remove filename
        if root == path::Path::new("") {
            root = path::Path::new(".").to_owned();
        }
        config.root = root;

        Ok(config)
    }

    /// Load the nearest config file in `cwd` or its ancestors.
    pub fn from_cwd<P: Into<path::PathBuf>>(cwd: P) -> Result<SiteConfig> {
        Self::from_cwd_internal(cwd.into())
    }

    fn from_cwd_internal(cwd: path::PathBuf) -> Result<SiteConfig> {
        let file_path = find_project_file(&cwd, CONFIG_FILE_NAMES)
            .ok_or_else(|| Error::NotFound { dir: cwd.clone() })?;
        log::debug!("Using config file `{}`", file_path.display());
        Self::from_file(file_path)
    }
}

fn from_value(value: Value) -> Result<SiteConfig> {
    let table = into_table(value)?;

    let project = lookup(&table, PROJECT).ok_or(Error::MissingRequiredField { field: PROJECT })?;

    if let Some(key) = table
        .keys()
        .find(|k| !k.as_str().is_some_and(|k| KNOWN_KEYS.contains(&k)))
    {
        return Err(Error::UnknownKey {
            key: render_key(key),
            section: None,
        });
    }

    let project = string(PROJECT, project)?;
    if project.trim().is_empty() {
        return Err(Error::invalid(PROJECT, "must not be empty"));
    }
    let mut config = SiteConfig::new(project);

    if let Some(value) = lookup(&table, COPYRIGHT) {
        config.copyright = string(COPYRIGHT, value)?;
    }
    if let Some(value) = lookup(&table, AUTHOR) {
        config.author = string(AUTHOR, value)?;
    }
    if let Some(value) = lookup(&table, EXTENSIONS) {
        config.extensions = list(EXTENSIONS, value, extension)?;
    }
    if let Some(value) = lookup(&table, TEMPLATES_PATH) {
        config.templates_path = set(TEMPLATES_PATH, value, typed::<RelPath>)?;
    }
    if let Some(value) = lookup(&table, EXCLUDE_PATTERNS) {
        config.exclude_patterns = set(EXCLUDE_PATTERNS, value, typed::<Pattern>)?;
    }
    if let Some(value) = lookup(&table, HTML_THEME) {
        config.theme_name = typed::<Theme>(HTML_THEME, value)?;
    }
    if let Some(value) = lookup(&table, HTML_THEME_OPTIONS) {
        config.theme_options = theme_options(value)?;
    }
    if let Some(value) = lookup(&table, HTML_STATIC_PATH) {
        config.static_path = set(HTML_STATIC_PATH, value, typed::<RelPath>)?;
    }
    if let Some(value) = lookup(&table, DEFAULT_ROLE) {
        let role = string(DEFAULT_ROLE, value)?;
        if !ROLE_NAME.is_match(&role) {
            return Err(Error::invalid(
                DEFAULT_ROLE,
                format!("`{role}` is not a valid role name"),
            ));
        }
        config.default_role = Some(role);
    }

    Ok(config)
}

fn into_table(value: Value) -> Result<Mapping> {
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(table) => Ok(table),
        other => Err(Error::invalid(
            "<root>",
            format!("expected a table of settings, found {}", describe(&other)),
        )),
    }
}

/// A key set to null counts as absent.
fn lookup<'t>(table: &'t Mapping, key: &str) -> Option<&'t Value> {
    table.get(key).filter(|v| !v.is_null())
}

fn theme_options(value: &Value) -> Result<ThemeOptions> {
    let table = value.as_mapping().ok_or_else(|| {
        Error::invalid(
            HTML_THEME_OPTIONS,
            format!("expected a table, found {}", describe(value)),
        )
    })?;

    let mut options = ThemeOptions::default();
    for (key, value) in table {
        let key = key
            .as_str()
            .and_then(ThemeOptionKey::from_name)
            .ok_or_else(|| Error::UnknownKey {
                key: render_key(key),
                section: Some(HTML_THEME_OPTIONS),
            })?;
        if value.is_null() {
            continue;
        }
        let field = format!("{HTML_THEME_OPTIONS}.{key}");
        let value = match key.kind() {
            OptionKind::String => ThemeOptionValue::String(string(&field, value)?),
            OptionKind::Bool => ThemeOptionValue::Bool(boolean(&field, value)?),
        };
        options.insert(key, value);
    }
    Ok(options)
}

fn extension(field: &str, value: &Value) -> Result<String> {
    let name = string(field, value)?;
    if !EXTENSION_NAME.is_match(&name) {
        return Err(Error::invalid(
            field,
            format!("`{name}` is not a valid extension name"),
        ));
    }
    Ok(name)
}

/// A string setting converted through the type's `TryFrom<String>`.
fn typed<T>(field: &str, value: &Value) -> Result<T>
where
    T: TryFrom<String>,
    T::Error: std::fmt::Display,
{
    T::try_from(string(field, value)?).map_err(|e| Error::invalid(field, e))
}

fn string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| Error::invalid(field, format!("expected a string, found {}", describe(value))))
}

fn boolean(field: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::invalid(field, format!("expected a boolean, found {}", describe(value))))
}

fn list<T>(
    field: &str,
    value: &Value,
    mut item: impl FnMut(&str, &Value) -> Result<T>,
) -> Result<Vec<T>> {
    let items = value.as_sequence().ok_or_else(|| {
        Error::invalid(field, format!("expected a list, found {}", describe(value)))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, v)| item(&format!("{field}[{i}]"), v))
        .collect()
}

/// Like [`list`], keeping the first occurrence of each entry.
fn set<T: PartialEq + std::fmt::Display>(
    field: &str,
    value: &Value,
    item: impl FnMut(&str, &Value) -> Result<T>,
) -> Result<Vec<T>> {
    let items = list(field, value, item)?;
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if unique.contains(&item) {
            log::warn!("Ignoring duplicate `{item}` in `{field}`");
        } else {
            unique.push(item);
        }
    }
    Ok(unique)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a table",
        Value::Tagged(_) => "a tagged value",
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_owned())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

fn find_project_file<P: Into<path::PathBuf>>(dir: P, names: &[&str]) -> Option<path::PathBuf> {
    find_project_file_internal(dir.into(), names)
}

fn find_project_file_internal(dir: path::PathBuf, names: &[&str]) -> Option<path::PathBuf> {
    let mut dir = dir;
    loop {
        if let Some(found) = names.iter().map(|n| dir.join(n)).find(|p| p.is_file()) {
            return Some(found);
        }
        let hit_bottom = !dir.pop();
        if hit_bottom {
            return None;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn yaml(content: &str) -> Result<SiteConfig> {
        SiteConfig::parse(content, SourceFormat::Yaml)
    }

    #[test]
    fn test_from_file_ok() {
        let result = SiteConfig::from_file("tests/fixtures/config/_docconf.yml").unwrap();
        assert_eq!(
            result.root(),
            path::Path::new("tests/fixtures/config").to_path_buf()
        );
        assert_eq!(result.project(), "Bristol RSE");
        assert_eq!(result.copyright(), "2021, Bristol RSE Team. CC-BY-SA 4.0");
        assert_eq!(result.author(), "");
        assert!(result.extensions().is_empty());
        assert_eq!(
            result
                .templates_path()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>(),
            ["_templates"]
        );
        assert_eq!(
            result
                .exclude_patterns()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>(),
            ["_build", "Thumbs.db", ".DS_Store", "venv"]
        );
        assert_eq!(result.theme_name(), Theme::SphinxBookTheme);
        let options = result.theme_options();
        assert_eq!(
            options.repository_url(),
            Some("https://github.com/BristolRSE/bristolrse.github.io")
        );
        assert_eq!(options.path_to_docs(), Some("source"));
        assert_eq!(options.use_repository_button(), Some(true));
        assert_eq!(options.use_edit_page_button(), Some(true));
        assert_eq!(options.use_fullscreen_button(), Some(false));
        assert_eq!(options.extra_navbar(), Some(""));
        assert_eq!(options.search_bar_text(), Some("Search..."));
        assert_eq!(
            result
                .static_path()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>(),
            ["_static"]
        );
        assert_eq!(result.default_role(), Some("literal"));
    }

    #[test]
    fn test_from_file_toml_matches_yaml() {
        let yaml = SiteConfig::from_file("tests/fixtures/config/_docconf.yml").unwrap();
        let toml = SiteConfig::from_file("tests/fixtures/config/bristol.toml").unwrap();
        assert_eq!(yaml, toml);
    }

    #[test]
    fn test_from_file_empty() {
        let result = SiteConfig::from_file("tests/fixtures/config/empty.yml");
        assert!(matches!(
            result,
            Err(Error::MissingRequiredField { field: "project" })
        ));
    }

    #[test]
    fn test_from_file_invalid_syntax() {
        let result = SiteConfig::from_file("tests/fixtures/config/invalid_syntax.yml");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_from_file_not_found() {
        let result = SiteConfig::from_file("tests/fixtures/config/config_does_not_exist.yml");
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_from_cwd_ok() {
        let result = SiteConfig::from_cwd("tests/fixtures/config/child").unwrap();
        assert_eq!(
            result.root(),
            path::Path::new("tests/fixtures/config").to_path_buf()
        );
    }

    #[test]
    fn test_from_cwd_not_found() {
        let result = SiteConfig::from_cwd("tests/fixtures");
        match result {
            Err(Error::NotFound { dir }) => {
                assert_eq!(dir, path::Path::new("tests/fixtures"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_from_cwd_toml_only() {
        let result = SiteConfig::from_cwd("tests/fixtures/discovery/toml_only/child").unwrap();
        assert_eq!(result.project(), "TOML site");
        assert_eq!(
            result.root(),
            path::Path::new("tests/fixtures/discovery/toml_only").to_path_buf()
        );
    }

    #[test]
    fn test_from_cwd_yaml_extension() {
        let result = SiteConfig::from_cwd("tests/fixtures/discovery/yaml_ext/child").unwrap();
        assert_eq!(result.project(), "YAML extension site");
    }

    #[test]
    fn test_from_cwd_yml_wins_over_toml() {
        let result = SiteConfig::from_cwd("tests/fixtures/discovery/both").unwrap();
        assert_eq!(result.project(), "YAML site");
    }

    #[test]
    fn find_project_file_first_name_wins() {
        let actual = find_project_file("tests/fixtures/discovery/both", CONFIG_FILE_NAMES).unwrap();
        let expected = path::Path::new("tests/fixtures/discovery/both/_docconf.yml");
        assert_eq!(actual, expected);
    }

    #[test]
    fn find_project_file_toml_from_child() {
        let actual =
            find_project_file("tests/fixtures/discovery/toml_only/child", CONFIG_FILE_NAMES)
                .unwrap();
        let expected = path::Path::new("tests/fixtures/discovery/toml_only/_docconf.toml");
        assert_eq!(actual, expected);
    }

    #[test]
    fn find_project_file_same_dir() {
        let actual = find_project_file("tests/fixtures/config", CONFIG_FILE_NAMES).unwrap();
        let expected = path::Path::new("tests/fixtures/config/_docconf.yml");
        assert_eq!(actual, expected);
    }

    #[test]
    fn find_project_file_parent_dir() {
        let actual = find_project_file("tests/fixtures/config/child", CONFIG_FILE_NAMES).unwrap();
        let expected = path::Path::new("tests/fixtures/config/_docconf.yml");
        assert_eq!(actual, expected);
    }

    #[test]
    fn find_project_file_doesnt_exist() {
        let actual = find_project_file("tests/fixtures/", CONFIG_FILE_NAMES);
        assert_eq!(actual, None);
    }

    #[test]
    fn parse_minimal_uses_defaults() {
        let config = yaml("project: X").unwrap();
        assert_eq!(config.project(), "X");
        assert_eq!(config.root(), path::Path::new("."));
        assert_eq!(config.copyright(), "");
        assert_eq!(config.author(), "");
        assert!(config.extensions().is_empty());
        assert!(config.templates_path().is_empty());
        assert!(config.exclude_patterns().is_empty());
        assert_eq!(config.theme_name(), Theme::Alabaster);
        assert!(config.theme_options().is_empty());
        assert!(config.static_path().is_empty());
        assert_eq!(config.default_role(), None);
    }

    #[test]
    fn parse_single_theme_option() {
        let config = yaml(
            "project: X\nhtml_theme: sphinx_book_theme\nhtml_theme_options:\n  use_fullscreen_button: false\n",
        )
        .unwrap();
        assert_eq!(config.project(), "X");
        assert_eq!(config.theme_name(), Theme::SphinxBookTheme);
        assert_eq!(config.theme_options().len(), 1);
        assert_eq!(config.theme_options().use_fullscreen_button(), Some(false));
        assert_eq!(config.copyright(), "");
        assert!(config.static_path().is_empty());
    }

    #[test]
    fn parse_empty_extensions() {
        let config = yaml("project: X\nextensions: []\n").unwrap();
        assert_eq!(config.extensions(), &[] as &[String]);
    }

    #[test]
    fn parse_extensions_keep_order() {
        let config =
            yaml("project: X\nextensions: [sphinx.ext.todo, myst_parser, sphinx.ext.autodoc]\n")
                .unwrap();
        assert_eq!(
            config.extensions(),
            ["sphinx.ext.todo", "myst_parser", "sphinx.ext.autodoc"]
        );
    }

    #[test]
    fn parse_missing_project() {
        let err = yaml("author: someone\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredField { field: "project" }
        ));
    }

    #[test]
    fn parse_null_project_is_missing() {
        let err = yaml("project:\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredField { field: "project" }
        ));
    }

    #[test]
    fn parse_missing_project_checked_before_theme() {
        let err = yaml("html_theme: unknown_theme\n").unwrap_err();
        assert!(
            matches!(err, Error::MissingRequiredField { field: "project" }),
            "{err:?}"
        );
    }

    #[test]
    fn parse_missing_project_checked_before_unknown_key() {
        let err = yaml("html_logo: logo.png\n").unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }), "{err:?}");
    }

    #[test]
    fn parse_empty_project() {
        let err = yaml("project: '  '\n").unwrap_err();
        assert_eq!(err.field(), Some("project"));
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn parse_unknown_top_level_key() {
        let err = yaml("project: X\nhtml_logo: logo.png\n").unwrap_err();
        match err {
            Error::UnknownKey { key, section } => {
                assert_eq!(key, "html_logo");
                assert_eq!(section, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_unknown_key_checked_before_values() {
        let err = yaml("project: X\nhtml_theme: unknown_theme\nhtml_logo: logo.png\n").unwrap_err();
        assert!(matches!(err, Error::UnknownKey { .. }), "{err:?}");
    }

    #[test]
    fn parse_unknown_theme_option() {
        let err = yaml(
            "project: X\nhtml_theme_options:\n  use_fullscreen_button: false\n  logo_only: true\n",
        )
        .unwrap_err();
        match err {
            Error::UnknownKey { key, section } => {
                assert_eq!(key, "logo_only");
                assert_eq!(section, Some("html_theme_options"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_unknown_theme() {
        let err = yaml("project: X\nhtml_theme: unknown_theme\n").unwrap_err();
        match err {
            Error::InvalidValue { field, reason } => {
                assert_eq!(field, "html_theme");
                assert_eq!(reason, "unknown theme `unknown_theme`");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_theme_option_wrong_type() {
        let err = yaml("project: X\nhtml_theme_options:\n  use_fullscreen_button: 'no'\n")
            .unwrap_err();
        match err {
            Error::InvalidValue { field, reason } => {
                assert_eq!(field, "html_theme_options.use_fullscreen_button");
                assert_eq!(reason, "expected a boolean, found a string");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_theme_options_not_a_table() {
        let err = yaml("project: X\nhtml_theme_options: [a]\n").unwrap_err();
        assert_eq!(err.field(), Some("html_theme_options"));
    }

    #[test]
    fn parse_absolute_static_path() {
        let err = yaml("project: X\nhtml_static_path: [_static, /srv/static]\n").unwrap_err();
        match err {
            Error::InvalidValue { field, .. } => assert_eq!(field, "html_static_path[1]"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_escaping_templates_path() {
        let err = yaml("project: X\ntemplates_path: [../shared]\n").unwrap_err();
        assert_eq!(err.field(), Some("templates_path[0]"));
    }

    #[test]
    fn parse_broken_exclude_pattern() {
        let err = yaml("project: X\nexclude_patterns: [_build, 'drafts/[abc']\n").unwrap_err();
        assert_eq!(err.field(), Some("exclude_patterns[1]"));
    }

    #[test]
    fn parse_path_list_not_a_list() {
        let err = yaml("project: X\ntemplates_path: _templates\n").unwrap_err();
        match err {
            Error::InvalidValue { field, reason } => {
                assert_eq!(field, "templates_path");
                assert_eq!(reason, "expected a list, found a string");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_invalid_extension_name() {
        let err = yaml("project: X\nextensions: [sphinx.ext.todo, 'not an extension']\n")
            .unwrap_err();
        assert_eq!(err.field(), Some("extensions[1]"));
    }

    #[test]
    fn parse_duplicate_paths_are_dropped() {
        let config = yaml("project: X\nexclude_patterns: [_build, venv, _build]\n").unwrap();
        assert_eq!(
            config
                .exclude_patterns()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>(),
            ["_build", "venv"]
        );
    }

    #[test]
    fn parse_domain_role() {
        let config = yaml("project: X\ndefault_role: 'py:obj'\n").unwrap();
        assert_eq!(config.default_role(), Some("py:obj"));
    }

    #[test]
    fn parse_invalid_role() {
        let err = yaml("project: X\ndefault_role: 'two words'\n").unwrap_err();
        assert_eq!(err.field(), Some("default_role"));
    }

    #[test]
    fn parse_non_table_document() {
        let err = yaml("- project\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }), "{err:?}");
    }

    #[test]
    fn parse_null_optional_uses_default() {
        let config = yaml("project: X\nauthor:\nhtml_theme: ~\n").unwrap();
        assert_eq!(config.author(), "");
        assert_eq!(config.theme_name(), Theme::Alabaster);
    }

    #[test]
    fn display_reloads_to_equal_config() {
        let config = SiteConfig::from_file("tests/fixtures/config/_docconf.yml").unwrap();
        let rendered = config.to_string();
        let reloaded = yaml(&rendered).unwrap();
        // `root` is not part of the rendered form.
        assert_eq!(reloaded.project(), config.project());
        assert_eq!(reloaded.theme_options(), config.theme_options());
        assert_eq!(reloaded.exclude_patterns(), config.exclude_patterns());
        assert_eq!(reloaded.default_role(), config.default_role());
        assert_eq!(reloaded.to_string(), rendered);
    }
}
