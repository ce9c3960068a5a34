//! Validated site configuration for documentation generators.
//!
//! A [`SiteConfig`] is loaded once per build from a `_docconf.yml` (or
//! `.toml`) file and handed, read-only, to the rendering pipeline.

mod config;
mod error;
mod format;
mod site;
mod theme;

pub mod path;

pub use self::config::*;
pub use self::error::*;
pub use self::format::*;
pub use self::site::*;
pub use self::theme::*;

type Result<T, E = Error> = std::result::Result<T, E>;
