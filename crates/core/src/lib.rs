mod fs;
mod source;

pub use fs::*;
pub use source::*;

type Error = docconf_config::Error;
type Result<T, E = Error> = std::result::Result<T, E>;
