pub(crate) use anyhow::Context as _;

pub(crate) type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
