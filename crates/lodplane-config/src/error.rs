use std::io;

/// Failure to read, parse or write `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    ReadError(#[source] io::Error),

    #[error("cannot write config file: {0}")]
    WriteError(#[source] io::Error),

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("invalid config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("cannot serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}
