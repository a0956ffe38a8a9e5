use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    Io(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// Values parsed but are not usable.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config IO error: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
