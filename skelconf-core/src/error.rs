use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown config key: {0}")]
    UnknownConfigKey(String),
    #[error("malformed persisted value for {key}: found {found}")]
    MalformedPersistedValue { key: String, found: String },
    #[error("observer fault during {context}: {message}")]
    ObserverFault { context: String, message: String },
    #[error("profile io: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
