use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyError {
    #[error("API key is empty")]
    EmptyApiKey,

    #[error("Invalid API key format. Keys start with \"sk-\"")]
    MalformedApiKey,

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
