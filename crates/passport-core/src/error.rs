/// Core errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("could not serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}
