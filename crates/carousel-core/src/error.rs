use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Slider container identifier is missing")]
    MissingIdentifier,

    #[error("Slider container not found: {0}")]
    ContainerNotFound(String),

    #[error("Inner scroll region not found in container: {0}")]
    InnerRegionNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
