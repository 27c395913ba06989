use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatepicError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mapping store error: {0}")]
    Store(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
