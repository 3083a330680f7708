#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("Packaging error: {0}")]
    PackageError(String),

    #[error("Scaffolding error: {0}")]
    InitError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
