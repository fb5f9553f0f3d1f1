use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForkinfoError {
    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("github error: {0}")]
    GitHub(String),

    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("argument is not a valid owner/repository string: {0}")]
    InvalidRepoRef(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForkinfoError>;
