use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("malformed record descriptor: {0:?}")]
    MalformedDescriptor(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ServiceError {
    pub fn storage(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{}: {}", path.display(), err))
    }

    pub fn parse(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Parse(format!("{}: {}", path.display(), err))
    }
}
