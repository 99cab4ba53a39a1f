#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("expected a `doc` node at the root, found `{0}`")]
    NotADocument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
