use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Catalog(#[from] ecoportal_core::ConfigError),

    #[error("catalog contains no sectors")]
    EmptyCatalog,
}
