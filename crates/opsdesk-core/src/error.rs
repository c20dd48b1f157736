use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Category '{0}' already has a writer")]
    CategoryClaimed(Category),
}

pub type Result<T> = std::result::Result<T, Error>;
