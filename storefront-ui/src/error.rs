pub type Result<T> = std::result::Result<T, StorefrontError>;

#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Invalid product data: id={id:?}, name={name:?}, price={price:?}")]
    InvalidProduct {
        id: Option<String>,
        name: Option<String>,
        price: Option<String>,
    },
}
