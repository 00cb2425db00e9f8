//! Error handling for the catalog console

use catalog_admin_products::ProductsError;
use std::fmt;
use thiserror::Error;

/// Unified error type for the catalog console
#[derive(Error, Debug)]
pub enum Error {
    /// Errors from the products API client
    #[error("Products API error: {0}")]
    Products(#[from] ProductsError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form input rejected before anything was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// A product id that is not in the current list
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The server answered with something the console cannot display
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// File system errors while reading images
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new not-found error
    pub fn not_found<T: fmt::Display>(id: T) -> Self {
        Error::NotFound(id.to_string())
    }

    /// Create a new invalid-response error
    pub fn invalid_response<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidResponse(msg.to_string())
    }

    /// Short reason suitable for a notification
    pub fn reason(&self) -> String {
        match self {
            Error::Products(ProductsError::ApiError { message, .. }) if !message.is_empty() => {
                message.clone()
            }
            Error::Validation(msg) | Error::InvalidResponse(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
