//! Error handling module for the congregation backend.
//!
//! Engine failures are typed so callers can distinguish a missing reference
//! from a uniqueness violation. All variants surface to GraphQL clients as a
//! plain human-readable message.

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Referenced entity or id does not exist
    NotFound(String),
    /// Uniqueness constraint violated at creation
    Duplicate(String),
    /// Store-level failure (transport, auth), propagated opaquely
    Database(String),
}

impl AppError {
    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound(msg) | AppError::Duplicate(msg) | AppError::Database(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        tracing::error!("Store error: {:?}", err);
        AppError::Database(format!("Error de base de datos: {}", err))
    }
}
