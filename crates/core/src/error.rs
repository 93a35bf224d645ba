/// Domain error taxonomy.
///
/// The payload of every variant is the client-facing message. Handlers pass
/// one of the constants from [`crate::messages`] (or a message built from
/// one) so the text stays stable across endpoints.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] with a static message.
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Shorthand for a [`CoreError::NotFound`] with a static message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        CoreError::NotFound(msg.into())
    }

    /// The client-facing message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            CoreError::NotFound(m)
            | CoreError::Validation(m)
            | CoreError::Conflict(m)
            | CoreError::Unauthorized(m)
            | CoreError::Internal(m) => m,
        }
    }
}
