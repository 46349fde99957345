//! Error types for the quartier engine.
//!
//! All configuration problems surface at initialization; nothing inside the
//! step loop has a recoverable-error path.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid configuration (bad probabilities, empty pools, zero dimensions)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Relocation invariant violated: `from` must be occupied, `to` empty
    #[error("Invalid move from ({from_row}, {from_col}) to ({to_row}, {to_col}): {reason}")]
    InvalidMove {
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
        reason: String,
    },

    /// TOML parsing errors when loading configuration
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new invalid-move error.
    #[must_use]
    pub fn invalid_move(
        from: (usize, usize),
        to: (usize, usize),
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidMove {
            from_row: from.0,
            from_col: from.1,
            to_row: to.0,
            to_col: to.1,
            reason: reason.into(),
        }
    }
}
