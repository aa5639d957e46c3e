//! Error types for the b2c client.
//!
//! Uses `thiserror` for library-style errors with automatic `Display` and `Error` implementations.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Usage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Token acquisition errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The application lacks the permissions (or admin consent) for the scope.
    #[error(
        "The application doesn't have sufficient permissions. Check that the required \
         application permissions are declared and granted by a tenant administrator: {0}"
    )]
    InsufficientPermissions(String),

    /// The scope has to be of the shape `https://resourceurl/.default`.
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Token acquisition failed: {0}")]
    Unknown(String),
}

/// Graph API errors.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Non-2xx response. `body` is the pretty-printed error payload.
    #[error("Error calling the Graph API (HTTP {status}): \n{body}")]
    Api { status: u16, body: String },

    #[error("Graph API request failed: {0}")]
    Transport(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Auth(_) => 3,
            Self::Graph(_) => 4,
            Self::NotFound(_) => 5,
            Self::Config(_) | Self::Io { .. } => 1,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Config(format!("{:#}", e))
    }
}
