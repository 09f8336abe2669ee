//! Error taxonomy and the user-visible notices built from it

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for puzzle operations
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Caller-discipline violations against the board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("slot {slot} is outside the board (0..{len})")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error("grid size must be at least 1")]
    EmptyGrid,
}

/// Why a bundle fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DownloadFailure {
    #[error("HTTP {code}: {text}")]
    Status { code: u16, text: String },
    #[error("{0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PuzzleError {
    #[error("failed to load image {path}: {cause}")]
    AssetLoad { path: String, cause: String },
    #[error("download of {path} failed: {failure}")]
    Download {
        path: String,
        failure: DownloadFailure,
    },
    #[error("no bundle configured for this board")]
    MissingBundle,
    #[error("required element not found: {0}")]
    MissingResource(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl PuzzleError {
    /// Errors that end the play session
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AssetLoad { .. } | Self::MissingResource(_) | Self::InvalidConfig(_)
        )
    }

    /// Build the message shown to the player
    pub fn notice(&self, board_name: &str) -> Notice {
        match self {
            Self::AssetLoad { path, cause } => Notice {
                message: format!("Failed to load \"{}\"", board_name),
                cause: cause.clone(),
                path: Some(path.clone()),
            },
            Self::Download { path, failure } => Notice {
                message: format!("Failed to download zip for \"{}\"", board_name),
                cause: format!("Download failed: {}", failure),
                path: Some(path.clone()),
            },
            Self::MissingBundle => Notice {
                message: "No zip configured for this board.".to_string(),
                cause: "Set \"downloads\" to a .zip file name in the puzzle configuration."
                    .to_string(),
                path: None,
            },
            Self::MissingResource(name) => Notice {
                message: "Initialization failed".to_string(),
                cause: format!("Required element not found: {}", name),
                path: None,
            },
            Self::InvalidConfig(reason) => Notice {
                message: "Initialization failed".to_string(),
                cause: reason.clone(),
                path: None,
            },
            Self::Board(err) => Notice {
                message: "Invalid move".to_string(),
                cause: err.to_string(),
                path: None,
            },
        }
    }
}

/// A user-visible error report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub cause: String,
    pub path: Option<String>,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(path) = &self.path {
            write!(f, "\n\nPath: {}", path)?;
        }
        write!(f, "\n\nError: {}", self.cause)
    }
}
