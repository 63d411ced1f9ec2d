/// Errors raised while loading or probing a level grid.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("layout `{layout}` is not a valid level file: {reason}")]
    MalformedLevelData { layout: String, reason: String },
    #[error("tile ({col}, {row}) is outside the grid")]
    OutOfBounds { col: usize, row: usize },
}

impl LevelError {
    pub fn malformed(layout: &str, reason: impl Into<String>) -> Self {
        LevelError::MalformedLevelData {
            layout: layout.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LevelError>;
