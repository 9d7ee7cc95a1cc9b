use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuesyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid input at index {index}: {message}")]
    InvalidInput { index: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl CuesyncError {
    pub fn invalid_input(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            index,
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CuesyncError>;
