use std::error::Error;
use std::fmt;

/// Error type for simulation operations
#[derive(Debug, Clone, PartialEq)]
pub enum GlideError {
    /// The lift-entry intersection was asked to solve a vertical path
    /// segment, where the line slope is undefined.
    VerticalPath { x: f64 },
    /// A configuration value is out of its valid range.
    InvalidConfig(String),
    /// A batch was requested with zero trials.
    EmptyBatch,
}

impl fmt::Display for GlideError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GlideError::VerticalPath { x } => {
                write!(f, "vertical path segment at x = {x}: line slope is undefined")
            }
            GlideError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            GlideError::EmptyBatch => write!(f, "batch requested with zero trials"),
        }
    }
}

impl Error for GlideError {}

impl From<String> for GlideError {
    fn from(msg: String) -> Self {
        GlideError::InvalidConfig(msg)
    }
}

impl From<&str> for GlideError {
    fn from(msg: &str) -> Self {
        GlideError::InvalidConfig(msg.to_string())
    }
}
