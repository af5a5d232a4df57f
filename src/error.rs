use thiserror::Error;

/// Errors raised by the numerical library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolkitError {
    /// The supplied parameter names match neither halo-profile schema.
    #[error(
        "1-halo model with parameters {keys:?} not supported. Use either NFW with 'c' or Einasto with 'rs' and 'alpha'"
    )]
    UnsupportedModel { keys: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("numerical integration failed: {0}")]
    Integration(String),
}

impl ToolkitError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ToolkitError::InvalidInput(message.into())
    }
}

/// Error surfaced by the `halo` binary, carrying its process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ToolkitError> for AppError {
    fn from(err: ToolkitError) -> Self {
        let exit_code = match err {
            ToolkitError::UnsupportedModel { .. } | ToolkitError::InvalidInput(_) => 2,
            ToolkitError::Integration(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
