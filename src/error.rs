//! Crate-wide error type.
//!
//! Every failure carries the process exit code it should produce:
//!
//! - `2`: invalid input, usage, or local file I/O
//! - `3`: malformed rows found while processing
//! - `4`: upstream fetch failure (network, HTTP status, schema)
//! - `5`: chart rendering failure

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

    /// The state name did not resolve to a known U.S. state.
    pub fn invalid_state(name: &str) -> Self {
        Self::new(2, format!("Invalid state '{name}': not a recognised U.S. state name or abbreviation."))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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
