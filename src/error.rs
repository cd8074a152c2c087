//! Application error type.
//!
//! Every failure carries a process exit code and a human-readable message:
//!
//! - `2`: usage / configuration / filesystem problems
//! - `3`: malformed or inconsistent input maps
//! - `4`: numerical failures during fitting
//! - `5`: chart rendering failures

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub const USAGE: u8 = 2;
    pub const INPUT: u8 = 3;
    pub const NUMERIC: u8 = 4;
    pub const RENDER: u8 = 5;

    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(Self::USAGE, message)
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(Self::INPUT, message)
    }

    pub fn numeric(message: impl Into<String>) -> Self {
        Self::new(Self::NUMERIC, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(Self::RENDER, message)
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
