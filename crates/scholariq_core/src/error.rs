use serde::{Deserialize, Serialize};
use std::fmt;

pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
pub const GENERATION_UNAVAILABLE: &str = "GENERATION_UNAVAILABLE";
pub const GENERATION_TIMEOUT: &str = "GENERATION_TIMEOUT";
pub const SCORING_INTERNAL: &str = "SCORING_INTERNAL";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

/// One rejected request field. Validation collects every violation before failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Single structured error shape used by the core pipeline, the generation layer, and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
            violations: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        let fields = violations
            .iter()
            .map(|v| v.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            code: VALIDATION_FAILED.to_string(),
            message: "Writing request is invalid".to_string(),
            details: Some(format!("fields={fields}")),
            retryable: false,
            violations,
        }
    }

    pub fn generation_unavailable(message: impl Into<String>) -> Self {
        Self::new(GENERATION_UNAVAILABLE, message)
    }

    pub fn generation_timeout(timeout: std::time::Duration) -> Self {
        Self::new(GENERATION_TIMEOUT, "Generation call exceeded its timeout")
            .with_details(format!("timeout_ms={}", timeout.as_millis()))
            .with_retryable(true)
    }

    pub fn scoring_internal(message: impl Into<String>) -> Self {
        Self::new(SCORING_INTERNAL, message)
    }

    /// Names of the fields rejected by validation, in report order.
    pub fn violated_fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
